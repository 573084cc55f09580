use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use ratchet_sim::evolution::Algorithm;
use ratchet_sim::simulation::{SimulationBuilder, TimeScale};

fn bench_reproduce(c: &mut Criterion) {
    let mut group = c.benchmark_group("reproduce");

    for &size in &[100usize, 1000, 10_000] {
        group.throughput(Throughput::Elements(size as u64));

        for algorithm in [Algorithm::Direct, Algorithm::Analytic] {
            group.bench_with_input(
                BenchmarkId::new(algorithm.to_string(), size),
                &size,
                |b, &size| {
                    b.iter_batched(
                        || {
                            SimulationBuilder::new()
                                .population_size(size)
                                .algorithm(algorithm)
                                .time_scale(TimeScale::Generations)
                                .seed(42)
                                .build()
                                .unwrap()
                        },
                        |mut sim| {
                            sim.run_for(black_box(10)).unwrap();
                            black_box(sim)
                        },
                        criterion::BatchSize::SmallInput,
                    );
                },
            );
        }
    }

    group.finish();
}

fn bench_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("reproduce_parallel");
    let size = 10_000;
    group.throughput(Throughput::Elements(size as u64));

    for parallel in [false, true] {
        group.bench_function(if parallel { "parallel" } else { "sequential" }, |b| {
            b.iter_batched(
                || {
                    SimulationBuilder::new()
                        .population_size(size)
                        .algorithm(Algorithm::Direct)
                        .parallel(parallel)
                        .seed(42)
                        .build()
                        .unwrap()
                },
                |mut sim| {
                    sim.reproduce().unwrap();
                    black_box(sim)
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_reproduce, bench_parallel);
criterion_main!(benches);
