use crate::printing::header_line;

pub fn print_header() {
    println!("{}", header_line());
}
