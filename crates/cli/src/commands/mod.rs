pub mod header;
pub mod init;
pub mod run;
