pub mod file;
pub mod scenario;
pub mod stdin;
