pub mod config;
pub mod io;

pub use config::*;
pub use io::*;
