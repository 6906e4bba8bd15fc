mod error;
mod mode;
mod stream;

pub use error::*;
pub use mode::*;
pub use stream::*;
