mod stream;
mod target;

pub use stream::*;
pub use target::*;
