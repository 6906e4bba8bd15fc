//! Output channels: write-only sinks that own a single Write-mode [`Stream`].
//!
//! [`Stream`]: rawio_common::io::Stream

mod output_channel;
mod output_write;
mod standard;

pub use output_channel::*;
pub use output_write::*;
pub use standard::*;
