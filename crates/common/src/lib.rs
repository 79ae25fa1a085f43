//! Common utilities and types shared across synthprobe crates.

pub mod error;
pub mod hash;
pub mod platform;
pub mod timestamp;

pub use error::{Error, Result};
pub use platform::Platform;
pub use timestamp::Timestamp;
