#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]

mod attribute;
mod buffer;
pub mod error;

pub use attribute::*;
pub use buffer::*;
pub use error::{Access, AttributeError};
