//! Built-in mail backends.

pub mod memory;
pub mod smtp;
