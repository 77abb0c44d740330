//! HTTP handlers

pub mod advisory;
pub mod connectivity;
pub mod health;

pub use advisory::*;
pub use connectivity::*;
pub use health::*;
