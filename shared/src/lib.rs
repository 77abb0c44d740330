//! Shared types and models for the KisanSahayak advisory platform
//!
//! This crate contains types shared between the backend, the browser client
//! (via WASM), and other components of the system.

pub mod models;
pub mod speech;
pub mod types;
pub mod validation;
pub mod voice;

pub use models::*;
pub use speech::*;
pub use types::*;
pub use validation::*;
pub use voice::*;
