//! Domain models for the advisory workflow

mod advisory;
mod farmer;
mod weather;
mod weekly_plan;

pub use advisory::*;
pub use farmer::*;
pub use weather::*;
pub use weekly_plan::*;
