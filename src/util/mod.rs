//! Shared utility helpers.

pub mod error;

pub use error::{Cancelled, OnsightError, OnsightResult};
