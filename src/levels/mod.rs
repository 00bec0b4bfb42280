//! Gann Square of 9 level engine
//!
//! Pure mapping from a reference price to support/resistance levels.

mod engine;
mod types;

pub use engine::LevelEngine;
pub use types::{Axis, LevelError, LevelTarget, PriceLevels};
