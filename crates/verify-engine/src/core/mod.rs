//! Core logic for the assertion engine

mod engine;
mod status;
mod validation;

pub use engine::AssertionTranslationEngine;
pub use status::map_status;
pub use validation::{check_consistency, validate_assertion};
