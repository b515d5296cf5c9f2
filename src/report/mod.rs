//! Structured check failures and their terminal rendering.
//!
//! A check that passes contributes nothing; every failed expectation becomes
//! one [`CheckError`] identified by a stable dotted id. Human-readable message
//! wording lives in the external reporting layer, which consumes the id plus
//! the interpolation values.

mod check_error;
mod render;

pub use check_error::{CheckError, NodeKind};
pub use render::render_report;
