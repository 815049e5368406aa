//! Services module
//!
//! Business logic on top of the data model: the mutating store, the
//! template seeds, derived queries and the formula evaluator.

pub mod formula;
pub mod queries;
pub mod store;
pub mod templates;

pub use formula::{parse_formula, render_formula, FormulaError, FormulaFunction};
pub use store::BoardStore;
