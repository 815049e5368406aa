//! Column formulas
//!
//! Evaluates spreadsheet-style aggregates of the form `=FUNC(Column Name)`
//! over one column's values across a set of tasks. Failures come back as
//! `FormulaError`s whose display text is meant to be rendered inline.

use crate::models::{Column, Task};
use thiserror::Error;

/// Why a formula could not be evaluated
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error("Error: Formula must start with =")]
    MissingEquals,

    #[error("Error: Invalid formula syntax")]
    InvalidSyntax,

    #[error("Error: Column \"{0}\" not found")]
    ColumnNotFound(String),

    #[error("Error: Unknown function {0}")]
    UnknownFunction(String),
}

/// Supported aggregate functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormulaFunction {
    Sum,
    Avg,
    Count,
    Min,
    Max,
}

impl FormulaFunction {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "SUM" => Some(FormulaFunction::Sum),
            "AVG" => Some(FormulaFunction::Avg),
            "COUNT" => Some(FormulaFunction::Count),
            "MIN" => Some(FormulaFunction::Min),
            "MAX" => Some(FormulaFunction::Max),
            _ => None,
        }
    }

    /// Aggregate `values`; every function yields 0 for no values
    fn apply(self, values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        match self {
            FormulaFunction::Sum => values.iter().sum(),
            FormulaFunction::Avg => values.iter().sum::<f64>() / values.len() as f64,
            FormulaFunction::Count => values.len() as f64,
            FormulaFunction::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            FormulaFunction::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// Split `=FUNC(ARG)` into its function name and argument
fn split_formula(formula: &str) -> Result<(&str, &str), FormulaError> {
    let body = formula
        .trim()
        .strip_prefix('=')
        .ok_or(FormulaError::MissingEquals)?;

    let (name, rest) = body.split_once('(').ok_or(FormulaError::InvalidSyntax)?;
    let arg = rest.strip_suffix(')').ok_or(FormulaError::InvalidSyntax)?;

    let name_ok = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    let arg = arg.trim();
    if !name_ok || arg.is_empty() {
        return Err(FormulaError::InvalidSyntax);
    }

    Ok((name, arg))
}

/// Evaluate `formula` against a board's columns and tasks.
///
/// The referenced column is matched by name, ignoring case. Null and empty
/// string cells are left out of the population; every other value is read
/// leniently as a number, so non-numeric text still counts and adds 0.
pub fn parse_formula<'a, C, T>(formula: &str, columns: C, tasks: T) -> Result<f64, FormulaError>
where
    C: IntoIterator<Item = &'a Column>,
    T: IntoIterator<Item = &'a Task>,
{
    let (name, arg) = split_formula(formula)?;

    let wanted = arg.to_lowercase();
    let column = columns
        .into_iter()
        .find(|c| c.name.to_lowercase() == wanted)
        .ok_or_else(|| FormulaError::ColumnNotFound(arg.to_string()))?;

    let function =
        FormulaFunction::from_name(name).ok_or_else(|| FormulaError::UnknownFunction(name.to_string()))?;

    let values: Vec<f64> = tasks
        .into_iter()
        .filter_map(|task| task.data.get(&column.id))
        .filter(|value| !value.is_empty())
        .map(|value| value.as_number_lenient())
        .collect();

    Ok(function.apply(&values))
}

/// Evaluate and render: the number, or the error text
pub fn render_formula<'a, C, T>(formula: &str, columns: C, tasks: T) -> String
where
    C: IntoIterator<Item = &'a Column>,
    T: IntoIterator<Item = &'a Task>,
{
    match parse_formula(formula, columns, tasks) {
        Ok(value) => value.to_string(),
        Err(e) => e.to_string(),
    }
}
