//! Shared utilities for the survey pivot crates.
//!
//! Polars `AnyValue` conversions used by the readers, plus the small text
//! helpers every stage applies to raw survey cells.

pub mod polars;
pub mod text;

pub use polars::{any_to_code, any_to_string, format_numeric, parse_code};
pub use text::{clean_cell_text, group_key, is_blank, is_numeric_code};
