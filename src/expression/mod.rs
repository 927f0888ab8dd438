//! LIKE pattern handling.

pub mod pattern;

pub use pattern::{literal_prefix, sql_unescape};
