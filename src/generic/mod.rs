//! Generic structures and procedures, not tied to formulas.

pub mod find_integer;
