//! Validators run over a tokenized file.
//!
//! Each check is independent: the header check runs once, the row check runs
//! per data row, and the quoting and value checks accumulate per-column state
//! that is turned into issues once every row has been seen.

pub mod header;
pub mod quoting;
pub mod regexes;
pub mod rows;
pub mod scanner;
pub mod values;
