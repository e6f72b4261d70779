//! Column specifications for table definitions.
//!
//! A [`ColumnSpec`] is written once per table as an ordered mapping of
//! column name to SQL type text. [`prepare`] turns it into the clauses
//! that `CREATE TABLE` and `INSERT` need, asking for confirmation first
//! when a primary key is declared.
mod error;
mod prepare;
mod spec;

pub use error::*;
pub use prepare::*;
pub use spec::*;
