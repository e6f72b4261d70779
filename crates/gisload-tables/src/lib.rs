//! Table-level workflows over PostGIS.
//!
//! ## Provisioning
//!
//! - [`Provisioner`] — Existence, row count, create, truncate, and the
//!   create-or-confirm-truncate [`Provisioner::ensure`] workflow
//!
//! ## Loading
//!
//! - [`Loader`] — Bulk INSERT, CSV COPY, [`Frame`] read/write, and the
//!   helper routines installed in the database
//! - [`Frame`] — Rows of cells under named columns
//!
//! ## Statements
//!
//! - [`sql`] — Text of every statement issued
mod frame;
mod loader;
#[cfg(test)]
mod mock;
mod provision;
pub mod sql;

pub use frame::*;
pub use loader::*;
pub use provision::*;
