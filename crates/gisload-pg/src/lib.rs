//! PostgreSQL connectivity for gisload.
//!
//! Every database-touching operation opens its own session, runs one or
//! more statements, commits, and closes the session before returning.
//!
//! ## Connectivity
//!
//! - [`Credentials`] — Login details and connection-string building
//! - [`Connector`] — Opens sessions ([`PgConnector`] for a live server)
//! - [`Session`] — Statement execution, bulk COPY, commit, close
//! - [`Lease`] — Scoped session that is closed on every exit path
//!
//! ## Values
//!
//! - [`Cell`] — A single decoded column value
//! - [`quote_ident`] / [`quote_literal`] — Safe interpolation into SQL text
mod cell;
mod client;
mod credentials;
mod error;
mod quote;
mod session;

pub use cell::*;
pub use client::*;
pub use credentials::*;
pub use error::*;
pub use quote::*;
pub use session::*;

/// Schema searched by the table-existence check.
pub const DEFAULT_SCHEMA: &str = "public";
