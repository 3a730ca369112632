//! Pure domain logic shared by the database and HTTP layers.
//!
//! Nothing in this crate performs I/O: field validation, list filters and
//! pagination metadata, the unique-name resolution rule behind
//! get-or-insert, and upload content sniffing all live here so they can be
//! unit tested without a database or a running server.

pub mod dedup;
pub mod error;
pub mod filters;
pub mod types;
pub mod upload;
pub mod validator;
