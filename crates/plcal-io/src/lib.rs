//! Input decoding for trade journal exports
//!
//! Decodes delimited text into the untyped [`RawRow`]s the core engine
//! ingests. The engine itself never reads files or streams; this crate is
//! the external collaborator that does.

pub mod loader;

pub use loader::{read_rows, read_rows_from_path, LoadError};
