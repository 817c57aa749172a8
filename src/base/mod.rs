//! Foundation types for the jrev toolchain.
//!
//! This module provides fundamental types used throughout the library:
//! - [`FileId`] - Interned file identifiers
//!
//! This module has NO dependencies on other jrev modules.

mod file_id;

pub use file_id::FileId;
