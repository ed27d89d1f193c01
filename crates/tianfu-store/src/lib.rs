//! # tianfu-store
//!
//! File-backed mailbox for saved letters.
//!
//! The whole mailbox lives in one JSON array on disk. Reads are lenient: a
//! missing, unreadable or corrupt file yields an empty mailbox and a logged
//! warning, never an error. Mutations are serialized behind a single
//! in-process lock and written back with a temp-file rename.

pub mod mailbox;
pub mod models;

mod error;

pub use error::{Result, StoreError};
pub use mailbox::Mailbox;
pub use models::*;
