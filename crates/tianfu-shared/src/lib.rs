//! # tianfu-shared
//!
//! Constants and wire types shared by the mailbox store and the HTTP server.

pub mod constants;
pub mod types;

pub use types::GeneratedLetter;
