//! Shared data model for the theorem graph services.
//!
//! The loader, the graph layer and the chat service all exchange these types,
//! so there is exactly one schema for a theorem record.

pub mod chat;
pub mod theorem;

pub use chat::*;
pub use theorem::*;
