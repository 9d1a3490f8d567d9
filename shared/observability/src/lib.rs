//! Theograph observability library
//!
//! Structured logging setup and HTTP request tracing shared by the chat
//! service and the loader.

pub mod init;
pub mod middleware;
pub mod trace_context;

pub use init::*;
pub use middleware::*;
pub use trace_context::*;
