//! Chat over a graph of theorems.
//!
//! A question is first handed to the language model to pick out the theorems
//! it refers to; those are fetched from the graph together with their direct
//! dependencies and embedded in the answer prompt. Questions that name no
//! theorem are answered directly.

pub mod errors;
pub mod handlers;
pub mod llm;
pub mod prompts;
pub mod routes;
pub mod services;
pub mod state;

pub use errors::{RagError, RagResult};
pub use routes::{configure_routes, json_config};
pub use state::AppState;
