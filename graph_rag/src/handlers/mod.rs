pub mod chat;
pub mod health;
pub mod theorems;

pub use chat::{chat, reset_conversation};
pub use health::health_check;
pub use theorems::{get_theorem, ingest_theorems};
