//! Te Mata Wānanga Apparel Form — local development stack
//!
//! Two independent pieces:
//! - A mock order-intake server that mirrors the production HTTP contract
//!   without sending email or writing to Google Sheets
//! - An interactive setup wizard that collects deployment credentials and
//!   writes them into environment-variable files

pub mod server;
pub mod setup;

// Re-exports for convenience
pub use server::{OrderServer, ServerConfig};
pub use setup::{SetupAnswers, SetupPaths};
