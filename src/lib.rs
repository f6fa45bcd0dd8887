//! Company research over a chat-completion API
//!
//! Takes a company name, sends a templated prompt to a chat-completion
//! endpoint and returns the markdown answer. Front ends drive lookups through
//! [`crate::core::search::SearchSession`] and render the text with
//! [`crate::core::render::cards`].

pub mod core;
pub mod models;

pub use crate::core::client::CompletionClient;
pub use crate::core::config::Config;
pub use crate::core::source::{CompanyInfoSource, CompletionError, ErrorKind};
