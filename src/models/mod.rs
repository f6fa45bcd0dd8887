//! API data models
//!
//! This module contains the wire structures exchanged with the chat-completion
//! endpoint.

pub mod completion;
