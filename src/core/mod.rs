//! Core application modules
//!
//! This module contains configuration, constants, logging, the completion
//! client and the caller-side search coordination.

pub mod client;
pub mod config;
pub mod constants;
pub mod logging;
pub mod prompt;
pub mod render;
pub mod search;
pub mod source;
