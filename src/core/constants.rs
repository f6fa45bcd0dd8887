//! Constants for the completion exchange
//!
//! Message roles, header values, the fixed system instruction and the
//! configuration defaults live here.

/// Message role constants
pub mod role {
    /// User role identifier
    pub const USER: &str = "user";

    /// System role identifier
    pub const SYSTEM: &str = "system";
}

/// Header value constants
pub mod header {
    /// Media type sent in both `accept` and `content-type`
    pub const JSON: &str = "application/json";
}

/// System instruction sent ahead of every prompt
pub const SYSTEM_INSTRUCTION: &str = "Be precise and concise.";

/// Default completion API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "sonar";

/// Default environment variable holding the bearer credential
pub const DEFAULT_API_KEY_ENV: &str = "PERPLEXITY_API_KEY";

/// Default request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 10;
