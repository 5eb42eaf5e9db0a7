pub mod error;
pub mod rest_api;
pub mod state;
pub mod validate;

/// Mount point of language records REST API
pub const LANGUAGES_API_PATH: &str = "/api/languages";
