pub mod language;
mod paging;

use langrec_dal::LanguageStore;
pub use paging::{Page, Paging};

use crate::state::AppState;

/// All REST API routes, mounted at their final paths
pub fn api_router<S: LanguageStore>() -> axum::Router<AppState<S>> {
    axum::Router::new().nest(crate::LANGUAGES_API_PATH, language::router())
}

#[cfg(feature = "openapi")]
pub fn api_docs() -> utoipa::openapi::OpenApi {
    use utoipa::OpenApi as _;

    #[derive(utoipa::OpenApi)]
    #[openapi(info(title = "Programming languages API"))]
    struct ApiDocs;

    ApiDocs::openapi().nest(crate::LANGUAGES_API_PATH, language::api_docs())
}
