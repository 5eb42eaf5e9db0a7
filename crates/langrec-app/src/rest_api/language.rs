use langrec_dal::LanguageStore;

use crate::state::AppState;
use axum::routing::get;

#[cfg(feature = "openapi")]
#[derive(utoipa::OpenApi)]
#[openapi(paths(
    crud_api::list,
    crud_api::get,
    crud_api::create,
    crud_api::update,
    crud_api::delete
))]
struct ModuleDocs;

#[cfg(feature = "openapi")]
pub fn api_docs() -> utoipa::openapi::OpenApi {
    use utoipa::OpenApi as _;
    ModuleDocs::openapi()
}

pub fn router<S: LanguageStore>() -> axum::Router<AppState<S>> {
    axum::Router::new()
        .route("/", get(crud_api::list::<S>).post(crud_api::create::<S>))
        .route(
            "/{id}",
            get(crud_api::get::<S>)
                .put(crud_api::update::<S>)
                .delete(crud_api::delete::<S>),
        )
}

pub mod crud_api {
    use crate::error::{ApiError, ApiResult};
    use crate::rest_api::Paging;
    use crate::state::AppState;
    use crate::validate::Garde;
    use axum::{
        extract::{Path, Query, State},
        response::IntoResponse,
        Json,
    };
    use http::{header, StatusCode};
    #[cfg_attr(not(feature = "openapi"), allow(unused_imports))]
    use langrec_dal::language::{CreateLanguage, Language, UpdateLanguage};
    use langrec_dal::LanguageStore;
    use tracing::debug;

    #[cfg_attr(feature = "openapi",  utoipa::path(get, path = "", tag = "Language", operation_id = "listLanguages",
        params(Paging), responses((status = StatusCode::OK, description = "List paginated, optionally filtered", body = crate::rest_api::Page<Language>))))]
    pub async fn list<S: LanguageStore>(
        State(state): State<AppState<S>>,
        Garde(Query(paging)): Garde<Query<Paging>>,
    ) -> ApiResult<impl IntoResponse> {
        let default_page_size = state.config().default_page_size;
        let page_size = paging.page_size(default_page_size);
        let listing_params = paging.into_listing_params(default_page_size)?;
        let batch = state.store().list(listing_params).await?;
        Ok((
            StatusCode::OK,
            Json(crate::rest_api::Page::from_batch(batch, page_size)),
        ))
    }

    #[cfg_attr(feature = "openapi",  utoipa::path(get, path = "/{id}", tag = "Language", operation_id = "getLanguage",
        responses((status = StatusCode::OK, description = "Get one", body = Language),
        (status = StatusCode::NOT_FOUND, description = "No such language"))))]
    pub async fn get<S: LanguageStore>(
        Path(id): Path<i64>,
        State(state): State<AppState<S>>,
    ) -> ApiResult<impl IntoResponse> {
        let record = state.store().get(id).await?;

        Ok((StatusCode::OK, Json(record)))
    }

    #[cfg_attr(feature = "openapi",  utoipa::path(post, path = "", tag = "Language", operation_id = "createLanguage",
        request_body = CreateLanguage,
        responses((status = StatusCode::CREATED, description = "Created Language", body = Language,
        headers(("Location" = String, description = "URL of created record"))))))]
    pub async fn create<S: LanguageStore>(
        State(state): State<AppState<S>>,
        Garde(Json(payload)): Garde<Json<CreateLanguage>>,
    ) -> ApiResult<impl IntoResponse> {
        let record = state.store().create(payload).await?;
        debug!("Created language {} with id {}", record.name, record.id);
        let location = format!("{}/{}", crate::LANGUAGES_API_PATH, record.id);

        Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(record)))
    }

    #[cfg_attr(feature = "openapi",  utoipa::path(put, path = "/{id}", tag = "Language", operation_id = "updateLanguage",
        request_body = UpdateLanguage,
        responses((status = StatusCode::NO_CONTENT, description = "Updated Language"),
        (status = StatusCode::BAD_REQUEST, description = "Record id differs from path id"),
        (status = StatusCode::NOT_FOUND, description = "No such language"),
        (status = StatusCode::CONFLICT, description = "Language was modified concurrently"))))]
    pub async fn update<S: LanguageStore>(
        Path(id): Path<i64>,
        State(state): State<AppState<S>>,
        Garde(Json(payload)): Garde<Json<UpdateLanguage>>,
    ) -> ApiResult<impl IntoResponse> {
        if id != payload.id {
            return Err(ApiError::IdMismatch {
                path_id: id,
                record_id: payload.id,
            });
        }

        match state.store().update(id, payload).await {
            Ok(record) => {
                debug!("Updated language {id} to version {}", record.version);
                Ok(StatusCode::NO_CONTENT)
            }
            Err(e @ langrec_dal::Error::FailedUpdate { .. }) => {
                if state.store().exists(id).await? {
                    Err(e.into())
                } else {
                    Err(ApiError::ResourceNotFound(format!("Language {id}")))
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    #[cfg_attr(feature = "openapi",  utoipa::path(delete, path = "/{id}", tag = "Language", operation_id = "deleteLanguage",
        responses((status = StatusCode::NO_CONTENT, description = "Deleted Language"),
        (status = StatusCode::NOT_FOUND, description = "No such language"))))]
    pub async fn delete<S: LanguageStore>(
        Path(id): Path<i64>,
        State(state): State<AppState<S>>,
    ) -> ApiResult<impl IntoResponse> {
        state.store().delete(id).await?;

        Ok(StatusCode::NO_CONTENT)
    }
}
