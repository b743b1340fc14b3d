//! Handlers for categories and genres.
//!
//! Both collections share one shape: public paginated listing with
//! `?search=`, admin-only create and delete by slug.

use axum::{
    Json,
    extract::{Path, State},
    http::{Method, StatusCode},
};

use crate::api::dto::pagination::{Paginated, SearchParams};
use crate::api::dto::taxon::{CreateTaxonRequest, TaxonResponse};
use crate::api::extract::{QueryParams, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::domain::entities::Taxonomy;
use crate::domain::permissions::{Access, IsAdminOrReadOnly, RequestContext, authorize};
use crate::error::AppError;
use crate::state::AppState;

async fn list(
    state: AppState,
    kind: Taxonomy,
    params: SearchParams,
) -> Result<Json<Paginated<TaxonResponse>>, AppError> {
    let page = params.pagination.to_page()?;
    let search = params.term();

    let (items, total) = tokio::try_join!(
        state.taxonomy_service.list(kind, search.clone(), page),
        state.taxonomy_service.count(kind, search)
    )?;

    Ok(Json(
        Paginated::new(items, total, &params.pagination).map(TaxonResponse::from),
    ))
}

async fn create(
    state: AppState,
    kind: Taxonomy,
    method: Method,
    caller: CurrentUser,
    payload: CreateTaxonRequest,
) -> Result<(StatusCode, Json<TaxonResponse>), AppError> {
    authorize(
        &IsAdminOrReadOnly,
        &RequestContext::new(Access::from(&method), Some(&caller.0)),
    )?;

    let taxon = state.taxonomy_service.create(kind, payload.into()).await?;

    tracing::info!(kind = kind.label(), slug = %taxon.slug, "Taxon created");

    Ok((StatusCode::CREATED, Json(taxon.into())))
}

async fn delete(
    state: AppState,
    kind: Taxonomy,
    method: Method,
    caller: CurrentUser,
    slug: String,
) -> Result<StatusCode, AppError> {
    authorize(
        &IsAdminOrReadOnly,
        &RequestContext::new(Access::from(&method), Some(&caller.0)),
    )?;

    state.taxonomy_service.delete(kind, &slug).await?;

    tracing::info!(kind = kind.label(), slug = %slug, "Taxon deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Lists categories ordered by name.
///
/// # Endpoint
///
/// `GET /api/v1/categories?search=<name>&page=<n>&page_size=<n>`
pub async fn list_categories_handler(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<SearchParams>,
) -> Result<Json<Paginated<TaxonResponse>>, AppError> {
    list(state, Taxonomy::Category, params).await
}

/// Creates a category.
///
/// # Endpoint
///
/// `POST /api/v1/categories`
///
/// # Response Codes
///
/// - **201 Created**
/// - **400 Bad Request**: Malformed or duplicate slug
/// - **401 / 403**: Anonymous or non-admin caller
pub async fn create_category_handler(
    State(state): State<AppState>,
    method: Method,
    caller: CurrentUser,
    ValidatedJson(payload): ValidatedJson<CreateTaxonRequest>,
) -> Result<(StatusCode, Json<TaxonResponse>), AppError> {
    create(state, Taxonomy::Category, method, caller, payload).await
}

/// Deletes a category by slug. Its titles are deleted with it.
///
/// # Endpoint
///
/// `DELETE /api/v1/categories/{slug}`
pub async fn delete_category_handler(
    State(state): State<AppState>,
    method: Method,
    caller: CurrentUser,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    delete(state, Taxonomy::Category, method, caller, slug).await
}

/// `GET /api/v1/genres?search=<name>&page=<n>&page_size=<n>`
pub async fn list_genres_handler(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<SearchParams>,
) -> Result<Json<Paginated<TaxonResponse>>, AppError> {
    list(state, Taxonomy::Genre, params).await
}

/// `POST /api/v1/genres`, admin only.
pub async fn create_genre_handler(
    State(state): State<AppState>,
    method: Method,
    caller: CurrentUser,
    ValidatedJson(payload): ValidatedJson<CreateTaxonRequest>,
) -> Result<(StatusCode, Json<TaxonResponse>), AppError> {
    create(state, Taxonomy::Genre, method, caller, payload).await
}

/// `DELETE /api/v1/genres/{slug}`, admin only. Titles lose the genre.
pub async fn delete_genre_handler(
    State(state): State<AppState>,
    method: Method,
    caller: CurrentUser,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    delete(state, Taxonomy::Genre, method, caller, slug).await
}
