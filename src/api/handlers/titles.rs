//! Handlers for the title catalog.

use axum::{
    Json,
    extract::{Path, State},
    http::{Method, StatusCode},
};

use crate::api::dto::pagination::Paginated;
use crate::api::dto::title::{CreateTitleRequest, TitleQuery, TitleResponse, UpdateTitleRequest};
use crate::api::extract::{QueryParams, ValidatedJson};
use crate::api::middleware::CurrentUser;
use crate::domain::permissions::{Access, IsAdminOrReadOnly, RequestContext, authorize};
use crate::error::AppError;
use crate::state::AppState;

fn require_catalog_write(method: &Method, caller: &CurrentUser) -> Result<(), AppError> {
    authorize(
        &IsAdminOrReadOnly,
        &RequestContext::new(Access::from(method), Some(&caller.0)),
    )
}

/// Lists titles with their category, genres and rating.
///
/// # Endpoint
///
/// `GET /api/v1/titles`
///
/// # Query Parameters
///
/// - `category` - category slug
/// - `genre` - genre slug
/// - `name` - case-insensitive name substring
/// - `year` - exact release year
/// - `page`, `page_size` - pagination
pub async fn list_titles_handler(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<TitleQuery>,
) -> Result<Json<Paginated<TitleResponse>>, AppError> {
    let page = query.pagination.to_page()?;
    let filter = query.filter();

    let (titles, total) = tokio::try_join!(
        state.title_service.list(filter.clone(), page),
        state.title_service.count(filter)
    )?;

    Ok(Json(
        Paginated::new(titles, total, &query.pagination).map(TitleResponse::from),
    ))
}

/// `GET /api/v1/titles/{title_id}`
pub async fn get_title_handler(
    State(state): State<AppState>,
    Path(title_id): Path<i64>,
) -> Result<Json<TitleResponse>, AppError> {
    let title = state.title_service.get(title_id).await?;

    Ok(Json(title.into()))
}

/// Creates a title.
///
/// # Endpoint
///
/// `POST /api/v1/titles`
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Solaris",
///   "year": 1972,
///   "description": "",
///   "category": "movie",
///   "genre": ["drama", "sci-fi"]
/// }
/// ```
///
/// # Response Codes
///
/// - **201 Created**: Title with embedded category and genres, `rating: null`
/// - **400 Bad Request**: Future year, empty genre list or unknown slug
/// - **401 / 403**: Anonymous or non-admin caller
pub async fn create_title_handler(
    State(state): State<AppState>,
    method: Method,
    caller: CurrentUser,
    ValidatedJson(payload): ValidatedJson<CreateTitleRequest>,
) -> Result<(StatusCode, Json<TitleResponse>), AppError> {
    require_catalog_write(&method, &caller)?;

    let title = state.title_service.create(payload.into()).await?;

    tracing::info!(title_id = title.id, "Title created");

    Ok((StatusCode::CREATED, Json(title.into())))
}

/// Partially updates a title. A `genre` list replaces the current set.
///
/// # Endpoint
///
/// `PATCH /api/v1/titles/{title_id}`
pub async fn update_title_handler(
    State(state): State<AppState>,
    method: Method,
    caller: CurrentUser,
    Path(title_id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateTitleRequest>,
) -> Result<Json<TitleResponse>, AppError> {
    require_catalog_write(&method, &caller)?;

    let title = state.title_service.update(title_id, payload.into()).await?;

    tracing::info!(title_id, "Title updated");

    Ok(Json(title.into()))
}

/// Deletes a title with its reviews and their comments.
///
/// # Endpoint
///
/// `DELETE /api/v1/titles/{title_id}`
pub async fn delete_title_handler(
    State(state): State<AppState>,
    method: Method,
    caller: CurrentUser,
    Path(title_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    require_catalog_write(&method, &caller)?;

    state.title_service.delete(title_id).await?;

    tracing::info!(title_id, "Title deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::api::routes::api_routes;
    use crate::domain::entities::{Role, Taxon, Title, TitleFilter};
    use crate::state::testing::{Mocks, sign_in, user};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{Value, json};

    fn server(mocks: Mocks) -> TestServer {
        TestServer::new(api_routes().with_state(mocks.into_state())).unwrap()
    }

    fn taxon(id: i64, slug: &str) -> Taxon {
        Taxon {
            id,
            name: slug.to_string(),
            slug: slug.to_string(),
        }
    }

    fn title(id: i64, rating: Option<i32>) -> Title {
        Title {
            id,
            name: "Solaris".to_string(),
            year: 1972,
            description: String::new(),
            category: taxon(1, "movie"),
            genres: vec![taxon(2, "drama")],
            rating,
        }
    }

    #[tokio::test]
    async fn test_list_passes_filters() {
        let mut mocks = Mocks::default();
        let expected = TitleFilter {
            category: Some("movie".to_string()),
            genre: None,
            name: Some("sol".to_string()),
            year: Some(1972),
        };
        let for_count = expected.clone();
        mocks
            .titles
            .expect_list()
            .withf(move |filter, _| *filter == expected)
            .returning(|_, _| Ok(vec![title(1, Some(9))]));
        mocks
            .titles
            .expect_count()
            .withf(move |filter| *filter == for_count)
            .returning(|_| Ok(1));

        let response = server(mocks)
            .get("/titles")
            .add_query_param("category", "movie")
            .add_query_param("name", "sol")
            .add_query_param("year", "1972")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"][0]["rating"], 9);
        assert_eq!(body["results"][0]["category"], json!({ "name": "movie", "slug": "movie" }));
        assert_eq!(body["results"][0]["genre"][0]["slug"], "drama");
    }

    #[tokio::test]
    async fn test_get_without_reviews_has_null_rating() {
        let mut mocks = Mocks::default();
        mocks
            .titles
            .expect_find_by_id()
            .returning(|id| Ok(Some(title(id, None))));

        let response = server(mocks).get("/titles/5").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["id"], 5);
        assert_eq!(body["rating"], Value::Null);
    }

    #[tokio::test]
    async fn test_get_missing_title() {
        let mut mocks = Mocks::default();
        mocks.titles.expect_find_by_id().returning(|_| Ok(None));

        server(mocks).get("/titles/404").await.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_create_forbidden_for_regular_user() {
        let mut mocks = Mocks::default();
        let tokens = sign_in(&mut mocks.users, vec![user(3, "reader", Role::User)]);

        let response = server(mocks)
            .post("/titles")
            .add_header("Authorization", tokens[0].as_str())
            .json(&json!({ "name": "Solaris", "year": 1972, "category": "movie", "genre": ["drama"] }))
            .await;

        response.assert_status_forbidden();
    }

    #[tokio::test]
    async fn test_admin_creates_title() {
        let mut mocks = Mocks::default();
        let tokens = sign_in(&mut mocks.users, vec![user(1, "boss", Role::Admin)]);
        mocks
            .taxonomy
            .expect_find_by_slug()
            .returning(|_, slug| Ok(Some(taxon(1, slug))));
        mocks
            .taxonomy
            .expect_find_by_slugs()
            .returning(|_, slugs| Ok(vec![taxon(2, &slugs[0])]));
        mocks
            .titles
            .expect_create()
            .withf(|t| t.category_id == 1 && t.genre_ids == vec![2])
            .returning(|_| Ok(title(11, None)));

        let response = server(mocks)
            .post("/titles")
            .add_header("Authorization", tokens[0].as_str())
            .json(&json!({ "name": "Solaris", "year": 1972, "category": "movie", "genre": ["drama"] }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["id"], 11);
    }

    #[tokio::test]
    async fn test_create_with_unknown_category() {
        let mut mocks = Mocks::default();
        let tokens = sign_in(&mut mocks.users, vec![user(1, "boss", Role::Admin)]);
        mocks.taxonomy.expect_find_by_slug().returning(|_, _| Ok(None));

        let response = server(mocks)
            .post("/titles")
            .add_header("Authorization", tokens[0].as_str())
            .json(&json!({ "name": "Solaris", "year": 1972, "category": "opera", "genre": ["drama"] }))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert!(body["error"]["details"]["category"].is_array());
    }

    #[tokio::test]
    async fn test_create_with_empty_genre_list() {
        let mut mocks = Mocks::default();
        let tokens = sign_in(&mut mocks.users, vec![user(1, "boss", Role::Admin)]);

        let response = server(mocks)
            .post("/titles")
            .add_header("Authorization", tokens[0].as_str())
            .json(&json!({ "name": "Solaris", "year": 1972, "category": "movie", "genre": [] }))
            .await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_admin_deletes_title() {
        let mut mocks = Mocks::default();
        let tokens = sign_in(&mut mocks.users, vec![user(1, "boss", Role::Admin)]);
        mocks
            .titles
            .expect_delete()
            .withf(|id| *id == 8)
            .times(1)
            .returning(|_| Ok(()));

        let response = server(mocks)
            .delete("/titles/8")
            .add_header("Authorization", tokens[0].as_str())
            .await;

        response.assert_status(StatusCode::NO_CONTENT);
    }
}
