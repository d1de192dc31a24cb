use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use simi_db::Dictionary;
use simi_types::{Direction, LexicalRecord};
use thiserror::Error;

pub const DEFAULT_PAGE_SIZE: usize = 50;

#[derive(Clone)]
pub struct AppState {
    pub dictionary: Arc<Dictionary>,
    pub max_page_size: usize,
    pub disable_cache: bool,
}

#[derive(Deserialize)]
pub struct LookupQuery {
    pub lemma: String,
    pub direction: Option<String>,
}

#[derive(Deserialize)]
pub struct LabelQuery {
    pub label: String,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Deserialize)]
pub struct VariantsQuery {
    pub lemma: String,
}

#[derive(Deserialize)]
pub struct LemmasQuery {
    pub direction: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Serialize)]
pub struct LookupResponse<'a> {
    lemma: String,
    direction: Direction,
    entries: Vec<&'a LexicalRecord>,
}

#[derive(Serialize)]
pub struct PageResponse<T> {
    query: String,
    page: usize,
    page_size: usize,
    total: usize,
    has_more: bool,
    items: Vec<T>,
}

#[derive(Serialize)]
pub struct VariantsResponse {
    lemma: String,
    variants: Vec<String>,
}

#[derive(Serialize)]
pub struct LabelsResponse {
    labels: Vec<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/lookup", get(lookup))
        .route("/v1/categories", get(categories))
        .route("/v1/fields", get(fields))
        .route("/v1/category", get(by_category))
        .route("/v1/field", get(by_field))
        .route("/v1/search", get(search))
        .route("/v1/variants", get(variants))
        .route("/v1/lemmas", get(lemmas))
        .route("/v1/counts", get(counts))
        .route("/v1/stats", get(stats))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

async fn lookup(
    State(state): State<AppState>,
    Query(params): Query<LookupQuery>,
) -> Result<Response, ApiError> {
    let direction = parse_direction(params.direction.as_deref())?;
    let entries = state.dictionary.lookup(direction, &params.lemma);
    Ok(respond(
        &state,
        LookupResponse {
            lemma: params.lemma,
            direction,
            entries,
        },
    ))
}

async fn categories(State(state): State<AppState>) -> Response {
    let labels = state.dictionary.category_labels();
    respond(&state, LabelsResponse { labels })
}

async fn fields(State(state): State<AppState>) -> Response {
    let labels = state.dictionary.field_labels();
    respond(&state, LabelsResponse { labels })
}

async fn by_category(
    State(state): State<AppState>,
    Query(params): Query<LabelQuery>,
) -> Result<Response, ApiError> {
    let window = PageWindow::new(params.page, params.page_size, state.max_page_size)?;
    let hits = state.dictionary.by_category(&params.label);
    Ok(respond(&state, window.slice(params.label, hits)))
}

async fn by_field(
    State(state): State<AppState>,
    Query(params): Query<LabelQuery>,
) -> Result<Response, ApiError> {
    let window = PageWindow::new(params.page, params.page_size, state.max_page_size)?;
    let hits = state.dictionary.by_field(&params.label);
    Ok(respond(&state, window.slice(params.label, hits)))
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Response, ApiError> {
    if params.q.trim().is_empty() {
        return Err(ApiError::bad_request("q is required"));
    }
    let window = PageWindow::new(params.page, params.page_size, state.max_page_size)?;
    let hits = state.dictionary.full_text_search(&params.q);
    Ok(respond(&state, window.slice(params.q, hits)))
}

async fn variants(
    State(state): State<AppState>,
    Query(params): Query<VariantsQuery>,
) -> Response {
    let variants = state.dictionary.dialect_variants(&params.lemma);
    respond(
        &state,
        VariantsResponse {
            lemma: params.lemma,
            variants,
        },
    )
}

async fn lemmas(
    State(state): State<AppState>,
    Query(params): Query<LemmasQuery>,
) -> Result<Response, ApiError> {
    let direction = parse_direction(params.direction.as_deref())?;
    let window = PageWindow::new(params.page, params.page_size, state.max_page_size)?;
    let lemmas = state.dictionary.lemmas(direction);
    Ok(respond(&state, window.slice(direction.to_string(), lemmas)))
}

async fn counts(State(state): State<AppState>) -> Response {
    respond(&state, state.dictionary.counts())
}

async fn stats(State(state): State<AppState>) -> Response {
    respond(&state, state.dictionary.statistics())
}

fn parse_direction(raw: Option<&str>) -> Result<Direction, ApiError> {
    match raw {
        None => Ok(Direction::Forward),
        Some(value) => Direction::parse(value)
            .ok_or_else(|| ApiError::bad_request(format!("unknown direction: {value}"))),
    }
}

/// Validated `page`/`page_size` pair; `page` is 1-based.
struct PageWindow {
    page: usize,
    page_size: usize,
}

impl PageWindow {
    fn new(
        page: Option<usize>,
        page_size: Option<usize>,
        max_page_size: usize,
    ) -> Result<Self, ApiError> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(ApiError::bad_request("page must be >= 1"));
        }
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(ApiError::bad_request("page_size must be >= 1"));
        }
        Ok(Self {
            page,
            page_size: page_size.min(max_page_size),
        })
    }

    fn slice<T>(&self, query: String, all: Vec<T>) -> PageResponse<T> {
        let total = all.len();
        let offset = self.page.saturating_sub(1).saturating_mul(self.page_size);
        let items: Vec<T> = all.into_iter().skip(offset).take(self.page_size).collect();
        let has_more = offset + items.len() < total;
        PageResponse {
            query,
            page: self.page,
            page_size: self.page_size,
            total,
            has_more,
            items,
        }
    }
}

/// JSON body with a `Cache-Control` header unless caching is disabled.
fn respond<T: Serialize>(state: &AppState, body: T) -> Response {
    if state.disable_cache {
        return Json(body).into_response();
    }
    (
        [(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=300"),
        )],
        Json(body),
    )
        .into_response()
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    fn bad_request<T: Into<String>>(msg: T) -> Self {
        ApiError::BadRequest(msg.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
        }
    }
}
