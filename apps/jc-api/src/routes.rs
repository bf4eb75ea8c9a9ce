use axum::{
	Json, Router,
	body::Body,
	extract::{Path, State},
	http::{HeaderMap, Request, StatusCode, header::AUTHORIZATION},
	middleware::{self, Next},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use jc_service::{
	CleanupReport, CrawlReport, Error, KeywordMatches, RankedJob, SearchRequest, StoreStats,
};

use crate::state::AppState;

/// Query used when the client sends a blank title.
const FALLBACK_JOB_TITLE: &str = "job position";

#[derive(Debug, Deserialize)]
pub struct JobSearchBody {
	#[serde(default)]
	pub job_title: String,
	#[serde(default)]
	pub location: Option<String>,
	#[serde(default)]
	pub max_results: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct JobSearchResponse {
	pub jobs: Vec<RankedJob>,
	pub total_count: usize,
	pub query: String,
	pub location: Option<String>,
	pub query_plan: Vec<String>,
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/api/jobs/search", post(search_jobs))
		.route("/api/jobs/debug/stats", get(debug_stats))
		.route("/api/jobs/debug/search_keyword/{keyword}", get(debug_keyword))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/admin/crawl", post(crawl))
		.route("/admin/cleanup", post(cleanup))
		.layer(middleware::from_fn_with_state(state.clone(), admin_auth))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search_jobs(
	State(state): State<AppState>,
	Json(body): Json<JobSearchBody>,
) -> Result<Json<JobSearchResponse>, ApiError> {
	let max_limit = state.service.cfg.search.max_limit;

	if body.max_results.is_some_and(|max_results| max_results == 0 || max_results > max_limit) {
		return Err(ApiError::new(
			StatusCode::BAD_REQUEST,
			"invalid_request",
			format!("max_results must be between 1 and {max_limit}."),
			Some(vec!["max_results".to_string()]),
		));
	}

	let job_title = if body.job_title.trim().is_empty() {
		FALLBACK_JOB_TITLE.to_string()
	} else {
		body.job_title
	};
	let response = state
		.service
		.search(SearchRequest { job_title, location: body.location, limit: body.max_results })
		.await?;

	Ok(Json(JobSearchResponse {
		total_count: response.jobs.len(),
		jobs: response.jobs,
		query: response.query,
		location: response.location,
		query_plan: response.query_plan,
	}))
}

async fn debug_stats(State(state): State<AppState>) -> Result<Json<StoreStats>, ApiError> {
	Ok(Json(state.service.stats().await?))
}

async fn debug_keyword(
	State(state): State<AppState>,
	Path(keyword): Path<String>,
) -> Result<Json<KeywordMatches>, ApiError> {
	Ok(Json(state.service.keyword_matches(&keyword).await?))
}

async fn crawl(State(state): State<AppState>) -> Result<Json<CrawlReport>, ApiError> {
	Ok(Json(state.service.crawl(OffsetDateTime::now_utc()).await?))
}

async fn cleanup(State(state): State<AppState>) -> Result<Json<CleanupReport>, ApiError> {
	Ok(Json(state.service.cleanup(OffsetDateTime::now_utc()).await?))
}

async fn admin_auth(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
	let Some(expected) = state.service.cfg.security.admin_auth_token.as_deref() else {
		return next.run(req).await;
	};

	if read_bearer_token(req.headers()) != Some(expected) {
		return ApiError::new(
			StatusCode::UNAUTHORIZED,
			"unauthorized",
			"A valid admin bearer token is required.",
			None,
		)
		.into_response();
	}

	next.run(req).await
}

fn read_bearer_token(headers: &HeaderMap) -> Option<&str> {
	let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
	let token = value.strip_prefix("Bearer ")?.trim();

	if token.is_empty() { None } else { Some(token) }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } =>
				Self::new(StatusCode::BAD_REQUEST, "invalid_request", message, None),
			Error::StoreUnavailable { message } =>
				Self::new(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", message, None),
			err => {
				tracing::error!(error = %err, "Request failed.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", err.to_string(), None)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}
