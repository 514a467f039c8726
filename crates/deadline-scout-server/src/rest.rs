//! HTTP REST API.
//!
//! `GET /search` is the endpoint the presentation UI calls: it builds the
//! query, searches, enriches every hit and answers with the result array.
//! `POST /api/v1/enrich` skips the search step for callers that already have
//! links.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use deadline_scout::{CandidateLink, EnrichedResult};
use serde::Deserialize;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::query::SearchQuery;
use crate::scout::Scout;
use crate::store::StoredRow;

/// Build the axum Router with all REST endpoints.
pub fn router(scout: Arc<Scout>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/search", get(handle_search))
        .route("/api/v1/enrich", post(handle_enrich))
        .route("/api/v1/results", get(handle_results))
        .layer(cors)
        .with_state(scout)
}

/// Serve the REST API until the process is stopped.
pub async fn start(addr: SocketAddr, scout: Arc<Scout>) -> anyhow::Result<()> {
    let app = router(scout);
    tracing::info!("REST API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Error body returned to REST clients.
struct ApiError(anyhow::Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": { "message": format!("{:#}", self.0) }
        });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self(e)
    }
}

// ── Handlers ────────────────────────────────────────────────────

async fn health(State(scout): State<Arc<Scout>>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "search_enabled": scout.has_search(),
        "store_enabled": scout.has_store(),
    }))
}

async fn handle_search(
    State(scout): State<Arc<Scout>>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<EnrichedResult>> {
    Json(scout.search_and_enrich(&query).await)
}

#[derive(Debug, Deserialize)]
struct EnrichRequest {
    candidates: Vec<CandidateLink>,
    #[serde(default)]
    persist: bool,
}

async fn handle_enrich(
    State(scout): State<Arc<Scout>>,
    Json(body): Json<EnrichRequest>,
) -> Json<Vec<EnrichedResult>> {
    Json(scout.enrich(&body.candidates, body.persist).await)
}

#[derive(Debug, Deserialize)]
struct ResultsParams {
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    50
}

async fn handle_results(
    State(scout): State<Arc<Scout>>,
    Query(params): Query<ResultsParams>,
) -> Result<Json<Vec<StoredRow>>, ApiError> {
    Ok(Json(scout.stored_rows(params.limit).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scout::testing::{scout, StubSearch};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    const CFP: &str = "<html><body><p>Deadline: 24th March 2024</p>\n<a href=\"/s\">Submit abstract</a></body></html>";

    async fn call(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = router(Arc::new(scout(None, &[], false)));
        let (status, body) = call(app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["search_enabled"], false);
    }

    #[tokio::test]
    async fn test_search_returns_compat_shape() {
        let search = StubSearch {
            links: vec![
                CandidateLink::new("CFP", "https://cfp.example"),
                CandidateLink::new("Down", "https://down.example"),
            ],
            fail: false,
        };
        let scout = Arc::new(scout(Some(search), &[("https://cfp.example", CFP)], true));
        let app = router(scout.clone());

        let (status, body) = call(
            app,
            get("/search?textBoxQuery=ai&keyword1=workshop&keyword2=&excludeWord=paid"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!([
                {
                    "title": "CFP",
                    "link": "https://cfp.example",
                    "hasSubmissionLinks": true,
                    "expiryDates": ["2024-03-24"]
                },
                {
                    "title": "Down",
                    "link": "https://down.example",
                    "hasSubmissionLinks": false,
                    "expiryDates": []
                }
            ])
        );
        assert_eq!(scout.stored_rows(10).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_search_without_provider_is_empty_array() {
        let app = router(Arc::new(scout(None, &[], false)));
        let (status, body) = call(app, get("/search?keyword1=grant")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_enrich_endpoint() {
        let app = router(Arc::new(scout(None, &[("https://cfp.example", CFP)], false)));
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/enrich")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({
                    "candidates": [{"title": "CFP", "url": "https://cfp.example"}]
                })
                .to_string(),
            ))
            .unwrap();

        let (status, body) = call(app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["hasSubmissionLinks"], true);
        assert_eq!(body[0]["expiryDates"], serde_json::json!(["2024-03-24"]));
    }

    #[tokio::test]
    async fn test_results_endpoint() {
        let scout = Arc::new(scout(None, &[("https://cfp.example", CFP)], true));
        scout
            .enrich(&[CandidateLink::new("CFP", "https://cfp.example")], true)
            .await;

        let (status, body) = call(router(scout), get("/api/v1/results?limit=5")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["title"], "CFP");
        assert_eq!(body[0]["expiryDates"], "2024-03-24");
        assert_eq!(body[0]["hasSubmissionLinks"], true);
    }
}
