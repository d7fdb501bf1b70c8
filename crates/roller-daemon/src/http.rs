use crate::store::RollLog;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use roller_proto::feed::RECORDS_PER_PAGE;
use roller_proto::notation::parse_roll;
use roller_proto::records::RollRecord;
use roller_proto::roll::perform_roll;
use roller_proto::slug::slug_to_id;
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::{error, info};
use tower_http::cors::CorsLayer;

#[derive(Clone)]
struct HttpState {
    log: RollLog,
}

#[derive(Deserialize)]
struct RollListQuery {
    since: Option<i64>,
    user: Option<String>,
    n: Option<usize>,
}

#[derive(Deserialize)]
struct RollQuery {
    user: Option<String>,
}

pub fn router(log: RollLog) -> Router {
    let state = HttpState { log };
    Router::new()
        .route("/rolls.json", get(list_rolls))
        .route("/roll/:roll_req", get(roll))
        .route("/rolled/:slug", get(permalink))
        // Browser clients poll from other origins.
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(bind_address: String, port: u16, log: RollLog) -> anyhow::Result<()> {
    let addr = format!("{}:{}", bind_address, port);
    let listener = TcpListener::bind(&addr).await?;
    info!("HTTP API server listening on http://{}", addr);
    axum::serve(listener, router(log)).await?;
    Ok(())
}

/// `GET /rolls.json[?since=&user=&n=]` — the roll history, newest page by
/// default, or everything strictly newer than `since` (ascending).
async fn list_rolls(
    State(state): State<HttpState>,
    Query(query): Query<RollListQuery>,
) -> Json<Vec<RollRecord>> {
    let limit = match query.n {
        Some(n) if n > 0 && n < RECORDS_PER_PAGE => n,
        _ => RECORDS_PER_PAGE,
    };
    let records = state
        .log
        .records_since(query.since.unwrap_or(0), query.user.as_deref(), limit)
        .await;
    Json(records)
}

/// `GET /roll/:roll_req` — parse a dice-notation request, roll it, record it.
async fn roll(
    State(state): State<HttpState>,
    Path(roll_req): Path<String>,
    Query(query): Query<RollQuery>,
) -> Result<Json<RollRecord>, (StatusCode, String)> {
    let def = parse_roll(&roll_req).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let result = perform_roll(&def);
    let user = query.user.unwrap_or_else(|| "anon".to_string());

    let record = state.log.append(def, result, user).await.map_err(|e| {
        error!("failed to record roll: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    info!(
        "rolled {} for {}: total {} ({})",
        record.request.text,
        record.user,
        record.result.total,
        record.slug()
    );
    Ok(Json(record))
}

/// `GET /rolled/:slug` — permalink lookup by base-36 slug.
async fn permalink(
    State(state): State<HttpState>,
    Path(slug): Path<String>,
) -> Result<Json<RollRecord>, StatusCode> {
    let seq_id = slug_to_id(&slug);
    match state.log.find_by_seq(seq_id).await {
        Some(mut record) => {
            record.permalink = true;
            Ok(Json(record))
        }
        None => Err(StatusCode::NOT_FOUND),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_router(dir: &tempfile::TempDir) -> Router {
        router(RollLog::load(dir.path().join("rolls.json")))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(router: &Router, uri: &str) -> T {
        let response = router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.status().is_success(), "GET {} failed", uri);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_rolls_json_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_router(&dir);
        let records: Vec<RollRecord> = get_json(&router, "/rolls.json").await;
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_roll_then_poll_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_router(&dir);

        let record: RollRecord = get_json(&router, "/roll/2d6+1?user=alice").await;
        assert_eq!(record.seq_id, 1);
        assert_eq!(record.user, "alice");
        assert_eq!(record.request.modifier, 1);

        let page: Vec<RollRecord> = get_json(&router, "/rolls.json").await;
        assert_eq!(page.len(), 1);

        // The poll cursor excludes already-seen records.
        let newer: Vec<RollRecord> = get_json(&router, "/rolls.json?since=1").await;
        assert!(newer.is_empty());
    }

    #[tokio::test]
    async fn test_bad_notation_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_router(&dir);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/roll/garbage")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_permalink_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_router(&dir);

        let record: RollRecord = get_json(&router, "/roll/1d20").await;
        let found: RollRecord = get_json(&router, &format!("/rolled/{}", record.slug())).await;
        assert_eq!(found.seq_id, record.seq_id);
        assert!(found.permalink);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/rolled/zzzz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
