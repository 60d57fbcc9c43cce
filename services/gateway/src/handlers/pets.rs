use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::Value;
use tracing::info;
use types::embed::Embed;
use types::record::PetRecord;

/// `POST /pets`: extract one record per embed and store them.
///
/// Rejects the whole batch, before touching the store, when the body has
/// no `embeds` array.
pub async fn ingest_pets(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(body) = payload?;

    let embeds: Vec<Embed> = body
        .get("embeds")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::BadRequest("Request body must contain an embeds array".into()))?
        .iter()
        .map(Embed::from_json)
        .collect();

    let now = state.clock.now_ms();
    let records = state.extractor.extract_batch(&embeds, now);
    let received = records.len();

    let total = {
        let mut store = state.store()?;
        for record in records {
            store.append(record);
        }
        store.prune(now);
        store.len()
    };

    info!(received, total, "New pet embeds received");
    Ok(StatusCode::OK)
}

/// `GET /latest-pets`: retained records, most recent first.
pub async fn latest_pets(State(state): State<AppState>) -> Result<Json<Vec<PetRecord>>, AppError> {
    let now = state.clock.now_ms();
    let mut store = state.store()?;
    store.prune(now);
    Ok(Json(store.list_descending()))
}

#[cfg(test)]
mod tests {
    use crate::clock::testing::FixedClock;
    use crate::router::create_router;
    use crate::state::AppState;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;
    use types::variant::ParserVariant;

    const T: i64 = 1_708_123_456_789;

    fn test_app() -> (Router, AppState, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(T));
        let state = AppState::with_clock(ParserVariant::QuickJoin, clock.clone());
        (create_router(state.clone()), state, clock)
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/pets")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn get_latest(app: &Router) -> Vec<Value> {
        let res = app
            .clone()
            .oneshot(Request::get("/latest-pets").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice::<Vec<Value>>(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_ingest_and_read_back() {
        let (app, _, _) = test_app();
        let body = json!({
            "embeds": [{
                "title": "Secret pet",
                "description": "🏷️ **Name:** Graipuss Medussi\nplaceId=109983668079237&gameInstanceId=ab-12",
                "color": 16711680,
                "thumbnail": { "url": "https://cdn.example/p.png" },
                "footer": { "text": "v1" }
            }]
        });

        let res = app.clone().oneshot(post_json(&body.to_string())).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let pets = get_latest(&app).await;
        assert_eq!(pets.len(), 1);
        let pet = &pets[0];
        assert_eq!(pet["receivedAt"], T);
        assert_eq!(pet["name"], "Graipuss Medussi");
        assert_eq!(pet["placeId"], "109983668079237");
        assert_eq!(pet["jobId"], "ab-12");
        assert_eq!(pet["title"], "Secret pet");
        assert_eq!(pet["color"], 16711680);
        assert_eq!(pet["thumbnailUrl"], "https://cdn.example/p.png");
        assert_eq!(pet["footerText"], "v1");
        assert!(pet["quickJoinUrl"].as_str().unwrap().contains("gameInstanceId=ab-12"));
        assert!(pet.get("mutation").is_none());
    }

    #[tokio::test]
    async fn test_missing_embeds_rejected_and_store_unchanged() {
        let (app, _, clock) = test_app();

        let seed = json!({ "embeds": [{ "description": "🏷️ **Name:** Kept" }] });
        let res = app.clone().oneshot(post_json(&seed.to_string())).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        // Still inside the retention window
        clock.set(T + 30_000);

        for body in [r#"{}"#, r#"{"embeds": "nope"}"#, r#"null"#, r#"not json"#] {
            let res = app.clone().oneshot(post_json(body)).await.unwrap();
            assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body: {body}");
        }

        let res = app
            .clone()
            .oneshot(
                Request::post("/pets")
                    .body(Body::from(r#"{"embeds": []}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "missing content type");

        let pets = get_latest(&app).await;
        assert_eq!(pets.len(), 1);
        assert_eq!(pets[0]["name"], "Kept");
        assert_eq!(pets[0]["receivedAt"], T);
    }

    #[tokio::test]
    async fn test_bad_request_body_shape() {
        let (app, _, _) = test_app();
        let res = app.oneshot(post_json("{}")).await.unwrap();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_empty_and_malformed_embeds_accepted() {
        let (app, state, _) = test_app();

        let res = app.clone().oneshot(post_json(r#"{"embeds": []}"#)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(state.store().unwrap().is_empty());

        let res = app
            .clone()
            .oneshot(post_json(r#"{"embeds": [42, {"title": 7, "description": null}]}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(state.store().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_latest_is_descending_and_windowed() {
        let (app, _, clock) = test_app();
        let minute = 60_000;

        for (offset, name) in [(0, "one"), (minute, "two"), (2 * minute, "three")] {
            clock.set(T + offset);
            let body = json!({ "embeds": [{ "description": format!("🏷️ **Name:** {name}") }] });
            app.clone().oneshot(post_json(&body.to_string())).await.unwrap();
        }

        let names: Vec<_> = get_latest(&app)
            .await
            .iter()
            .map(|p| p["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["three", "two", "one"]);

        // "one" was received at T: still visible at T+5:59, gone at T+6:01.
        clock.set(T + 5 * minute + 59_000);
        assert_eq!(get_latest(&app).await.len(), 3);

        clock.set(T + 6 * minute + 1_000);
        let pets = get_latest(&app).await;
        assert_eq!(pets.len(), 2);
        assert_eq!(pets[1]["name"], "two");
    }
}
