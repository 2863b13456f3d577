use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Settings;
use crate::error::{ApiError, Result};
use crate::synthesize::{Synthesizer, pick_author};
use crate::transcript::TranscriptClient;
use crate::{ApiResponse, Article, Quote, extract_video_id};

pub const HOME_MESSAGE: &str = "Serveri punon! Duhet API KEY per te vazhduar.";

/// Components shared by every handler, built once at startup
#[derive(Clone)]
pub struct AppState {
    transcripts: Arc<TranscriptClient>,
    synthesizer: Arc<Synthesizer>,
}

impl AppState {
    pub fn new(transcripts: TranscriptClient, synthesizer: Synthesizer) -> Self {
        Self {
            transcripts: Arc::new(transcripts),
            synthesizer: Arc::new(synthesizer),
        }
    }

    pub fn from_settings(http: reqwest::Client, settings: &Settings) -> Self {
        Self::new(
            TranscriptClient::new(http.clone(), settings),
            Synthesizer::new(http, settings),
        )
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TranscriptRequest {
    pub url: Option<serde_json::Value>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(home))
        .route("/api/daily-quote", get(daily_quote))
        .route("/api/get-transcript", post(get_transcript))
        .layer(cors)
        .with_state(state)
}

async fn home() -> &'static str {
    HOME_MESSAGE
}

async fn daily_quote(State(state): State<AppState>) -> Result<Json<ApiResponse<Quote>>> {
    let author = pick_author();
    info!("Daily quote requested, author: {author}");
    let quote = state.synthesizer.quote(author).await?;
    Ok(Json(ApiResponse::ok(quote)))
}

async fn get_transcript(
    State(state): State<AppState>,
    payload: core::result::Result<Json<TranscriptRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Article>>> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!("Unreadable request body: {rejection}");
            TranscriptRequest::default()
        }
    };

    // Present but not a string is a bad link, not a missing one
    let video_id = match request.url {
        None | Some(Value::Null) => return Err(ApiError::MissingUrl),
        Some(Value::String(url)) if url.is_empty() => return Err(ApiError::MissingUrl),
        Some(Value::String(url)) => extract_video_id(&url),
        Some(_) => None,
    }
    .ok_or(ApiError::InvalidUrl)?;
    info!("Article requested for video {video_id}");

    let transcript = state.transcripts.fetch(&video_id).await?;
    let article = state.synthesizer.article(&transcript).await?;
    Ok(Json(ApiResponse::ok(article)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesize::AUTHORS;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use serde_json::json;
    use tower::ServiceExt;

    fn app(settings: &Settings) -> Router {
        router(AppState::from_settings(reqwest::Client::new(), settings))
    }

    fn settings_for(server: &mockito::ServerGuard) -> Settings {
        Settings {
            openai_api_key: Some("sk-test".to_string()),
            openai_base_url: server.url(),
            transcript_api_key: Some("rk-test".to_string()),
            transcript_host: Some("transcripts.example.com".to_string()),
            transcript_base_url: Some(server.url()),
            ..Settings::default()
        }
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/get-transcript")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn completion_body(content: &str) -> String {
        json!({"choices": [{"message": {"role": "assistant", "content": content}}]}).to_string()
    }

    #[tokio::test]
    async fn test_home() {
        let response = app(&Settings::default()).oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], HOME_MESSAGE.as_bytes());
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let request = Request::builder()
            .uri("/")
            .header("origin", "https://client.example.com")
            .body(Body::empty())
            .unwrap();
        let response = app(&Settings::default()).oneshot(request).await.unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_missing_url() {
        let response = app(&Settings::default())
            .oneshot(post_json("{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({"error": "Mungon linku"}));
    }

    #[tokio::test]
    async fn test_empty_url_counts_as_missing() {
        let response = app(&Settings::default())
            .oneshot(post_json(r#"{"url": ""}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({"error": "Mungon linku"}));
    }

    #[tokio::test]
    async fn test_unreadable_body_counts_as_missing() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/get-transcript")
            .body(Body::from("url=https://youtu.be/abc"))
            .unwrap();
        let response = app(&Settings::default()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({"error": "Mungon linku"}));
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let response = app(&Settings::default())
            .oneshot(post_json(r#"{"url": "https://example.com/"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({"error": "Linku jo i sakte"}));
    }

    #[tokio::test]
    async fn test_null_url_counts_as_missing() {
        let response = app(&Settings::default())
            .oneshot(post_json(r#"{"url": null}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({"error": "Mungon linku"}));
    }

    #[tokio::test]
    async fn test_non_string_url_is_invalid() {
        let response = app(&Settings::default())
            .oneshot(post_json(r#"{"url": 123}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, json!({"error": "Linku jo i sakte"}));
    }

    #[tokio::test]
    async fn test_missing_transcript_credentials_is_server_error() {
        let response = app(&Settings::default())
            .oneshot(post_json(r#"{"url": "https://youtu.be/dQw4w9WgXcQ"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("RAPIDAPI_KEY"));
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn test_get_transcript_success() {
        let mut server = mockito::Server::new_async().await;
        let transcript = server
            .mock("GET", "/api/transcript")
            .match_query(mockito::Matcher::UrlEncoded("videoId".into(), "dQw4w9WgXcQ".into()))
            .with_status(200)
            .with_body(r#"[{"text":"hello"},{"text":"world"}]"#)
            .create_async()
            .await;
        let completion = server
            .mock("POST", "/chat/completions")
            .match_body(mockito::Matcher::Regex("hello world".to_string()))
            .with_status(200)
            .with_body(completion_body(
                r#"{"title":"Përshëndetje","sections":[{"headline":"Hyrje","content":"Botë"}]}"#,
            ))
            .create_async()
            .await;

        let response = app(&settings_for(&server))
            .oneshot(post_json(
                r#"{"url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({
                "success": true,
                "data": {
                    "title": "Përshëndetje",
                    "sections": [{"headline": "Hyrje", "content": "Botë"}]
                }
            })
        );
        transcript.assert_async().await;
        completion.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_transcript_malformed_llm_output() {
        let mut server = mockito::Server::new_async().await;
        let _transcript = server
            .mock("GET", "/api/transcript")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"content":[{"text":"hello"}]}"#)
            .create_async()
            .await;
        let _completion = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(completion_body("{not json"))
            .create_async()
            .await;

        let response = app(&settings_for(&server))
            .oneshot(post_json(r#"{"url": "https://youtu.be/dQw4w9WgXcQ"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("not valid JSON"));
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn test_daily_quote_author_from_list() {
        let mut server = mockito::Server::new_async().await;
        let _completion = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(completion_body(
                r#"{"quote":"Beso në vetvete.","author":"Unknown","context":"Një fjali."}"#,
            ))
            .create_async()
            .await;

        let response = app(&settings_for(&server))
            .oneshot(get_request("/api/daily-quote"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"]["quote"], json!("Beso në vetvete."));
        let author = body["data"]["author"].as_str().unwrap();
        assert!(AUTHORS.contains(&author));
    }

    #[tokio::test]
    async fn test_daily_quote_backend_failure() {
        let mut server = mockito::Server::new_async().await;
        let _completion = server
            .mock("POST", "/chat/completions")
            .with_status(503)
            .with_body("upstream timeout")
            .create_async()
            .await;

        let response = app(&settings_for(&server))
            .oneshot(get_request("/api/daily-quote"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("upstream timeout"));
        assert!(body.get("data").is_none());
    }
}
