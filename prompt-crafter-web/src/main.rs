use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, patch, post, put},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use veo_prompt_crafter::{
    CopyTarget, CrafterConfig, FieldDefinition, FieldId, FieldValues, MtError, PromptCrafter,
    SessionError, SessionSnapshot, definition, field_registry,
};

const BIND_VAR: &str = "PROMPT_CRAFTER_BIND";
const STATIC_DIR_VAR: &str = "PROMPT_CRAFTER_STATIC_DIR";
const DEFAULT_BIND: &str = "127.0.0.1:3000";
const DEFAULT_STATIC_DIR: &str = "prompt-crafter-web/src/static";

#[derive(Serialize, Deserialize)]
pub struct FieldUpdate {
    pub value: String,
}

#[derive(Serialize, Deserialize)]
pub struct SourceUpdate {
    pub text: String,
}

#[derive(Serialize, Deserialize)]
pub struct CopyRequest {
    pub target: CopyTarget,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionSnapshot>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            session: None,
        }),
    )
}

#[derive(Clone)]
pub struct AppState {
    pub crafter: Arc<PromptCrafter>,
}

fn app(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/api/fields", get(list_fields).put(replace_fields))
        .route("/api/fields/{id}", patch(set_field))
        .route("/api/session", get(get_session))
        .route("/api/source", put(edit_source))
        .route("/api/craft", post(craft))
        .route("/api/retranslate", post(retranslate))
        .route("/api/copy", post(mark_copied))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("info".parse()?),
        )
        .init();

    let config = CrafterConfig::from_env()
        .map_err(|e| format!("Failed to read configuration: {}", e))?;
    let crafter = PromptCrafter::from_config(&config);
    if !crafter.gateway().is_available() {
        warn!("Serving without translation: set GEMINI_API_KEY to enable it");
    }
    let state = AppState {
        crafter: Arc::new(crafter),
    };

    let bind = std::env::var(BIND_VAR).unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let static_dir =
        std::env::var(STATIC_DIR_VAR).unwrap_or_else(|_| DEFAULT_STATIC_DIR.to_string());

    info!("🎬 Starting Veo Prompt Crafter");

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("🚀 Server running at http://{}", bind);

    axum::serve(listener, app(state, &static_dir)).await?;

    Ok(())
}

async fn serve_index() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        include_str!("static/index.html"),
    )
}

async fn list_fields() -> Json<&'static [FieldDefinition]> {
    Json(field_registry())
}

async fn get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.crafter.snapshot())
}

fn check_choice(id: FieldId, value: &str) -> Result<(), ApiError> {
    if definition(id).allows(value) {
        Ok(())
    } else {
        Err(api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("'{}' is not a valid choice for {}", value, id),
        ))
    }
}

async fn replace_fields(
    State(state): State<AppState>,
    Json(values): Json<FieldValues>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    for id in FieldId::ALL {
        check_choice(id, values.get(id))?;
    }
    Ok(Json(state.crafter.with_session(|s| {
        s.set_values(values);
        s.snapshot()
    })))
}

async fn set_field(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<FieldUpdate>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let id: FieldId = id
        .parse()
        .map_err(|e| api_error(StatusCode::NOT_FOUND, format!("{}", e)))?;
    check_choice(id, &update.value)?;

    Ok(Json(state.crafter.with_session(|s| {
        s.set_field(id, update.value);
        s.snapshot()
    })))
}

async fn edit_source(
    State(state): State<AppState>,
    Json(update): Json<SourceUpdate>,
) -> Json<SessionSnapshot> {
    Json(state.crafter.with_session(|s| {
        s.edit_source(update.text);
        s.snapshot()
    }))
}

/// Map a refused or failed translation to a status code, carrying the
/// session so the page can still render the assembled prompt.
fn translation_error(state: &AppState, err: SessionError) -> ApiError {
    let status = match &err {
        SessionError::Busy => StatusCode::CONFLICT,
        SessionError::Translation(MtError::TranslationFailed(_)) => StatusCode::BAD_GATEWAY,
        SessionError::Translation(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    let snapshot = state.crafter.snapshot();
    let error = snapshot.error.clone().unwrap_or_else(|| err.to_string());
    (
        status,
        Json(ErrorResponse {
            error,
            session: Some(snapshot),
        }),
    )
}

/// Craft from the stored values, or from the values in the body when given.
async fn craft(
    State(state): State<AppState>,
    body: Option<Json<FieldValues>>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let result = match body {
        Some(Json(values)) => {
            for id in FieldId::ALL {
                check_choice(id, values.get(id))?;
            }
            state.crafter.craft_with(values).await
        }
        None => state.crafter.craft().await,
    };
    match result {
        Ok(_) => Ok(Json(state.crafter.snapshot())),
        Err(e) => Err(translation_error(&state, e)),
    }
}

/// Translate the stored prompt, or the text in the body when given.
async fn retranslate(
    State(state): State<AppState>,
    body: Option<Json<SourceUpdate>>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let result = match body {
        Some(Json(update)) => state.crafter.retranslate_text(update.text).await,
        None => state.crafter.retranslate().await,
    };
    match result {
        Ok(_) => Ok(Json(state.crafter.snapshot())),
        Err(e) => Err(translation_error(&state, e)),
    }
}

async fn mark_copied(
    State(state): State<AppState>,
    Json(request): Json<CopyRequest>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let (copied, snapshot) = state.crafter.with_session(|s| {
        let copied = s.mark_copied(request.target);
        (copied, s.snapshot())
    });

    if copied {
        Ok(Json(snapshot))
    } else {
        Err(api_error(StatusCode::CONFLICT, "Nothing to copy"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use veo_prompt_crafter::TranslationGateway;
    use veo_prompt_crafter::mt::{MockGenerator, MockMode};

    fn test_app(gateway: TranslationGateway) -> Router {
        let state = AppState {
            crafter: Arc::new(PromptCrafter::new(gateway)),
        };
        app(state, "does-not-exist")
    }

    fn echo_app() -> Router {
        let mock = Arc::new(MockGenerator::new(MockMode::EchoSource));
        test_app(TranslationGateway::new(mock, "English", "Indonesian"))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_list_fields() {
        let app = echo_app();
        let (status, body) = send(&app, "GET", "/api/fields", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), FieldId::ALL.len());
        assert_eq!(body[0]["id"], "subject");
    }

    #[tokio::test]
    async fn test_set_field_then_craft() {
        let app = echo_app();
        let (status, _) = send(
            &app,
            "PATCH",
            "/api/fields/spokenLine",
            Some(json!({ "value": "Hello there!" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, "POST", "/api/craft", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["sourceText"].as_str().unwrap().contains("{{Hello there!}}"));
        assert!(body["translatedText"].as_str().unwrap().contains("{{Hello there!}}"));
        assert_eq!(body["status"], "succeeded");
    }

    #[tokio::test]
    async fn test_unknown_field_is_not_found() {
        let app = echo_app();
        let (status, body) = send(
            &app,
            "PATCH",
            "/api/fields/colour",
            Some(json!({ "value": "red" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("colour"));
    }

    #[tokio::test]
    async fn test_invalid_choice_rejected() {
        let app = echo_app();
        let (status, _) = send(
            &app,
            "PUT",
            "/api/fields",
            Some(json!({ "subject": "a cat", "mood": "furious" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_edit_source_then_retranslate() {
        let app = echo_app();
        send(&app, "PUT", "/api/source", Some(json!({ "text": "Edited {{Hi}}" }))).await;
        let (status, body) = send(&app, "POST", "/api/retranslate", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["translatedText"], "Edited {{Hi}}");
    }

    #[tokio::test]
    async fn test_craft_without_gateway_is_unavailable() {
        let app = test_app(TranslationGateway::unavailable("API key is not configured"));
        let (status, body) = send(&app, "POST", "/api/craft", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["session"]["gatewayAvailable"], false);
        assert!(body["session"]["sourceText"].as_str().unwrap().ends_with("visually stunning."));
    }

    #[tokio::test]
    async fn test_retranslate_with_text_uses_that_text() {
        let app = echo_app();
        send(&app, "PUT", "/api/source", Some(json!({ "text": "stale" }))).await;
        let (status, body) = send(
            &app,
            "POST",
            "/api/retranslate",
            Some(json!({ "text": "Fresh {{Hi}}" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sourceText"], "Fresh {{Hi}}");
        assert_eq!(body["translatedText"], "Fresh {{Hi}}");
    }

    #[tokio::test]
    async fn test_craft_with_values_uses_those_values() {
        let app = echo_app();
        send(
            &app,
            "PATCH",
            "/api/fields/subject",
            Some(json!({ "value": "a dog" })),
        )
        .await;
        let (status, body) = send(
            &app,
            "POST",
            "/api/craft",
            Some(json!({ "subject": "a cat", "spokenLine": "Meow" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["values"]["subject"], "a cat");
        assert!(body["sourceText"].as_str().unwrap().starts_with("Visualize a scene featuring a cat."));
        assert!(body["translatedText"].as_str().unwrap().contains("{{Meow}}"));
    }

    #[tokio::test]
    async fn test_craft_with_invalid_choice_rejected() {
        let app = echo_app();
        let (status, _) = send(&app, "POST", "/api/craft", Some(json!({ "lighting": "strobe" }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_craft_without_gateway_still_assembles() {
        let app = test_app(TranslationGateway::unavailable("API key is not configured"));
        let (status, body) = send(
            &app,
            "POST",
            "/api/craft",
            Some(json!({ "subject": "a cat", "action": "sleeping", "place": "a sofa" })),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].as_str().unwrap().contains("API key not configured"));
        assert!(
            body["session"]["sourceText"]
                .as_str()
                .unwrap()
                .starts_with("Visualize a scene featuring a cat sleeping. Set in a sofa.")
        );
        assert_eq!(body["session"]["translatedText"], "");
    }

    #[tokio::test]
    async fn test_provider_failure_is_bad_gateway() {
        let mock = Arc::new(MockGenerator::new(MockMode::Error("boom".to_string())));
        let app = test_app(TranslationGateway::new(mock, "English", "Indonesian"));
        let (status, body) = send(&app, "POST", "/api/craft", None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["session"]["status"], "failed");
    }

    #[tokio::test]
    async fn test_copy_flags() {
        let app = echo_app();
        let (status, _) = send(&app, "POST", "/api/copy", Some(json!({ "target": "source" }))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        send(&app, "POST", "/api/craft", None).await;
        let (status, body) = send(&app, "POST", "/api/copy", Some(json!({ "target": "source" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sourceCopied"], true);
        assert_eq!(body["translationCopied"], false);
    }
}
