use crate::config::{AppConfig, RunMode};
use crate::embed::{BootstrapOptions, bootstrap_into_shell};
use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Minimal shell served when no `assets/preview.html` override exists.
const PREVIEW_SHELL: &str = "<!doctype html>\n<html>\n  <head><meta charset=\"utf-8\"><title>Chatbox preview</title></head>\n  <body>\n    <div id=\"app\"></div>\n  </body>\n</html>\n";

fn widget_shell(mount_id: &str) -> String {
    format!(
        "<!doctype html>\n<html>\n  <head><meta charset=\"utf-8\"><title>Chatbox</title></head>\n  <body>\n    <div id=\"{mount_id}\"></div>\n  </body>\n</html>\n"
    )
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// The standalone preview route only exists in standalone mode; embedded
/// mode keeps the surface passive and leaves the bootstrap to the host page.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/widget", get(serve_widget))
        .route("/embed.js", get(serve_embed_script))
        .route("/healthz", get(healthz));
    if state.config.run_mode == RunMode::Standalone {
        router = router.route("/", get(serve_preview));
    }
    let mut router = router
        .with_state(state.clone())
        .layer(TraceLayer::new_for_http());
    if state.config.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }
    router
}

pub async fn run(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

/// Standalone auto-invocation: bootstrap the widget into the preview shell
/// with the configured defaults and serve the mounted document.
async fn serve_preview(State(state): State<AppState>) -> Response {
    let shell = load_preview_shell().await;
    let options = BootstrapOptions {
        project_id: Some(state.config.default_project_id),
        token: state.config.default_token.clone(),
    };
    match bootstrap_into_shell(&shell, &state.config.mount_id, options) {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            tracing::error!(?err, "preview bootstrap failed");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

/// Embedded entry: the host page supplies the real configuration via query
/// params. `project_id` is passed through unvalidated; a missing token is an
/// explicit absent value by the time it reaches the widget.
async fn serve_widget(
    State(state): State<AppState>,
    Query(options): Query<BootstrapOptions>,
) -> Response {
    let shell = widget_shell(&state.config.mount_id);
    match bootstrap_into_shell(&shell, &state.config.mount_id, options) {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            tracing::error!(?err, "widget bootstrap failed");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

async fn serve_embed_script(State(_state): State<AppState>) -> impl IntoResponse {
    let script = match tokio::fs::read_to_string("assets/embed.js").await {
        Ok(script) => script,
        Err(_) => crate::sdk::embed_script(),
    };
    let mut resp = Response::new(script);
    resp.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/javascript"),
    );
    resp
}

async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}

async fn load_preview_shell() -> String {
    match tokio::fs::read_to_string("assets/preview.html").await {
        Ok(shell) => shell,
        Err(_) => PREVIEW_SHELL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_state(run_mode: RunMode) -> AppState {
        AppState::new(AppConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            run_mode,
            default_project_id: 22,
            default_token: None,
            mount_id: "app".to_string(),
            enable_cors: false,
        })
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn standalone_preview_self_bootstraps_with_defaults() {
        let app = build_router(test_state(RunMode::Standalone));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert_eq!(body.matches("chatbox-root").count(), 1);
        assert!(body.contains("\"projectId\":22"));
        assert!(body.contains("\"token\":null"));
    }

    #[tokio::test]
    async fn embedded_mode_does_not_expose_the_preview() {
        let app = build_router(test_state(RunMode::Embedded));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn widget_route_passes_host_configuration_through() {
        let app = build_router(test_state(RunMode::Embedded));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/widget?project_id=7&token=abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("\"projectId\":7"));
        assert!(body.contains("\"token\":\"abc\""));
    }

    #[tokio::test]
    async fn widget_route_leaves_missing_configuration_to_downstream() {
        let app = build_router(test_state(RunMode::Embedded));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/widget")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("\"projectId\":null"));
        assert!(body.contains("\"token\":null"));
    }

    #[tokio::test]
    async fn embed_script_is_served_as_javascript() {
        let app = build_router(test_state(RunMode::Embedded));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/embed.js")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/javascript"
        );
        let body = body_string(response).await;
        assert!(body.contains("createChatboxApp"));
    }

    #[tokio::test]
    async fn healthz_is_available_in_both_modes() {
        for mode in [RunMode::Standalone, RunMode::Embedded] {
            let app = build_router(test_state(mode));
            let response = app
                .oneshot(
                    Request::builder()
                        .uri("/healthz")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }
}
