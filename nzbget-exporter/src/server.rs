//! HTTP listener exposing `/metrics`.

use std::future::Future;

use axum::{
    Router,
    extract::{Request, State},
    http::header,
    response::IntoResponse,
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnResponse, TraceLayer};
use tracing::{Level, Span, info};

use crate::Result;
use crate::metrics::{CONTENT_TYPE, Exporter};

pub const METRICS_PATH: &str = "/metrics";

/// Build the router. Paths other than `/metrics` answer 404.
pub fn router(exporter: Exporter) -> Router {
    Router::new()
        .route(METRICS_PATH, get(metrics))
        .with_state(exporter)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                .on_request(|req: &Request, _span: &Span| {
                    tracing::debug!(method = %req.method(), path = %req.uri().path(), "scrape request");
                })
                .on_response(DefaultOnResponse::new().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

async fn metrics(State(exporter): State<Exporter>) -> impl IntoResponse {
    let body = exporter.render().await;
    ([(header::CONTENT_TYPE, CONTENT_TYPE)], body)
}

/// Serve until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, exporter: Exporter, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!("Listening on http://{}{}", addr, METRICS_PATH);

    axum::serve(listener, router(exporter))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::NzbgetApi;
    use crate::collector::Collector;
    use crate::metrics::MetricRegistry;
    use crate::wire::{HistoryRecord, NzbgetConfig, ServerVolume, Status};
    use crate::{Error, Result};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct Unreachable;

    #[async_trait]
    impl NzbgetApi for Unreachable {
        async fn version(&self) -> Result<String> {
            Err(Error::config("unreachable"))
        }

        async fn status(&self) -> Result<Status> {
            Err(Error::config("unreachable"))
        }

        async fn config(&self) -> Result<NzbgetConfig> {
            Err(Error::config("unreachable"))
        }

        async fn server_volumes(&self) -> Result<Vec<ServerVolume>> {
            Err(Error::config("unreachable"))
        }

        async fn history(&self) -> Result<Vec<HistoryRecord>> {
            Err(Error::config("unreachable"))
        }
    }

    fn app() -> Router {
        router(Exporter::new(
            Arc::new(MetricRegistry::new("nzbget")),
            Collector::new(Arc::new(Unreachable)),
        ))
    }

    #[tokio::test]
    async fn test_metrics_always_answers() {
        let response = app()
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/plain; version=0.0.4"));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("nzbget_collect_success{unit=\"config\"} 0\n"));
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
