//! API server lifecycle: bind → spawn background task → return a handle
//! with a shutdown channel.

use std::net::SocketAddr;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::router::api_router;
use crate::api::types::ApiContext;

/// Handle to a running API server.
pub struct ApiServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ApiServer {
    /// Address actually bound (resolves port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Signal graceful shutdown. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }

    /// Wait for the server task to finish.
    pub async fn wait(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("API server task failed: {e}");
            }
        }
    }
}

/// Bind `addr` and serve the API in a background tokio task.
pub async fn start_server(ctx: ApiContext, addr: SocketAddr) -> Result<ApiServer, std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;

    let app = api_router(ctx);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::intelligence::{SafetyChecker, TriageEngine};
    use crate::pipeline::extraction::DisabledExtractor;
    use crate::pipeline::retrieval::{KeywordRetriever, ProtocolLibrary};

    fn test_ctx() -> ApiContext {
        ApiContext::new(
            TriageEngine::new(
                Arc::new(KeywordRetriever::new(ProtocolLibrary::builtin())),
                SafetyChecker::default(),
            ),
            Arc::new(DisabledExtractor),
        )
    }

    fn loopback() -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 0))
    }

    #[tokio::test]
    async fn start_serve_and_stop() {
        let mut server = start_server(test_ctx(), loopback())
            .await
            .expect("server should start");
        assert!(server.local_addr().port() > 0);

        let url = format!("http://{}/health", server.local_addr());
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["status"], "healthy");

        server.shutdown();
        server.wait().await;
    }

    #[tokio::test]
    async fn analyze_over_http() {
        let mut server = start_server(test_ctx(), loopback()).await.unwrap();

        let resp = reqwest::Client::new()
            .post(format!("http://{}/analyze", server.local_addr()))
            .json(&serde_json::json!({"text": "dizzy", "medications": ["Aspirin", "Ibuprofen"]}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["triage_level"], "URGENT");
        assert_eq!(json["safety_alerts"][0]["severity"], "HIGH");

        server.shutdown();
        server.wait().await;
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let mut server = start_server(test_ctx(), loopback()).await.unwrap();
        server.shutdown();
        server.shutdown();
        server.wait().await;
        server.wait().await;
    }

    #[tokio::test]
    async fn bind_conflict_is_error() {
        let mut first = start_server(test_ctx(), loopback()).await.unwrap();
        let result = start_server(test_ctx(), first.local_addr()).await;
        assert!(result.is_err());
        first.shutdown();
    }
}
