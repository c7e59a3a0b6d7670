use std::net::SocketAddr;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Liveness endpoint for the hosting platform: every path answers 200.
pub fn router() -> Router {
    Router::new()
        .fallback(alive)
        .layer(TraceLayer::new_for_http())
}

async fn alive() -> &'static str {
    "OK"
}

pub async fn serve(addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Health listener on {}", addr);
    axum::serve(listener, router()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn any_path_is_alive() {
        for uri in ["/", "/health", "/anything/else"] {
            let response = router()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }
}
