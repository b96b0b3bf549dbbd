use axum::{routing::get, Json, Router};
use todo_shared::HealthResponse;

/// GET /api/health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_reports_healthy() {
        let Json(body) = health().await;
        assert_eq!(body.status, "healthy");
    }
}
