use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use cutplan_core::{validate, CutPlan, CutRequest, Optimizer, OptimizerError, ValidationIssue};
use serde::Serialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting cut plan API");

    let addr = std::env::var("CUTPLAN_API_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("API server listening on http://{}", addr);

    axum::serve(listener, app()).await?;
    Ok(())
}

fn app() -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/optimize", post(optimize))
        .route("/api/validate", post(validate_job))
        .layer(CorsLayer::permissive())
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "cutplan-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Main optimization endpoint
async fn optimize(Json(request): Json<CutRequest>) -> Result<Json<CutPlan>, AppError> {
    info!(
        "Received cut request with {} demand lines for {:?} stock",
        request.pieces.len(),
        request.stock.kind
    );

    let optimizer = Optimizer::new(request)?;
    let plan = optimizer.optimize();

    info!(
        "Optimization complete: {} units consumed, {}% utilization, {} unplaceable",
        plan.units_consumed,
        plan.utilization_rounded(),
        plan.unplaceable.len()
    );

    Ok(Json(plan))
}

#[derive(Debug, Serialize)]
struct ValidationReport {
    valid: bool,
    issues: Vec<ValidationIssue>,
}

/// Pre-flight check without packing
async fn validate_job(Json(request): Json<CutRequest>) -> Json<ValidationReport> {
    let issues = validate(&request);
    Json(ValidationReport {
        valid: issues.is_empty(),
        issues,
    })
}

/// Application error type
struct AppError(OptimizerError);

impl From<OptimizerError> for AppError {
    fn from(err: OptimizerError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request error: {}", self.0);

        let OptimizerError::Validation(issues) = &self.0;
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": self.0.to_string(),
                "issues": issues,
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_optimize_returns_plan() {
        let (status, body) = post_json(
            "/api/optimize",
            json!({
                "stock": { "width": 2000, "length": 1000, "kind": "sheet" },
                "pieces": [ { "label": "pane", "width": 600, "length": 400, "quantity": 4 } ]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["units_consumed"], 1);
        assert_eq!(body["utilization_pct"], "48");
        assert_eq!(body["units"][0]["placements"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_optimize_rejects_invalid_job() {
        let (status, body) = post_json(
            "/api/optimize",
            json!({
                "stock": { "width": 6000, "length": 6000, "kind": "bar" },
                "pieces": [ { "label": "rail", "length": 0, "quantity": 0 } ]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let problems: Vec<_> = body["issues"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["problem"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(problems, vec!["non_positive_quantity", "non_positive_dimension"]);
    }

    #[tokio::test]
    async fn test_optimize_reports_negative_quantity_and_oversized_stock() {
        let (status, body) = post_json(
            "/api/optimize",
            json!({
                "stock": { "width": "100000000000000", "length": 1000, "kind": "sheet" },
                "pieces": [ { "label": "pane", "width": 600, "length": 400, "quantity": -1 } ]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["issues"][0]["problem"], "stock_too_large");
        assert_eq!(body["issues"][1]["problem"], "non_positive_quantity");
        assert_eq!(body["issues"][1]["quantity"], -1);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid job: "));
    }

    #[tokio::test]
    async fn test_validate_reports_without_packing() {
        let (status, body) = post_json(
            "/api/validate",
            json!({
                "stock": { "width": 2000, "length": 1000, "kind": "panel" },
                "parameters": { "kerf": 5 },
                "pieces": [ { "label": "bead", "width": 4, "length": 900, "quantity": 1 } ]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], false);
        assert_eq!(body["issues"][0]["problem"], "kerf_too_wide");
        assert_eq!(body["issues"][0]["smallest"], "4");
    }
}
