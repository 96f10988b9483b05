use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

mod catalog;
mod layout_handler;
mod outline_proxy;
mod quote;
mod snap_handler;

use layout_handler::generate_layout_handler;
use outline_proxy::propose_outline_handler;
use placement_core::Point;
use snap_handler::snap_outline_handler;

// Security limits to prevent DoS attacks
pub const MAX_POLYGON_POINTS: usize = 1_000;
pub const MAX_HOLES: usize = 64;
pub const MAX_CATALOG_ENTRIES: usize = 64;
pub const MAX_COORDINATE_VALUE: f64 = 1_000_000.0;
pub const MIN_COORDINATE_VALUE: f64 = -1_000_000.0;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Validate that point coordinates are within reasonable bounds
fn point_is_valid(point: &Point) -> bool {
    point.x.is_finite()
        && point.y.is_finite()
        && point.x >= MIN_COORDINATE_VALUE
        && point.x <= MAX_COORDINATE_VALUE
        && point.y >= MIN_COORDINATE_VALUE
        && point.y <= MAX_COORDINATE_VALUE
}

/// Shared outline validation for every endpoint that accepts polygons:
/// size ceiling plus per-point coordinate checks.
pub fn validate_outline(
    name: &str,
    points: &[Point],
) -> Result<(), (StatusCode, Json<ErrorResponse>)> {
    if points.len() > MAX_POLYGON_POINTS {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "INPUT_TOO_LARGE".to_string(),
                message: format!(
                    "Too many {} points. Maximum allowed: {}. Received: {}",
                    name,
                    MAX_POLYGON_POINTS,
                    points.len()
                ),
            }),
        ));
    }

    for (idx, point) in points.iter().enumerate() {
        if !point_is_valid(point) {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "INVALID_POINT".to_string(),
                    message: format!(
                        "Invalid {} point {}: coordinates must be finite and within [{}, {}]",
                        name, idx, MIN_COORDINATE_VALUE, MAX_COORDINATE_VALUE
                    ),
                }),
            ));
        }
    }

    Ok(())
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Create the Axum app with all routes and middleware
pub fn create_app() -> Router {
    // Configure CORS from environment or use localhost for development
    let allowed_origins = std::env::var("ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:8080,http://127.0.0.1:8080".to_string());

    let origins: Vec<_> = allowed_origins
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let cors = if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
    };

    Router::new()
        .route("/health", get(health_check))
        .route("/snap", post(snap_outline_handler))
        .route("/layout", post(generate_layout_handler))
        .route("/outline/propose", post(propose_outline_handler))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // 10MB max for images
        .layer(cors)
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting Floorspace Layout Backend");

    let app = create_app();

    let addr = "0.0.0.0:3000";
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_route() {
        let app = create_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_layout_route_round_trip() {
        let app = create_app();

        let payload = serde_json::json!({
            "polygon": [
                {"x": 0.0, "y": 0.0},
                {"x": 6000.0, "y": 0.0},
                {"x": 6000.0, "y": 6000.0},
                {"x": 0.0, "y": 6000.0}
            ],
            "scale_px_per_mm": 1.0,
            "patterns": ["standard"],
            "furniture": [{
                "id": "seminar-1200",
                "name": "Seminar Table 1200",
                "width_mm": 1200.0,
                "depth_mm": 450.0,
                "seats": 3,
                "unit_price": 18.5,
                "color": "#4f7fae"
            }]
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/layout")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["layouts"][0]["items"].as_array().unwrap().len(), 6);
        assert_eq!(body["layouts"][0]["quote"]["total_seats"], 18);
    }

    #[tokio::test]
    async fn test_layout_route_rejects_bad_scale() {
        let app = create_app();

        let payload = serde_json::json!({
            "polygon": [
                {"x": 0.0, "y": 0.0},
                {"x": 6000.0, "y": 0.0},
                {"x": 6000.0, "y": 6000.0}
            ],
            "scale_px_per_mm": -1.0
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/layout")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "INVALID_SCALE");
    }

    #[test]
    fn test_point_bounds() {
        assert!(point_is_valid(&Point::new(0.0, 0.0)));
        assert!(!point_is_valid(&Point::new(f64::NAN, 0.0)));
        assert!(!point_is_valid(&Point::new(2_000_000.0, 0.0)));
    }
}
