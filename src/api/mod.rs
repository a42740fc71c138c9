mod error;

use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::{ApiError, ApiResult};

use crate::core::{RiskTolerance, Scenario, SimulationParameters, simulate};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

/// Request body for `/simulate`. Field names are part of the public contract.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulatePayload {
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub current_savings: f64,
    pub current_investments: f64,
    pub goal_cost: f64,
    pub investment_growth_rate: f64,
    pub inflation_rate: f64,
    pub monthly_savings_rate: f64,
    pub risk_tolerance: String,
    pub scenario: String,
}

impl From<SimulatePayload> for SimulationParameters {
    fn from(payload: SimulatePayload) -> Self {
        SimulationParameters {
            monthly_income: payload.monthly_income,
            monthly_expenses: payload.monthly_expenses,
            current_savings: payload.current_savings,
            current_investments: payload.current_investments,
            goal_cost: payload.goal_cost,
            investment_growth_rate: payload.investment_growth_rate,
            inflation_rate: payload.inflation_rate,
            monthly_savings_rate: payload.monthly_savings_rate,
            risk_tolerance: RiskTolerance::from_label(&payload.risk_tolerance),
            scenario: Scenario::from_label(&payload.scenario),
        }
    }
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn run_http_server(addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "fintwin HTTP API listening");
    tracing::info!("Local access: http://127.0.0.1:{}/", addr.port());

    axum::serve(listener, router()).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    ApiError::NotFound.into_response()
}

async fn simulate_get_handler(
    payload: Result<Query<SimulatePayload>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(payload) = payload?;
    Ok(simulate_handler_impl(payload))
}

async fn simulate_post_handler(
    payload: Result<Json<SimulatePayload>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(payload) = payload?;
    Ok(simulate_handler_impl(payload))
}

fn simulate_handler_impl(payload: SimulatePayload) -> Response {
    tracing::debug!(
        risk_tolerance = %payload.risk_tolerance,
        scenario = %payload.scenario,
        "simulate request"
    );
    let params = SimulationParameters::from(payload);
    json_response(StatusCode::OK, simulate(params))
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

#[cfg(test)]
fn payload_from_json(json: &str) -> ApiResult<SimulatePayload> {
    serde_json::from_str::<SimulatePayload>(json)
        .map_err(|e| ApiError::InvalidPayload(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    const SAMPLE_JSON: &str = r#"{
      "monthly_income": 5000,
      "monthly_expenses": 4000,
      "current_savings": 1000,
      "current_investments": 0,
      "goal_cost": 50000,
      "investment_growth_rate": 0.01,
      "inflation_rate": 0.003,
      "monthly_savings_rate": 50,
      "risk_tolerance": "moderate",
      "scenario": "job-hike"
    }"#;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        serde_json::from_slice(&bytes).expect("body should be JSON")
    }

    #[test]
    fn payload_from_json_accepts_integer_numbers() {
        let payload = payload_from_json(SAMPLE_JSON).expect("json should parse");
        let params = SimulationParameters::from(payload);

        assert_approx(params.monthly_income, 5_000.0);
        assert_approx(params.monthly_expenses, 4_000.0);
        assert_approx(params.current_savings, 1_000.0);
        assert_approx(params.current_investments, 0.0);
        assert_approx(params.goal_cost, 50_000.0);
        assert_approx(params.investment_growth_rate, 0.01);
        assert_approx(params.inflation_rate, 0.003);
        assert_approx(params.monthly_savings_rate, 50.0);
        assert_eq!(params.risk_tolerance, RiskTolerance::Moderate);
        assert_eq!(params.scenario, Scenario::JobHike);
    }

    #[test]
    fn payload_unknown_labels_fall_back_silently() {
        let json = SAMPLE_JSON
            .replace("\"moderate\"", "\"reckless\"")
            .replace("\"job-hike\"", "\"lottery-win\"");
        let payload = payload_from_json(&json).expect("json should parse");
        let params = SimulationParameters::from(payload);
        assert_eq!(params.risk_tolerance, RiskTolerance::Moderate);
        assert_eq!(params.scenario, Scenario::None);
    }

    #[test]
    fn payload_labels_are_matched_exactly() {
        let json = SAMPLE_JSON
            .replace("\"moderate\"", "\"Aggressive\"")
            .replace("\"job-hike\"", "\"job_hike\"");
        let payload = payload_from_json(&json).expect("json should parse");
        let params = SimulationParameters::from(payload);
        assert_eq!(params.risk_tolerance, RiskTolerance::Moderate);
        assert_eq!(params.scenario, Scenario::None);
    }

    #[test]
    fn payload_missing_field_is_rejected() {
        let json = SAMPLE_JSON.replace("\"goal_cost\": 50000,", "");
        let err = payload_from_json(&json).expect_err("must reject missing goal_cost");
        assert!(matches!(err, ApiError::InvalidPayload(_)));
        assert!(err.to_string().contains("goal_cost"));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn payload_non_text_scenario_is_rejected() {
        let json = SAMPLE_JSON.replace("\"job-hike\"", "3");
        assert!(payload_from_json(&json).is_err());
    }

    async fn send(request: Request<Body>) -> Response {
        router()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    fn post_json(uri: &str, body: String) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .expect("request should build")
    }

    #[tokio::test]
    async fn router_rejects_post_missing_a_field_with_422() {
        let json = SAMPLE_JSON.replace("\"monthly_expenses\": 4000,", "");
        let response = send(post_json("/simulate", json)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        let error = body["error"].as_str().expect("error text");
        assert!(error.starts_with("Invalid simulation payload: "));
        assert!(error.contains("monthly_expenses"));
    }

    #[tokio::test]
    async fn router_rejects_malformed_json_with_422() {
        let response = send(post_json("/api/simulate", "{\"monthly_income\": ".to_string())).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn router_rejects_bad_query_with_422() {
        let request = Request::builder()
            .uri("/simulate?monthly_income=lots")
            .body(Body::empty())
            .expect("request should build");
        let response = send(request).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn router_serves_query_simulation_with_permissive_cors() {
        let query = "monthly_income=5000&monthly_expenses=4000&current_savings=1000\
            &current_investments=0&goal_cost=50000&investment_growth_rate=0.01\
            &inflation_rate=0.003&monthly_savings_rate=50&risk_tolerance=moderate\
            &scenario=none";
        let request = Request::builder()
            .uri(format!("/simulate?{query}"))
            .header(header::ORIGIN, "http://example.com")
            .body(Body::empty())
            .expect("request should build");
        let response = send(request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("*"))
        );
        let body = body_json(response).await;
        assert_eq!(body["base"]["goal_1_month"], 70);
    }

    #[tokio::test]
    async fn router_falls_back_to_404_json() {
        let request = Request::builder()
            .uri("/nope")
            .body(Body::empty())
            .expect("request should build");
        let response = send(request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Not found");
    }

    #[tokio::test]
    async fn simulate_post_returns_four_projections() {
        let payload = payload_from_json(SAMPLE_JSON).expect("json should parse");
        let response = simulate_post_handler(Ok(Json(payload)))
            .await
            .expect("handler should succeed");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL),
            Some(&HeaderValue::from_static("no-store"))
        );

        let body = body_json(response).await;
        for key in ["base", "best", "worst", "scenario"] {
            let result = &body[key];
            let history = result["history"].as_array().expect("history array");
            assert_eq!(history.len(), 120, "{key} history length");
            assert!(result.get("goal_1_month").is_some(), "{key} goal month");
            assert!(result["risks"].is_array());
            assert!(result["insights"].is_array());
            assert_eq!(result["final_net_worth"], history[119]);
        }

        assert_approx(
            body["base"]["history"][0].as_f64().unwrap_or_default(),
            1_992.94,
        );
        assert_eq!(body["base"]["goal_1_month"], 70);
        assert_eq!(
            body["scenario"]["insights"][0],
            "Month 24: Job change costs $5,000 but increases income by 20%"
        );
    }

    #[tokio::test]
    async fn simulate_get_reads_query_fields() {
        let payload = SimulatePayload {
            scenario: "emergency".to_string(),
            ..payload_from_json(SAMPLE_JSON).expect("json should parse")
        };
        let response = simulate_get_handler(Ok(Query(payload)))
            .await
            .expect("handler should succeed");
        let body = body_json(response).await;
        assert_eq!(
            body["scenario"]["risks"][0],
            "Month 36: Emergency expense of $10,000"
        );
        assert_eq!(body["base"]["risks"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn goal_month_serializes_as_null_when_missed() {
        let json = SAMPLE_JSON.replace("50000", "5000000");
        let payload = payload_from_json(&json).expect("json should parse");
        let response = simulate_post_handler(Ok(Json(payload)))
            .await
            .expect("handler should succeed");
        let body = body_json(response).await;
        assert!(body["worst"]["goal_1_month"].is_null());
    }

    #[tokio::test]
    async fn invalid_payload_error_renders_as_422_json() {
        let response = ApiError::InvalidPayload("missing field `goal_cost`".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(
            body["error"],
            "Invalid simulation payload: missing field `goal_cost`"
        );
    }

    #[tokio::test]
    async fn unknown_path_is_404_json() {
        let response = not_found_handler().await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Not found");
    }

    #[tokio::test]
    async fn static_assets_are_served_with_content_types() {
        let index = index_handler().await.into_response();
        assert_eq!(index.status(), StatusCode::OK);
        assert_eq!(
            index.headers().get(header::CACHE_CONTROL),
            Some(&HeaderValue::from_static("no-store"))
        );

        let css = styles_handler().await.into_response();
        assert_eq!(
            css.headers().get(header::CONTENT_TYPE),
            Some(&HeaderValue::from_static("text/css; charset=utf-8"))
        );

        let js = app_js_handler().await.into_response();
        assert_eq!(
            js.headers().get(header::CONTENT_TYPE),
            Some(&HeaderValue::from_static(
                "application/javascript; charset=utf-8"
            ))
        );
        assert!(APP_JS.contains("/simulate"));
        assert!(INDEX_HTML.contains("app.js"));
    }
}
