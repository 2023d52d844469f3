use crate::classifier::Diagnosis;
use crate::config::Config;
use crate::error::PredictError;
use crate::predictor::Predictor;
use crate::record::{Categorical, Numeric, NumericSpec, PatientRecord, FEATURE_ORDER};
use crate::ui::{self, Language, Outcome};
use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Form, Router,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<Predictor>,
    pub config: Arc<Config>,
}

/// Prediction response
#[derive(Serialize)]
pub struct PredictResponse {
    pub label: u8,
    pub diagnosis: String,
    pub message: String,
    pub probability: Option<f64>,
    pub model: String,
    pub processing_time_ms: u64,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub description: String,
    pub n_features: usize,
}

/// Server info response
#[derive(Serialize)]
pub struct InfoResponse {
    pub version: String,
    pub model: ModelInfo,
    pub feature_order: Vec<String>,
    pub vocabularies: BTreeMap<String, Vec<String>>,
    pub numeric_ranges: BTreeMap<String, NumericSpec>,
    pub language: String,
}

/// Run the HTTP server
pub async fn run(config: Config) -> anyhow::Result<()> {
    let predictor = Predictor::new(&config)?;
    let addr = format!("{}:{}", config.host, config.port);

    let app = router(AppState {
        predictor: Arc::new(predictor),
        config: Arc::new(config),
    });

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

pub fn router(state: AppState) -> Router {
    let max_body_size = state.config.max_body_size;

    Router::new()
        .route("/", get(handle_form))
        .route("/predict", post(handle_form_submit))
        .route("/api/predict", post(handle_predict))
        .route("/health", get(handle_health))
        .route("/info", get(handle_info))
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run one prediction and log its outcome
fn predict(state: &AppState, record: &PatientRecord) -> Result<PredictResponse, PredictError> {
    let start = Instant::now();

    let prediction = state.predictor.predict(record).inspect_err(|e| {
        tracing::warn!("Prediction rejected: {}", e);
    })?;

    let processing_time_ms = start.elapsed().as_millis() as u64;
    let diagnosis = prediction.diagnosis();

    tracing::info!(
        "Prediction completed in {}ms, label: {}, probability: {:?}",
        processing_time_ms,
        prediction.label,
        prediction.probability
    );

    Ok(PredictResponse {
        label: prediction.label,
        diagnosis: diagnosis.as_str().to_string(),
        message: state
            .config
            .language
            .diagnosis_message(diagnosis)
            .to_string(),
        probability: prediction.probability,
        model: state.predictor.model().name().to_string(),
        processing_time_ms,
    })
}

/// Serve the empty form
async fn handle_form(State(state): State<AppState>) -> Html<String> {
    Html(ui::render(
        &state.predictor,
        state.config.language,
        &HashMap::new(),
        None,
    ))
}

/// Handle form submissions; every failure is shown on the page
async fn handle_form_submit(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let result = PatientRecord::from_form(&fields).and_then(|record| predict(&state, &record));

    let (status, outcome) = match result {
        Ok(response) => (
            StatusCode::OK,
            Outcome::Diagnosis(Diagnosis::from_label(response.label)),
        ),
        Err(e) => (e.status(), Outcome::Error(e.to_string())),
    };

    let page = ui::render(
        &state.predictor,
        state.config.language,
        &fields,
        Some(&outcome),
    );
    (status, Html(page))
}

/// Handle JSON prediction requests
async fn handle_predict(
    State(state): State<AppState>,
    payload: Result<Json<PatientRecord>, JsonRejection>,
) -> Result<Json<PredictResponse>, PredictError> {
    let Json(record) = payload.map_err(|e| {
        tracing::warn!("Rejected prediction request: {}", e.body_text());
        PredictError::InvalidRequest(e.body_text())
    })?;
    predict(&state, &record).map(Json)
}

/// Handle health check requests
async fn handle_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle info requests
async fn handle_info(State(state): State<AppState>) -> impl IntoResponse {
    let model = state.predictor.model();
    let language: Language = state.config.language;

    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: ModelInfo {
            name: model.name().to_string(),
            description: model.description().to_string(),
            n_features: model.n_features(),
        },
        feature_order: FEATURE_ORDER.iter().map(|f| f.name().to_string()).collect(),
        vocabularies: Categorical::ALL
            .iter()
            .map(|c| (c.name().to_string(), state.predictor.vocabulary(*c).to_vec()))
            .collect(),
        numeric_ranges: Numeric::ALL
            .iter()
            .map(|n| (n.name().to_string(), n.spec()))
            .collect(),
        language: language.as_str().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::sample_predictor;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use std::path::PathBuf;
    use tower::ServiceExt;

    fn app() -> Router {
        router(AppState {
            predictor: Arc::new(sample_predictor()),
            config: Arc::new(Config {
                host: "127.0.0.1".to_string(),
                port: 0,
                encoders_path: PathBuf::from("encoders.json"),
                scaler_path: PathBuf::from("scaler.json"),
                model_path: PathBuf::from("model.json"),
                language: Language::En,
                max_body_size: 65536,
            }),
        })
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn reference_record() -> serde_json::Value {
        serde_json::json!({
            "Age": 50, "Sex": "M", "ChestPainType": "ATA", "RestingBP": 120,
            "Cholesterol": 200, "FastingBS": 0, "RestingECG": "Normal",
            "MaxHR": 150, "ExerciseAngina": "N", "Oldpeak": 1.0, "ST_Slope": "Up"
        })
    }

    #[tokio::test]
    async fn test_api_predict_reference_record() {
        let response = app()
            .oneshot(json_request("/api/predict", reference_record()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["label"], 0);
        assert_eq!(body["diagnosis"], "absent");
        assert_eq!(body["message"], "Result: heart disease absent.");
        assert_eq!(body["model"], "logistic_regression");
    }

    #[tokio::test]
    async fn test_api_unrecognized_value() {
        let mut record = reference_record();
        record["ChestPainType"] = serde_json::json!("XYZ");

        let response = app()
            .oneshot(json_request("/api/predict", record))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["code"], "VALUE_NOT_RECOGNIZED");
    }

    #[tokio::test]
    async fn test_api_out_of_range() {
        let mut record = reference_record();
        record["Age"] = serde_json::json!(130);

        let response = app()
            .oneshot(json_request("/api/predict", record))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_api_missing_field_is_bad_request() {
        let response = app()
            .oneshot(json_request("/api/predict", serde_json::json!({"Age": 50})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["code"], "INVALID_REQUEST");
        assert!(body["error"].as_str().unwrap().contains("missing field `Sex`"));
    }

    #[tokio::test]
    async fn test_api_wrong_type_and_malformed_json_are_bad_requests() {
        let mut record = reference_record();
        record["Age"] = serde_json::json!("50");
        let response = app()
            .oneshot(json_request("/api/predict", record))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let request = Request::post("/api/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_api_fractional_age_is_invalid_input() {
        let mut record = reference_record();
        record["Age"] = serde_json::json!(50.5);
        let response = app()
            .oneshot(json_request("/api/predict", record))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_form_submit_shows_result() {
        let form = "Age=50&Sex=M&ChestPainType=ATA&RestingBP=120&Cholesterol=200&FastingBS=0\
                    &RestingECG=Normal&MaxHR=150&ExerciseAngina=N&Oldpeak=1.0&ST_Slope=Up";
        let request = Request::post("/predict")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        assert!(html.contains("Result: heart disease absent."));
        assert!(html.contains("<option value=\"M\" selected>M</option>"));
    }

    #[tokio::test]
    async fn test_form_submit_shows_error_message() {
        let form = "Age=50&Sex=X&ChestPainType=ATA&RestingBP=120&Cholesterol=200&FastingBS=0\
                    &RestingECG=Normal&MaxHR=150&ExerciseAngina=N&Oldpeak=1.0&ST_Slope=Up";
        let request = Request::post("/predict")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let html = body_string(response).await;
        assert!(html.contains(
            "Error while processing data: Value not recognized for Sex: &#39;X&#39;"
        ));
    }

    #[tokio::test]
    async fn test_info_lists_vocabularies() {
        let response = app()
            .oneshot(Request::get("/info").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();

        assert_eq!(body["model"]["n_features"], 11);
        assert_eq!(body["feature_order"][10], "ST_Slope");
        assert_eq!(body["vocabularies"]["RestingECG"], serde_json::json!(["LVH", "Normal", "ST"]));
        assert_eq!(body["numeric_ranges"]["Cholesterol"]["max"], 600.0);
        assert_eq!(body["language"], "en");
    }

    #[tokio::test]
    async fn test_form_page_served() {
        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("action=\"/predict\""));
    }
}
