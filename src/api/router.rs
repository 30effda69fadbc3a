//! API router.
//!
//! Returns a composable `Router` with every route under `/api/`.
//!
//! Middleware stack (outermost to innermost):
//! 1. CORS and `Cache-Control: no-store`
//! 2. Audit logger
//! 3. Caller identity (protected routes only)

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::endpoints::analyze::MAX_IMAGE_BYTES;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Request body ceiling: one image plus multipart overhead.
const BODY_LIMIT_BYTES: usize = MAX_IMAGE_BYTES + 1024 * 1024;

/// Build the API router.
///
/// Handlers use `State<ApiContext>`; protected handlers also receive
/// `Extension<UserContext>` from the auth middleware.
pub fn api_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);

    let public = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/diagnose", post(endpoints::diagnose::diagnose))
        .route("/doctors", get(endpoints::doctors::list))
        .route("/contact", post(endpoints::contact::submit));

    // route_layer: unknown paths stay 404 rather than 401
    let protected = Router::new()
        .route("/analyze", post(endpoints::analyze::analyze))
        .route("/analyses", get(endpoints::analyses::list))
        .route("/analyses/:id/report.pdf", get(endpoints::analyses::report_pdf))
        .route("/recommendations", get(endpoints::recommendations::recommend))
        .route(
            "/doctors",
            post(endpoints::doctors::create).put(endpoints::doctors::update),
        )
        .route(
            "/appointments",
            get(endpoints::appointments::list).post(endpoints::appointments::book),
        )
        .route(
            "/users",
            get(endpoints::users::get).put(endpoints::users::upsert),
        )
        .route_layer(axum::middleware::from_fn(middleware::auth::require_user));

    Router::new()
        .nest("/api", public.merge(protected))
        .with_state(ctx)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::config::{AppConfig, GeminiConfig};
    use crate::db;
    use crate::models::AnalysisRecord;
    use crate::pipeline::llm::{LlmClient, MockLlmClient};
    use crate::pipeline::normalizer::AnalysisFindings;

    const PATIENT: &str = "pat@example.com";
    const DOCTOR: &str = "dr.rao@clinic.example.com";

    fn test_core_state(llm: Arc<dyn LlmClient>) -> Arc<CoreState> {
        let config = AppConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            database_path: "unused.db".into(),
            gemini: GeminiConfig::default(),
        };
        Arc::new(CoreState::in_memory(config, llm).unwrap())
    }

    fn mock_core(response: &str) -> Arc<CoreState> {
        test_core_state(Arc::new(MockLlmClient::new(response)))
    }

    fn make_request(method: &str, uri: &str, user: Option<&str>, body: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(email) = user {
            builder = builder.header("X-User-Email", email);
        }
        match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    fn multipart_request(user: &str, content_type: &str, data: &[u8]) -> Request<Body> {
        let boundary = "X-HEALTHDESK-BOUNDARY";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"scan\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header("X-User-Email", user)
            .header("Content-Type", format!("multipart/form-data; boundary={boundary}"))
            .body(Body::from(body))
            .unwrap()
    }

    async fn response_json(response: axum::http::Response<Body>) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    fn seed_analysis(core: &CoreState, owner: &str) -> AnalysisRecord {
        let record = AnalysisRecord::new(
            AnalysisFindings {
                diagnosis: "Mild bronchial thickening".into(),
                observations: vec!["Peribronchial cuffing".into()],
                potential_conditions: vec!["Pneumonia".into()],
                areas_of_concern: vec!["Lower lobes".into()],
            },
            "aGk=".into(),
            "image/png",
            owner,
        );
        core.with_db(|conn| db::insert_analysis(conn, &record)).unwrap();
        record
    }

    fn seed_doctor(core: &CoreState) {
        let body = r#"{"name":"Dr. Asha Rao","specialization":"Cardiology","experience":12,"clinicLocation":"Pune","fees":800}"#;
        let profile: crate::models::DoctorProfile = serde_json::from_str(body).unwrap();
        let doctor = profile.into_doctor(uuid::Uuid::new_v4(), DOCTOR);
        core.with_db(|conn| db::insert_doctor(conn, &doctor)).unwrap();
    }

    // ── Health and auth ──────────────────────────────────────

    #[tokio::test]
    async fn health_is_public() {
        let app = api_router(mock_core(""));
        let response = app
            .oneshot(make_request("GET", "/api/health", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("Cache-Control").unwrap(), "no-store");

        let json = response_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["model"], "mock");
        assert!(json["model_configured"].as_bool().unwrap());
        assert!(!json["version"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn protected_route_requires_user() {
        let app = api_router(mock_core(""));
        let response = app
            .oneshot(make_request("GET", "/api/analyses", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = response_json(response).await;
        assert_eq!(json["error"], "Authentication required");
    }

    #[tokio::test]
    async fn malformed_user_email_is_unauthorized() {
        let app = api_router(mock_core(""));
        let response = app
            .oneshot(make_request("GET", "/api/analyses", Some("not-an-email"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn not_found_for_unknown_route() {
        let app = api_router(mock_core(""));
        let response = app
            .oneshot(make_request("GET", "/api/nonexistent", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    // ── Image analysis ───────────────────────────────────────

    #[tokio::test]
    async fn analyze_stores_normalized_record() {
        let reply = "Here you go:\n```json\n{\"diagnosis\":\"normal\",\"observations\":[\"clear lungs\"],\"potential_conditions\":[\"malaria\",\"unlisted-disease\"],\"areas_of_concern\":[]}\n```";
        let llm = Arc::new(MockLlmClient::new(reply));
        let core = test_core_state(llm.clone());
        let app = api_router(core.clone());

        let response = app
            .oneshot(multipart_request(PATIENT, "image/png", b"\x89PNG fake"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["status"], "success");
        assert_eq!(json["analysis"]["diagnosis"], "normal");
        assert_eq!(json["analysis"]["potential_conditions"], serde_json::json!(["malaria"]));
        assert!(json["analysis"].get("image_data").is_none());

        let calls = llm.recorded_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1.as_ref().unwrap().mime_type, "image/png");

        let stored = core
            .with_db(|conn| db::get_analyses_by_owner(conn, PATIENT))
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].observations, vec!["clear lungs"]);
    }

    #[tokio::test]
    async fn analyze_falls_back_to_raw_text() {
        let core = mock_core("The image looks unremarkable.");
        let app = api_router(core);
        let response = app
            .oneshot(multipart_request(PATIENT, "image/jpeg", b"jpeg bytes"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["analysis"]["diagnosis"], "The image looks unremarkable.");
        assert_eq!(json["analysis"]["observations"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn analyze_rejects_non_image_before_model_call() {
        let llm = Arc::new(MockLlmClient::new("unused"));
        let app = api_router(test_core_state(llm.clone()));
        let response = app
            .oneshot(multipart_request(PATIENT, "application/pdf", b"%PDF-1.4"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"], "File must be an image");
        assert!(llm.recorded_calls().is_empty());
    }

    #[tokio::test]
    async fn analyze_without_file_is_bad_request() {
        let app = api_router(mock_core("unused"));
        let request = Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header("X-User-Email", PATIENT)
            .header("Content-Type", "multipart/form-data; boundary=B")
            .body(Body::from("--B--\r\n"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn analyze_model_failure_is_500_with_details() {
        let core = test_core_state(Arc::new(MockLlmClient::failing("connection reset")));
        let app = api_router(core.clone());
        let response = app
            .oneshot(multipart_request(PATIENT, "image/png", b"png"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response_json(response).await;
        assert_eq!(json["error"], "Failed to process the image");
        assert!(json["details"].as_str().unwrap().contains("connection reset"));

        let stored = core
            .with_db(|conn| db::get_analyses_by_owner(conn, PATIENT))
            .unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn analyze_rejects_empty_file_before_model_call() {
        let llm = Arc::new(MockLlmClient::new("unused"));
        let app = api_router(test_core_state(llm.clone()));
        let response = app
            .oneshot(multipart_request(PATIENT, "image/png", b""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"], "Uploaded file is empty");
        assert!(llm.recorded_calls().is_empty());
    }

    #[tokio::test]
    async fn analyze_rejects_oversized_image_before_model_call() {
        let llm = Arc::new(MockLlmClient::new("unused"));
        let core = test_core_state(llm.clone());
        let app = api_router(core.clone());
        let data = vec![0u8; MAX_IMAGE_BYTES + 1];
        let response = app
            .oneshot(multipart_request(PATIENT, "image/png", &data))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"], "File too large. Maximum 8MB.");
        assert!(llm.recorded_calls().is_empty());

        let stored = core
            .with_db(|conn| db::get_analyses_by_owner(conn, PATIENT))
            .unwrap();
        assert!(stored.is_empty());
    }

    // ── Symptom diagnosis ────────────────────────────────────

    #[tokio::test]
    async fn diagnose_is_public_and_normalized() {
        let reply = r#"{"Possible Diagnosis":"Common cold","Potential Disease":"Rhinovirus infection","Symptoms":["sneezing"],"Recommended Treatment":["rest"],"Prevention Tips":["wash hands"]}"#;
        let llm = Arc::new(MockLlmClient::new(reply));
        let app = api_router(test_core_state(llm.clone()));
        let response = app
            .oneshot(make_request("POST", "/api/diagnose", None, Some(r#"{"symptoms":"sneezing, runny nose"}"#)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["diagnosis"]["possible_diagnosis"], "Common cold");
        assert_eq!(json["diagnosis"]["prevention_tips"], serde_json::json!(["wash hands"]));
        assert!(llm.recorded_calls()[0].0.contains("sneezing, runny nose"));
    }

    #[tokio::test]
    async fn diagnose_requires_symptoms() {
        let llm = Arc::new(MockLlmClient::new("unused"));
        let app = api_router(test_core_state(llm.clone()));
        let response = app
            .oneshot(make_request("POST", "/api/diagnose", None, Some(r#"{"symptoms":"   "}"#)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(llm.recorded_calls().is_empty());
    }

    #[tokio::test]
    async fn diagnose_rejects_malformed_json() {
        let app = api_router(mock_core("unused"));
        let response = app
            .oneshot(make_request("POST", "/api/diagnose", None, Some("{not json")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // ── Recommendations ──────────────────────────────────────

    #[tokio::test]
    async fn recommendations_without_history_is_404() {
        let llm = Arc::new(MockLlmClient::new("unused"));
        let app = api_router(test_core_state(llm.clone()));
        let response = app
            .oneshot(make_request("GET", "/api/recommendations", Some(PATIENT), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = response_json(response).await;
        assert_eq!(json["error"], "No past analyses found");
        assert!(llm.recorded_calls().is_empty());
    }

    #[tokio::test]
    async fn recommendations_use_only_callers_history() {
        let reply = "**Possible Future Conditions**\n- Chronic bronchitis\n\n**Preventive Measures**\n- Avoid smoking\n- Disclaimer: consult a doctor";
        let llm = Arc::new(MockLlmClient::new(reply));
        let core = test_core_state(llm.clone());
        seed_analysis(&core, PATIENT);
        seed_analysis(&core, "someone@else.org");

        let app = api_router(core);
        let response = app
            .oneshot(make_request(
                "GET",
                &format!("/api/recommendations?email={PATIENT}"),
                Some(PATIENT),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(
            json["recommendations"]["possible_future_conditions"],
            serde_json::json!(["Chronic bronchitis"])
        );
        assert_eq!(
            json["recommendations"]["preventive_measures"],
            serde_json::json!(["Avoid smoking"])
        );

        let prompt = &llm.recorded_calls()[0].0;
        assert!(prompt.contains("Mild bronchial thickening"));
        assert_eq!(prompt.matches("Mild bronchial thickening").count(), 1);
    }

    #[tokio::test]
    async fn recommendations_for_other_user_is_forbidden() {
        let core = mock_core("unused");
        seed_analysis(&core, PATIENT);
        let app = api_router(core);
        let response = app
            .oneshot(make_request(
                "GET",
                "/api/recommendations?email=someone@else.org",
                Some(PATIENT),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    // ── History and report ───────────────────────────────────

    #[tokio::test]
    async fn analyses_list_is_scoped_to_caller() {
        let core = mock_core("");
        seed_analysis(&core, PATIENT);
        seed_analysis(&core, "someone@else.org");
        let app = api_router(core);
        let response = app
            .oneshot(make_request("GET", "/api/analyses", Some(PATIENT), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["analyses"].as_array().unwrap().len(), 1);
        assert_eq!(json["analyses"][0]["owner_email"], PATIENT);
    }

    #[tokio::test]
    async fn report_pdf_downloads_for_owner_only() {
        let core = mock_core("");
        let record = seed_analysis(&core, PATIENT);
        let uri = format!("/api/analyses/{}/report.pdf", record.id);

        let response = api_router(core.clone())
            .oneshot(make_request("GET", &uri, Some(PATIENT), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("Content-Type").unwrap(), "application/pdf");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.starts_with(b"%PDF"));

        let response = api_router(core)
            .oneshot(make_request("GET", &uri, Some("someone@else.org"), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn report_pdf_rejects_bad_id() {
        let app = api_router(mock_core(""));
        let response = app
            .oneshot(make_request("GET", "/api/analyses/not-a-uuid/report.pdf", Some(PATIENT), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // ── Doctors ──────────────────────────────────────────────

    #[tokio::test]
    async fn doctor_profile_lifecycle() {
        let core = mock_core("");
        let profile = r#"{"name":"Dr. Asha Rao","specialization":"Cardiology","experience":12,"clinicLocation":"Pune","fees":800}"#;

        let response = api_router(core.clone())
            .oneshot(make_request("POST", "/api/doctors", Some(DOCTOR), Some(profile)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created = response_json(response).await;
        assert_eq!(created["doctor"]["email"], DOCTOR);
        assert_eq!(created["doctor"]["clinicLocation"], "Pune");

        let response = api_router(core.clone())
            .oneshot(make_request("POST", "/api/doctors", Some(DOCTOR), Some(profile)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let edited = r#"{"name":"Dr. Asha Rao","specialization":"Cardiology","fees":950}"#;
        let response = api_router(core.clone())
            .oneshot(make_request("PUT", "/api/doctors", Some(DOCTOR), Some(edited)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated = response_json(response).await;
        assert_eq!(updated["doctor"]["id"], created["doctor"]["id"]);
        assert_eq!(updated["doctor"]["fees"], 950.0);
    }

    #[tokio::test]
    async fn doctor_update_without_profile_is_404() {
        let app = api_router(mock_core(""));
        let response = app
            .oneshot(make_request(
                "PUT",
                "/api/doctors",
                Some(PATIENT),
                Some(r#"{"name":"X","specialization":"ENT"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn doctor_create_requires_user_but_list_is_public() {
        let core = mock_core("");
        seed_doctor(&core);

        let response = api_router(core.clone())
            .oneshot(make_request("POST", "/api/doctors", None, Some("{}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = api_router(core)
            .oneshot(make_request("GET", "/api/doctors?specialization=cardiology&max_fees=900", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["doctors"].as_array().unwrap().len(), 1);
        assert_eq!(json["specializations"], serde_json::json!(["Cardiology"]));
    }

    #[tokio::test]
    async fn doctor_create_validates_profile() {
        let app = api_router(mock_core(""));
        let response = app
            .oneshot(make_request(
                "POST",
                "/api/doctors",
                Some(DOCTOR),
                Some(r#"{"name":" ","specialization":"ENT"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"], "Name is required");
    }

    #[tokio::test]
    async fn doctor_list_rejects_bad_sort() {
        let app = api_router(mock_core(""));
        let response = app
            .oneshot(make_request("GET", "/api/doctors?sort=rating", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // ── Appointments ─────────────────────────────────────────

    #[tokio::test]
    async fn booking_is_visible_to_patient_and_doctor() {
        let core = mock_core("");
        seed_doctor(&core);
        let booking = format!(
            r#"{{"doctorEmail":"{DOCTOR}","patientName":"Pat Lee","appointmentDate":"2026-11-02","appointmentTime":"09:30","reason":"Chest pain"}}"#
        );

        let response = api_router(core.clone())
            .oneshot(make_request("POST", "/api/appointments", Some(PATIENT), Some(&booking)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["appointment"]["acceptanceStatus"], "Pending");
        assert_eq!(json["appointment"]["doctorName"], "Dr. Asha Rao");
        assert_eq!(json["appointment"]["patientEmail"], PATIENT);

        let response = api_router(core.clone())
            .oneshot(make_request("GET", "/api/appointments", Some(PATIENT), None))
            .await
            .unwrap();
        let mine = response_json(response).await;
        assert_eq!(mine["appointments"].as_array().unwrap().len(), 1);

        let response = api_router(core.clone())
            .oneshot(make_request("GET", "/api/appointments?type=doctor", Some(DOCTOR), None))
            .await
            .unwrap();
        let theirs = response_json(response).await;
        assert_eq!(theirs["appointments"][0]["patientName"], "Pat Lee");

        let response = api_router(core)
            .oneshot(make_request("GET", "/api/appointments?type=doctor", Some(PATIENT), None))
            .await
            .unwrap();
        let none = response_json(response).await;
        assert!(none["appointments"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn booking_unknown_doctor_is_404() {
        let app = api_router(mock_core(""));
        let booking = r#"{"doctorEmail":"ghost@clinic.example.com","patientName":"Pat","appointmentDate":"2026-11-02","appointmentTime":"09:30"}"#;
        let response = app
            .oneshot(make_request("POST", "/api/appointments", Some(PATIENT), Some(booking)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn booking_with_bad_date_is_400() {
        let core = mock_core("");
        seed_doctor(&core);
        let booking = format!(
            r#"{{"doctorEmail":"{DOCTOR}","patientName":"Pat","appointmentDate":"tomorrow","appointmentTime":"09:30"}}"#
        );
        let response = api_router(core)
            .oneshot(make_request("POST", "/api/appointments", Some(PATIENT), Some(&booking)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // ── Users and contact ────────────────────────────────────

    #[tokio::test]
    async fn user_profile_lifecycle() {
        let core = mock_core("");

        let response = api_router(core.clone())
            .oneshot(make_request("GET", "/api/users", Some(PATIENT), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = response_json(response).await;
        assert_eq!(json["error"], "User not found");

        let profile = r#"{"name":"Pat Lee","gender":"F","age":34,"role":"patient"}"#;
        let response = api_router(core.clone())
            .oneshot(make_request("PUT", "/api/users", Some(PATIENT), Some(profile)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let saved = response_json(response).await;
        assert_eq!(saved["user"]["email"], PATIENT);

        let response = api_router(core)
            .oneshot(make_request(
                "GET",
                &format!("/api/users?email={PATIENT}"),
                Some(PATIENT),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["user"]["name"], "Pat Lee");
        assert_eq!(json["user"]["gender"], "F");
        assert_eq!(json["user"]["age"], 34);
        assert_eq!(json["user"]["role"], "patient");
        assert_eq!(json["user"]["id"], saved["user"]["id"]);
    }

    #[tokio::test]
    async fn user_profile_of_someone_else_is_forbidden() {
        let app = api_router(mock_core(""));
        let response = app
            .oneshot(make_request("GET", "/api/users?email=someone@else.org", Some(PATIENT), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn user_profile_requires_user_and_valid_role() {
        let core = mock_core("");
        let response = api_router(core.clone())
            .oneshot(make_request("GET", "/api/users", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = api_router(core)
            .oneshot(make_request(
                "PUT",
                "/api/users",
                Some(PATIENT),
                Some(r#"{"name":"Pat","role":"admin"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn contact_message_is_public_and_stored() {
        let core = mock_core("");
        let body = r#"{"name":"Pat","email":"pat@example.com","message":"Do you take walk-ins?"}"#;
        let response = api_router(core.clone())
            .oneshot(make_request("POST", "/api/contact", None, Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["status"], "success");

        let count: i64 = core
            .with_db(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM contact_messages", [], |row| row.get(0))?)
            })
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn contact_requires_every_field() {
        let core = mock_core("");
        for body in [
            r#"{"email":"pat@example.com","message":"hi"}"#,
            r#"{"name":"Pat","message":"hi"}"#,
            r#"{"name":"Pat","email":"pat@example.com","message":"   "}"#,
        ] {
            let response = api_router(core.clone())
                .oneshot(make_request("POST", "/api/contact", None, Some(body)))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
            let json = response_json(response).await;
            assert_eq!(json["error"], "Please fill in all fields");
        }

        let response = api_router(core)
            .oneshot(make_request(
                "POST",
                "/api/contact",
                None,
                Some(r#"{"name":"Pat","email":"not-an-email","message":"hi"}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn appointment_list_rejects_unknown_type() {
        let app = api_router(mock_core(""));
        let response = app
            .oneshot(make_request("GET", "/api/appointments?type=admin", Some(PATIENT), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
