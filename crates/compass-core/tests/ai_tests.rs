mod common;

use std::time::Duration;

use common::{test_context, FixedCompletion, RecordingBackend};
use compass_core::{
    ai::{prompt_for_step, SYSTEM_PROMPT},
    models::{Language, WizardData},
    AiConfig, CompassError, CompletionResponse, CompletionService, HttpCompletionService,
    LaunchParams, NoticeLevel, Wizard,
};
use serde_json::json;
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn http_service(server: &MockServer, api_key: Option<&str>) -> HttpCompletionService {
    HttpCompletionService::new(&AiConfig {
        endpoint: Some(format!("{}/v1/complete", server.uri())),
        api_key: api_key.map(str::to_string),
        timeout: Duration::from_secs(5),
        enabled: true,
    })
    .expect("Failed to build client")
}

fn vision_request() -> compass_core::CompletionRequest {
    let data = WizardData {
        name_en: "Smart City 2030".to_string(),
        ..Default::default()
    };
    prompt_for_step(2, &data, Language::En).unwrap().unwrap()
}

#[tokio::test]
async fn test_http_service_posts_request_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/complete"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({"system_prompt": SYSTEM_PROMPT})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"vision_en": "A connected city"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = http_service(&server, Some("sk-test"));
    let response = service.complete(vision_request()).await.unwrap();

    assert!(response.success);
    assert_eq!(response.data.unwrap()["vision_en"], "A connected city");
}

#[tokio::test]
async fn test_http_service_reports_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/complete"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(1)
        .mount(&server)
        .await;

    let service = http_service(&server, None);
    let error = service.complete(vision_request()).await.unwrap_err();

    assert!(matches!(error, CompassError::Ai { .. }));
    assert!(error.to_string().contains("503"));
    assert!(error.to_string().contains("overloaded"));
}

#[tokio::test]
async fn test_http_service_passes_service_failures_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "quota exceeded"
        })))
        .mount(&server)
        .await;

    let response = http_service(&server, None)
        .complete(vision_request())
        .await
        .unwrap();
    assert_eq!(response.failure_reason().as_deref(), Some("quota exceeded"));
}

#[test]
fn test_http_service_requires_endpoint() {
    let result = HttpCompletionService::new(&AiConfig::default());
    assert!(matches!(result, Err(CompassError::Configuration { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_generation_applies_usable_fields_only() {
    let backend = RecordingBackend::new();
    let ai = FixedCompletion::new(Ok(CompletionResponse::ok(json!({
        "vision_en": "A connected, liveable city",
        "mission_en": "   ",
        "core_values": "not a list"
    }))));
    let (context, _drafts) = test_context(&backend);
    let mut wizard = Wizard::open(context.with_ai(ai.clone()), &LaunchParams::new_plan())
        .await
        .unwrap();
    wizard.update_data(compass_core::WizardUpdate {
        mission_en: Some("Existing mission".to_string()),
        ..Default::default()
    });

    let outcome = wizard.generate_for_step(2).await.unwrap().unwrap();
    assert_eq!(outcome.applied, vec!["vision_en"]);
    assert!(outcome.skipped.contains(&"mission_en"));
    assert!(outcome.skipped.contains(&"core_values"));

    assert_eq!(wizard.data().vision_en, "A connected, liveable city");
    assert_eq!(wizard.data().mission_en, "Existing mission");
    assert!(wizard.generating_step().is_none());
    assert!(wizard
        .take_notices()
        .iter()
        .any(|n| n.level == NoticeLevel::Success));

    let requests = ai.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].response_json_schema["properties"]
        .get("vision_en")
        .is_some());
}

#[tokio::test(start_paused = true)]
async fn test_generation_failure_leaves_data_untouched() {
    let backend = RecordingBackend::new();
    let ai = FixedCompletion::new(Ok(CompletionResponse::failed("quota exceeded")));
    let (context, _drafts) = test_context(&backend);
    let mut wizard = Wizard::open(context.with_ai(ai), &LaunchParams::new_plan())
        .await
        .unwrap();

    assert!(wizard.generate_for_step(9).await.unwrap().is_none());
    assert!(wizard.data().objectives.is_empty());
    let notices = wizard.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert!(notices[0].message.contains("quota exceeded"));
    assert!(wizard.generating_step().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_generation_guards() {
    let backend = RecordingBackend::new();

    let (context, _drafts) = test_context(&backend);
    let mut wizard = Wizard::open(context, &LaunchParams::new_plan()).await.unwrap();
    assert!(!wizard.ai_available());
    assert!(wizard.begin_generation(2).unwrap().is_none());
    assert_eq!(wizard.take_notices()[0].level, NoticeLevel::Warning);

    let ai = FixedCompletion::new(Ok(CompletionResponse::ok(json!({}))));
    let (context, _drafts) = test_context(&backend);
    let mut wizard = Wizard::open(context.with_ai(ai), &LaunchParams::new_plan())
        .await
        .unwrap();
    assert!(wizard.ai_available());
    assert!(wizard.begin_generation(18).unwrap().is_none(), "review offers no generation");
    assert!(wizard.begin_generation(0).is_err());

    assert!(wizard.begin_generation(4).unwrap().is_some());
    assert_eq!(wizard.generating_step(), Some(4));
    assert!(wizard.begin_generation(5).unwrap().is_none(), "one generation at a time");

    // A stray answer for another step is ignored
    assert!(wizard
        .finish_generation(5, Ok(CompletionResponse::ok(json!({}))))
        .is_none());
    assert_eq!(wizard.generating_step(), Some(4));

    let outcome = wizard
        .finish_generation(4, Err(CompassError::ai("timed out")))
        .map(|o| o.applied);
    assert!(outcome.is_none());
    assert!(wizard.generating_step().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_review_mode_offers_no_generation() {
    let backend = RecordingBackend::new();
    let plan = backend.insert(WizardData::default(), false);
    let ai = FixedCompletion::new(Ok(CompletionResponse::ok(json!({}))));
    let (context, _drafts) = test_context(&backend);
    let mut wizard = Wizard::open(context.with_ai(ai.clone()), &LaunchParams::review(plan.id))
        .await
        .unwrap();

    assert!(!wizard.ai_available());
    assert!(wizard.generate_for_step(2).await.unwrap().is_none());
    assert!(ai.requests.lock().unwrap().is_empty());
}
