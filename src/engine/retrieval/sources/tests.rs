use super::*;
use crate::config::{ChatConfig, Config, EncyclopedicConfig, GenerativeConfig};
use crate::engine::output::sections::headings;
use crate::engine::retrieval::result::ProviderContent;
use crate::engine::retrieval::{AdapterError, Router, Throttle};
use crate::engine::traits::ContentProvider;
use crate::engine::{AttemptOutcome, GenerationOptions, GenerationRequest, Orchestrator, SourceKind};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EXTRACT: &str = "Photosynthesis is a biological process used by plants to convert light energy into chemical energy. Most plants, algae and cyanobacteria perform it. The process usually releases oxygen as a waste product.";

fn opts() -> GenerationOptions {
    GenerationOptions::default()
}

fn throttle() -> Arc<Throttle> {
    Arc::new(Throttle::disabled())
}

fn encyclopedic_config(server: &MockServer) -> EncyclopedicConfig {
    EncyclopedicConfig {
        api_url: format!("{}/w/api.php", server.uri()),
        rest_url: format!("{}/api/rest_v1", server.uri()),
        ..Default::default()
    }
}

fn generative_config(server: &MockServer, token: Option<&str>) -> GenerativeConfig {
    GenerativeConfig {
        api_url: format!("{}/models", server.uri()),
        api_token: token.map(str::to_string),
        ..Default::default()
    }
}

fn chat_config(server: &MockServer, key: Option<&str>) -> ChatConfig {
    ChatConfig {
        api_url: format!("{}/v1/chat/completions", server.uri()),
        api_key: key.map(str::to_string),
        ..Default::default()
    }
}

async fn mount_search(server: &MockServer, hits: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("list", "search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": { "search": hits }
        })))
        .mount(server)
        .await;
}

async fn mount_extract(server: &MockServer, extract: &str) {
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("prop", "extracts"))
        .and(query_param("pageids", "24544"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": { "pages": { "24544": {
                "pageid": 24544,
                "title": "Photosynthesis",
                "extract": extract
            } } }
        })))
        .mount(server)
        .await;
}

async fn mount_categories(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("prop", "categories"))
        .respond_with(template)
        .mount(server)
        .await;
}

fn photosynthesis_hit() -> serde_json::Value {
    json!([{ "pageid": 24544, "title": "Photosynthesis" }])
}

fn chat_reply(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    }))
}

#[tokio::test]
async fn encyclopedic_lookup_returns_extract_and_categories() {
    let server = MockServer::start().await;
    mount_search(&server, photosynthesis_hit()).await;
    mount_extract(&server, EXTRACT).await;
    mount_categories(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "query": { "pages": { "24544": { "categories": [
                { "ns": 14, "title": "Category:Plant physiology" },
                { "ns": 14, "title": "Category:Biological processes" }
            ] } } }
        })),
    )
    .await;

    let source = EncyclopedicSource::new(
        reqwest::Client::new(),
        throttle(),
        encyclopedic_config(&server),
    );
    let content = source.fetch("photosynthesis", opts()).await.unwrap();

    let ProviderContent::Extract(extract) = content else {
        panic!("expected an extract");
    };
    assert_eq!(extract.text, EXTRACT);
    assert_eq!(extract.categories, vec!["Plant physiology", "Biological processes"]);
    assert_eq!(extract.attribution.name, "Wikipedia");
    assert_eq!(extract.attribution.title, "Photosynthesis");
    assert_eq!(
        extract.attribution.url,
        "https://en.wikipedia.org/wiki/Photosynthesis"
    );
}

#[tokio::test]
async fn encyclopedic_zero_hits_is_not_found() {
    let server = MockServer::start().await;
    mount_search(&server, json!([])).await;

    let source = EncyclopedicSource::new(
        reqwest::Client::new(),
        throttle(),
        encyclopedic_config(&server),
    );
    let err = source.fetch("Xyzzyqplonk123", opts()).await.unwrap_err();
    assert!(matches!(err, AdapterError::NotFound { .. }));
}

#[tokio::test]
async fn encyclopedic_uses_rest_summary_when_extract_is_empty() {
    let server = MockServer::start().await;
    mount_search(&server, photosynthesis_hit()).await;
    mount_extract(&server, "").await;
    mount_categories(&server, ResponseTemplate::new(500)).await;
    Mock::given(method("GET"))
        .and(path("/api/rest_v1/page/summary/Photosynthesis"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "extract": EXTRACT })))
        .expect(1)
        .mount(&server)
        .await;

    let source = EncyclopedicSource::new(
        reqwest::Client::new(),
        throttle(),
        encyclopedic_config(&server),
    );
    let ProviderContent::Extract(extract) = source.fetch("photosynthesis", opts()).await.unwrap() else {
        panic!("expected an extract");
    };
    assert_eq!(extract.text, EXTRACT);
    assert!(extract.categories.is_empty());
}

#[tokio::test]
async fn encyclopedic_page_without_any_extract_is_not_found() {
    let server = MockServer::start().await;
    mount_search(&server, photosynthesis_hit()).await;
    mount_extract(&server, "   ").await;
    Mock::given(method("GET"))
        .and(path("/api/rest_v1/page/summary/Photosynthesis"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "title": "Photosynthesis" })))
        .mount(&server)
        .await;

    let source = EncyclopedicSource::new(
        reqwest::Client::new(),
        throttle(),
        encyclopedic_config(&server),
    );
    let err = source.fetch("photosynthesis", opts()).await.unwrap_err();
    assert!(matches!(err, AdapterError::NotFound { .. }));
}

#[tokio::test]
async fn encyclopedic_http_error_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let source = EncyclopedicSource::new(
        reqwest::Client::new(),
        throttle(),
        encyclopedic_config(&server),
    );
    let err = source.fetch("photosynthesis", opts()).await.unwrap_err();
    assert!(matches!(
        err,
        AdapterError::TransportFailure {
            status: Some(503),
            ..
        }
    ));
}

#[tokio::test]
async fn generative_without_token_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    for token in [None, Some("your_huggingface_api_token_here")] {
        let source = GenerativeSource::new(
            reqwest::Client::new(),
            throttle(),
            generative_config(&server, token),
        );
        let err = source.fetch("Optics", opts()).await.unwrap_err();
        assert!(matches!(err, AdapterError::ConfigurationMissing { .. }));
    }
}

#[tokio::test]
async fn generative_returns_generated_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/microsoft/DialoGPT-medium"))
        .and(header("authorization", "Bearer hf_test"))
        .and(body_partial_json(json!({
            "inputs": "Create a study guide for Optics. Include key concepts, applications, and learning tips.",
            "parameters": { "max_length": 300, "do_sample": true, "return_full_text": false }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "generated_text": "Optics is the branch of physics that studies light. It covers reflection and refraction." }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let source = GenerativeSource::new(
        reqwest::Client::new(),
        throttle(),
        generative_config(&server, Some("hf_test")),
    );
    let ProviderContent::Generated(text) = source.fetch("Optics", opts()).await.unwrap() else {
        panic!("expected generated text");
    };
    assert!(text.starts_with("Optics is the branch of physics"));
}

#[tokio::test]
async fn generative_error_statuses_are_distinguished() {
    let server = MockServer::start().await;
    let source = GenerativeSource::new(
        reqwest::Client::new(),
        throttle(),
        generative_config(&server, Some("hf_test")),
    );

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    let err = source.fetch("Optics", opts()).await.unwrap_err();
    assert!(matches!(err, AdapterError::NotFound { .. }));

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    let err = source.fetch("Optics", opts()).await.unwrap_err();
    assert!(matches!(
        err,
        AdapterError::TransportFailure {
            status: Some(500),
            ..
        }
    ));
    assert!(err.to_string().contains("overloaded"));
}

#[tokio::test]
async fn generative_empty_text_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "generated_text": "   " })))
        .mount(&server)
        .await;

    let source = GenerativeSource::new(
        reqwest::Client::new(),
        throttle(),
        generative_config(&server, Some("hf_test")),
    );
    let err = source.fetch("Optics", opts()).await.unwrap_err();
    assert!(matches!(err, AdapterError::NotFound { .. }));
}

#[tokio::test]
async fn chat_parses_structured_reply() {
    let server = MockServer::start().await;
    let document = json!({
        "topic": "Optics",
        "summary": "## Overview\nOptics studies light.",
        "practiceQuestions": [{ "question": "What is refraction?", "answer": "Bending of light." }],
        "videoRecommendations": []
    });
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({ "model": "gpt-3.5-turbo", "max_tokens": 3000 })))
        .respond_with(chat_reply(&document.to_string()))
        .expect(1)
        .mount(&server)
        .await;

    let source = ChatSource::new(
        reqwest::Client::new(),
        throttle(),
        chat_config(&server, Some("sk-test")),
    );
    let ProviderContent::Structured(doc) = source.fetch("Optics", opts()).await.unwrap() else {
        panic!("expected a structured document");
    };
    assert_eq!(doc.summary, "## Overview\nOptics studies light.");
    assert_eq!(doc.practice_questions.unwrap()[0].answer, "Bending of light.");
    assert_eq!(doc.video_recommendations, Some(vec![]));
}

#[tokio::test]
async fn chat_degrades_unparseable_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(chat_reply("Optics is the study of light. It explains lenses."))
        .mount(&server)
        .await;

    let source = ChatSource::new(
        reqwest::Client::new(),
        throttle(),
        chat_config(&server, Some("sk-test")),
    );
    let ProviderContent::Structured(doc) = source.fetch("Optics", opts()).await.unwrap() else {
        panic!("expected a structured document");
    };
    assert_eq!(doc.summary, "Optics is the study of light. It explains lenses.");
    assert_eq!(doc.practice_questions.map(|q| q.len()), Some(3));
    assert_eq!(doc.video_recommendations.map(|v| v.len()), Some(3));
}

#[tokio::test]
async fn chat_rejected_key_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Incorrect API key provided" }
        })))
        .mount(&server)
        .await;

    let source = ChatSource::new(
        reqwest::Client::new(),
        throttle(),
        chat_config(&server, Some("sk-wrong")),
    );
    let err = source.fetch("Optics", opts()).await.unwrap_err();
    assert!(matches!(
        err,
        AdapterError::TransportFailure {
            status: Some(401),
            ..
        }
    ));
}

#[tokio::test]
async fn chat_without_choices_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let source = ChatSource::new(
        reqwest::Client::new(),
        throttle(),
        chat_config(&server, Some("sk-test")),
    );
    let err = source.fetch("Optics", opts()).await.unwrap_err();
    assert!(matches!(err, AdapterError::NotFound { .. }));
}

#[tokio::test]
async fn demo_source_never_fails() {
    let demo = DemoSource::new();
    let ProviderContent::Structured(doc) = demo.fetch("Optics", opts()).await.unwrap() else {
        panic!("expected a structured document");
    };
    assert!(doc.summary.contains("Optics"));
    assert!(doc.practice_questions.is_none());
    assert!(doc.video_recommendations.is_none());
}

#[tokio::test]
async fn pipeline_over_http_falls_back_to_demo() {
    let server = MockServer::start().await;
    mount_search(&server, json!([])).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.encyclopedic = encyclopedic_config(&server);
    config.generative = generative_config(&server, Some("hf_test"));
    config.chat = chat_config(&server, None);
    let router = Router::with_throttle(&config, throttle()).unwrap();
    let orch = Orchestrator::new(router, crate::engine::output::Normalizer::new(&config.normalizer));

    let request =
        GenerationRequest::new("Xyzzyqplonk123", SourceKind::Encyclopedic, Default::default())
            .unwrap();
    let generation = orch.generate_traced(&request).await.unwrap();

    let outcomes: Vec<_> = generation.attempts.iter().map(|a| a.outcome).collect();
    assert_eq!(
        outcomes,
        vec![
            AttemptOutcome::NotFound,
            AttemptOutcome::TransportFailure,
            AttemptOutcome::Served,
        ]
    );
    assert_eq!(generation.served_by, SourceKind::Demo);
    assert!(generation.document.source.is_none());
    assert!(headings(&generation.document.summary).contains(&"Common Mistakes to Avoid"));
}

#[tokio::test]
async fn pipeline_over_http_serves_wikipedia() {
    let server = MockServer::start().await;
    mount_search(&server, photosynthesis_hit()).await;
    mount_extract(&server, EXTRACT).await;
    mount_categories(&server, ResponseTemplate::new(500)).await;

    let mut config = Config::default();
    config.encyclopedic = encyclopedic_config(&server);
    let router = Router::with_throttle(&config, throttle()).unwrap();
    let orch = Orchestrator::new(router, crate::engine::output::Normalizer::new(&config.normalizer));

    let request =
        GenerationRequest::new("Photosynthesis", SourceKind::Encyclopedic, Default::default())
            .unwrap();
    let doc = orch.generate(&request).await.unwrap();

    assert_eq!(doc.source.as_ref().unwrap().title, "Photosynthesis");
    assert_eq!(headings(&doc.summary), vec!["Overview", "Study Tips", "Source"]);
    assert_eq!(doc.practice_questions.len(), 3);
    assert_eq!(doc.video_recommendations.len(), 3);
}

#[tokio::test]
async fn chat_prompt_and_degrade_follow_options() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(chat_reply("Optics is the study of light. It explains lenses."))
        .expect(1)
        .mount(&server)
        .await;

    let source = ChatSource::new(
        reqwest::Client::new(),
        throttle(),
        chat_config(&server, Some("sk-test")),
    );
    let options = GenerationOptions {
        include_practice_questions: false,
        include_videos: true,
    };
    let ProviderContent::Structured(doc) = source.fetch("Optics", options).await.unwrap() else {
        panic!("expected a structured document");
    };
    assert!(doc.practice_questions.is_none());
    assert_eq!(doc.video_recommendations.map(|v| v.len()), Some(3));

    let requests = server.received_requests().await.unwrap_or_default();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = body["messages"][1]["content"].as_str().unwrap();
    assert!(prompt.contains("- No practice questions"));
    assert!(prompt.contains("- 3 video recommendations"));
}
