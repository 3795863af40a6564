//! Integration tests for `EngineClient` using wiremock HTTP mocks.

use viral_gateway::{EngineClient, GatewayError, JobState, SceneRow};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> EngineClient {
    EngineClient::with_base_url(base_url, 30).expect("client construction should not fail")
}

#[tokio::test]
async fn create_generation_returns_job_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate"))
        .and(body_json(serde_json::json!({ "topic": "budget travel tips 2026" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "generation_id": "a1b2c3d4",
            "status": "running",
            "language": "en"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let reply = client
        .create_generation("budget travel tips 2026")
        .await
        .expect("should parse create reply");

    assert_eq!(reply.generation_id, "a1b2c3d4");
    assert_eq!(reply.status, JobState::Running);
    assert_eq!(reply.language.as_deref(), Some("en"));
}

#[tokio::test]
async fn create_generation_surfaces_backend_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "detail": "Topic cannot be empty"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.create_generation("  ").await.unwrap_err();

    match err {
        GatewayError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Topic cannot be empty");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn non_json_error_body_falls_back_to_generic_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status/gx"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.generation_status(Some("gx")).await.unwrap_err();

    match err {
        GatewayError::Api { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "backend returned HTTP 502");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn generation_status_parses_script_ready_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status/g1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "generation_id": "g1",
            "topic": "budget travel tips 2026",
            "language": "en",
            "status": "script_ready",
            "progress": 50,
            "phase": "script_ready",
            "script_data": {
                "script_columns": [
                    { "timecode": "0-3s", "visual_cue": "plane window", "audio": "hook" },
                    { "timecode": "3-9s", "visual_cue": "hostel montage", "audio": "tip one" }
                ],
                "script_source": "ollama",
                "seo_keywords": ["travel", "budget"]
            }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let snapshot = client
        .generation_status(Some("g1"))
        .await
        .expect("should parse snapshot");

    assert_eq!(snapshot.status, JobState::ScriptReady);
    assert_eq!(snapshot.progress, 50);
    let script = snapshot.script_data.expect("script data present");
    assert_eq!(script.script_columns.len(), 2);
    assert_eq!(script.script_columns[0].visual_cue, "plane window");
    assert_eq!(script.script_source.as_deref(), Some("ollama"));
}

#[tokio::test]
async fn generation_status_without_id_uses_current_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "idle",
            "progress": 0
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let snapshot = client.generation_status(None).await.expect("should parse");
    assert_eq!(snapshot.status, JobState::Idle);
}

#[tokio::test]
async fn submit_script_sends_scenes_verbatim() {
    let server = MockServer::start().await;

    let scenes = vec![
        SceneRow {
            timecode: "0-3s".to_string(),
            visual_cue: "edited opener".to_string(),
            audio: "edited hook".to_string(),
        },
        SceneRow {
            timecode: "3-6s".to_string(),
            visual_cue: "b-roll".to_string(),
            audio: "second line".to_string(),
        },
    ];

    Mock::given(method("POST"))
        .and(path("/proceed/g1"))
        .and(body_json(serde_json::json!({
            "script_columns": [
                { "timecode": "0-3s", "visual_cue": "edited opener", "audio": "edited hook" },
                { "timecode": "3-6s", "visual_cue": "b-roll", "audio": "second line" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "generation_id": "g1",
            "status": "running"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let reply = client
        .submit_script("g1", &scenes)
        .await
        .expect("submit should succeed");
    assert_eq!(reply.status, JobState::Running);
}

#[tokio::test]
async fn brainstorm_returns_agent_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/brainstorm"))
        .and(body_json(serde_json::json!({
            "agent": "alpha",
            "prompt": "what is trending in travel?"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "agent": "alpha",
            "status": "success",
            "content": "Shoulder-season city breaks are spiking."
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let reply = client
        .brainstorm("alpha", "what is trending in travel?")
        .await
        .expect("should parse brainstorm reply");
    assert_eq!(reply.content, "Shoulder-season city breaks are spiking.");
}

#[tokio::test]
async fn list_generations_preserves_backend_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "generations": [
                {
                    "id": "g2",
                    "topic": "morning routine that changed my life",
                    "status": "completed",
                    "progress": 100,
                    "started_at": "2026-08-29T09:00:00.000001"
                },
                {
                    "id": "g1",
                    "topic": "budget travel tips 2026",
                    "status": "failed",
                    "progress": 40,
                    "started_at": "not-a-timestamp"
                }
            ]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let entries = client.list_generations().await.expect("should parse list");

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, "g2");
    assert_eq!(entries[0].status, JobState::Completed);
    assert!(entries[0].started_at.is_some());
    assert_eq!(entries[1].id, "g1");
    // Malformed timestamps degrade to None instead of failing the list.
    assert!(entries[1].started_at.is_none());
}

#[tokio::test]
async fn delete_generation_maps_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/generations/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "detail": "Generation not found"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.delete_generation("missing").await.unwrap_err();
    assert!(
        matches!(err, GatewayError::Api { status: 404, ref message } if message == "Generation not found"),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn social_status_parses_platform_map() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/social/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "tiktok": { "connected": true, "connected_at": "2026-08-28T18:30:00" },
            "youtube": { "connected": false, "connected_at": null }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let status = client.social_status().await.expect("should parse map");

    assert!(status["tiktok"].connected);
    assert!(status["tiktok"].connected_at.is_some());
    assert!(!status["youtube"].connected);
    assert!(status["youtube"].connected_at.is_none());
}

#[tokio::test]
async fn publish_to_social_returns_share_url() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/social/publish/tiktok/g1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "published",
            "platform": "tiktok",
            "share_url": "https://www.tiktok.com/@managed_profile"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let reply = client
        .publish_to_social("tiktok", "g1")
        .await
        .expect("should parse publish reply");
    assert_eq!(reply.share_url, "https://www.tiktok.com/@managed_profile");
}

#[tokio::test]
async fn recent_results_unwraps_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/results"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                {
                    "topic": "5-minute cooking hacks",
                    "script": "full script text",
                    "variations": [],
                    "captions": ["caption one"],
                    "video_path": "/videos/final.mp4",
                    "monetization_brief": "brief",
                    "products": [
                        { "name": "Chef knife", "price": "$29", "rating": 4.5 }
                    ],
                    "earnings_projection": { "conservative": "$120", "viral": "$4,800" },
                    "status": "completed"
                }
            ]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let results = client.recent_results().await.expect("should parse results");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].topic, "5-minute cooking hacks");
    assert_eq!(results[0].products[0].name, "Chef knife");
}

#[tokio::test]
async fn health_probe_parses() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok",
            "timestamp": "2026-08-29T12:00:00"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let health = client.health().await.expect("should parse health");
    assert_eq!(health.status, "ok");
}
