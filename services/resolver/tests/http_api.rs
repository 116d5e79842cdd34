//! HTTP-level tests of the wire contract, driven through an in-process
//! server backed by the in-memory registry.

use std::sync::Arc;

use arklet_ark::parse_ark;
use arklet_resolver::engine::EngineSettings;
use arklet_resolver::registry::{ArkRecord, MemoryRegistry, Naan, Registry};
use arklet_resolver::{api, state::AppState};
use tokio::net::TcpListener;
use uuid::Uuid;

struct ApiFixture {
    base_url: String,
    registry: MemoryRegistry,
    key: Uuid,
}

async fn start_api() -> ApiFixture {
    let registry = MemoryRegistry::new();
    registry.add_naan(Naan {
        naan: 1,
        name: "Archive".to_string(),
        description: "A NAAN".to_string(),
        url: "https://example.com".to_string(),
    });
    let key = Uuid::new_v4();
    registry.add_key(key, 1, true);

    let state = AppState::new(
        Arc::new(registry.clone()),
        EngineSettings::default(),
    );
    let app = api::create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    ApiFixture {
        base_url,
        registry,
        key,
    }
}

/// Client that surfaces redirects instead of following them.
fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

fn mint_body() -> serde_json::Value {
    serde_json::json!({ "naan": 1, "shoulder": "/t2" })
}

async fn seed_ark(registry: &MemoryRegistry, url: &str) -> String {
    let record = ArkRecord {
        ark: "1/t2x4fh2m9pb".to_string(),
        naan: 1,
        shoulder: "/t2".to_string(),
        assigned_name: "x4fh2m9pb".to_string(),
        url: url.to_string(),
        metadata: "seeded".to_string(),
        commitment: String::new(),
    };
    registry.create_ark(&record).await.unwrap();
    record.ark
}

// =============================================================================
// Mint
// =============================================================================

#[tokio::test]
async fn mint_happy_path() {
    let fixture = start_api().await;

    let resp = client()
        .post(format!("{}/mint", fixture.base_url))
        .header("Authorization", format!("Bearer {}", fixture.key))
        .json(&mint_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    let minted = body["ark"].as_str().unwrap();
    let parsed = parse_ark(minted).unwrap();
    assert_eq!(parsed.naan, 1);
    // The name segment carries the shoulder without its leading slash.
    assert!(parsed.name.starts_with("t2"));
    assert_eq!(fixture.registry.ark_count(), 1);
}

#[tokio::test]
async fn mint_is_post_only() {
    let fixture = start_api().await;

    let resp = client()
        .put(format!("{}/mint", fixture.base_url))
        .header("Authorization", format!("Bearer {}", fixture.key))
        .json(&mint_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 405);
}

#[tokio::test]
async fn mint_requires_authorization_header() {
    let fixture = start_api().await;

    let resp = client()
        .post(format!("{}/mint", fixture.base_url))
        .json(&mint_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
    assert_eq!(fixture.registry.ark_count(), 0);
}

#[tokio::test]
async fn mint_rejects_unknown_key() {
    let fixture = start_api().await;

    let resp = client()
        .post(format!("{}/mint", fixture.base_url))
        .header("Authorization", format!("Bearer {}", Uuid::new_v4()))
        .json(&mint_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
    assert_eq!(fixture.registry.ark_count(), 0);
}

#[tokio::test]
async fn mint_rejects_inactive_key() {
    let fixture = start_api().await;
    fixture.registry.deactivate_key(fixture.key);

    let resp = client()
        .post(format!("{}/mint", fixture.base_url))
        .header("Authorization", format!("Bearer {}", fixture.key))
        .json(&mint_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn mint_rejects_malformed_key() {
    let fixture = start_api().await;

    let resp = client()
        .post(format!("{}/mint", fixture.base_url))
        .header("Authorization", "Bearer not-a-uuid4")
        .json(&mint_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn mint_rejects_mismatched_naan() {
    let fixture = start_api().await;

    let resp = client()
        .post(format!("{}/mint", fixture.base_url))
        .header("Authorization", format!("Bearer {}", fixture.key))
        .json(&serde_json::json!({ "naan": 2, "shoulder": "/t2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
    assert_eq!(fixture.registry.ark_count(), 0);
}

#[tokio::test]
async fn mint_rejects_shoulder_without_separator() {
    let fixture = start_api().await;

    let resp = client()
        .post(format!("{}/mint", fixture.base_url))
        .header("Authorization", format!("Bearer {}", fixture.key))
        .json(&serde_json::json!({ "naan": 1, "shoulder": "t2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn mint_rejects_wrong_body_structure() {
    let fixture = start_api().await;

    let resp = client()
        .post(format!("{}/mint", fixture.base_url))
        .header("Authorization", format!("Bearer {}", fixture.key))
        .json(&serde_json::json!({ "a": "b" }))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn update_happy_path() {
    let fixture = start_api().await;
    let ark = seed_ark(&fixture.registry, "https://example.com/old").await;

    let resp = client()
        .put(format!("{}/update", fixture.base_url))
        .header("Authorization", format!("Bearer {}", fixture.key))
        .json(&serde_json::json!({
            "ark": format!("ark:/{ark}"),
            "url": "https://example.com/new",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let record = fixture.registry.get_ark(&ark).await.unwrap().unwrap();
    assert_eq!(record.url, "https://example.com/new");
    // Omitted optional fields overwrite with empty strings.
    assert_eq!(record.metadata, "");
}

#[tokio::test]
async fn update_with_foreign_key_is_forbidden() {
    let fixture = start_api().await;
    let ark = seed_ark(&fixture.registry, "https://example.com/old").await;

    let other_key = Uuid::new_v4();
    fixture.registry.add_key(other_key, 2, true);

    let resp = client()
        .put(format!("{}/update", fixture.base_url))
        .header("Authorization", format!("Bearer {other_key}"))
        .json(&serde_json::json!({
            "ark": format!("ark:/{ark}"),
            "url": "https://evil.example.com",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    let record = fixture.registry.get_ark(&ark).await.unwrap().unwrap();
    assert_eq!(record.url, "https://example.com/old");
}

#[tokio::test]
async fn update_missing_record_is_not_found() {
    let fixture = start_api().await;

    let resp = client()
        .put(format!("{}/update", fixture.base_url))
        .header("Authorization", format!("Bearer {}", fixture.key))
        .json(&serde_json::json!({ "ark": "ark:/1/t2missing" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn update_malformed_ark_is_bad_request() {
    let fixture = start_api().await;

    let resp = client()
        .put(format!("{}/update", fixture.base_url))
        .header("Authorization", format!("Bearer {}", fixture.key))
        .json(&serde_json::json!({ "ark": "not-an-ark" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

// =============================================================================
// Resolve
// =============================================================================

#[tokio::test]
async fn resolve_redirects_to_bound_url() {
    let fixture = start_api().await;
    let ark = seed_ark(&fixture.registry, "https://example.com/item").await;

    let resp = client()
        .get(format!("{}/ark:/{ark}", fixture.base_url))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());
    assert_eq!(
        resp.headers()["location"].to_str().unwrap(),
        "https://example.com/item"
    );
}

#[tokio::test]
async fn resolve_unbound_record_is_not_found() {
    let fixture = start_api().await;
    let ark = seed_ark(&fixture.registry, "").await;

    let resp = client()
        .get(format!("{}/ark:/{ark}", fixture.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn resolve_unknown_record_defers_to_authority() {
    let fixture = start_api().await;

    let resp = client()
        .get(format!("{}/ark:/1/t2unknown", fixture.base_url))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());
    assert_eq!(
        resp.headers()["location"].to_str().unwrap(),
        "https://example.com/ark:/1/t2unknown"
    );
}

#[tokio::test]
async fn resolve_unknown_authority_defers_to_global_resolver() {
    let fixture = start_api().await;

    let resp = client()
        .get(format!("{}/ark:/99999/t2unknown", fixture.base_url))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());
    assert_eq!(
        resp.headers()["location"].to_str().unwrap(),
        "https://n2t.net/ark:/99999/t2unknown"
    );
}

#[tokio::test]
async fn resolve_malformed_identifier_is_bad_request() {
    let fixture = start_api().await;

    let resp = client()
        .get(format!("{}/no-marker-here", fixture.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn resolve_json_inflection_returns_metadata() {
    let fixture = start_api().await;
    let ark = seed_ark(&fixture.registry, "https://example.com/item").await;

    let resp = client()
        .get(format!("{}/ark:/{ark}?json", fixture.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["ark"].as_str().unwrap(), ark);
    assert_eq!(body["url"].as_str().unwrap(), "https://example.com/item");
    assert_eq!(body["metadata"].as_str().unwrap(), "seeded");
}

#[tokio::test]
async fn resolve_info_inflection_renders_view() {
    let fixture = start_api().await;
    let ark = seed_ark(&fixture.registry, "https://example.com/item").await;

    let resp = client()
        .get(format!("{}/ark:/{ark}?info", fixture.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let content_type = resp.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    let body = resp.text().await.unwrap();
    assert!(body.contains(&format!("ark:/{ark}")));
    assert!(body.contains("https://example.com/item"));
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_endpoints_respond() {
    let fixture = start_api().await;

    for path in ["healthz", "readyz", "livez"] {
        let resp = client()
            .get(format!("{}/{path}", fixture.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200, "{path} failed");
    }
}
