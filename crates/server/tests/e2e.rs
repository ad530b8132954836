use std::net::SocketAddr;

use reqwest::StatusCode as HttpStatusCode;
use serde::Deserialize;
use tokio::net::TcpListener;

use server::startup::build_app;

#[derive(Debug, Deserialize)]
struct EntryBody {
    key: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

struct TestApp {
    base_url: String,
}

const MEMORY_CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 4441
https = true

[lode]
search = ["{context}.someapp.{customer_id}.{key}", "{context}.someapp.{key}"]

[lode.storage]
type = "memory"
"#;

async fn start_server(raw_config: &str) -> anyhow::Result<TestApp> {
    let mut cfg = configs::load_from_str(raw_config)?;
    cfg.normalize_and_validate()?;

    let app = build_app(&cfg).await?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server(MEMORY_CONFIG).await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_set_then_get_falls_back_to_general_key() -> anyhow::Result<()> {
    let app = start_server(MEMORY_CONFIG).await?;
    let c = client();

    // Set: form `key` must not override the route key
    let res = c
        .post(format!("{}/lode/dev/foo", app.base_url))
        .form(&[("key", "test.foo"), ("value", "test.bar"), ("customer_id", "123456")])
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let set: EntryBody = res.json().await?;
    assert_eq!(set.key, "dev.someapp.foo");
    assert_eq!(set.value, "test.bar");

    // Get: the customer-specific candidate is absent, the general one matches
    let res = c
        .get(format!("{}/lode/dev/foo", app.base_url))
        .query(&[("customer_id", "123456")])
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let got: EntryBody = res.json().await?;
    assert_eq!(got.key, "dev.someapp.foo");
    assert_eq!(got.value, "test.bar");

    // Same read without customer_id skips the unbound candidate
    let res = c.get(format!("{}/lode/dev/foo", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<EntryBody>().await?.key, "dev.someapp.foo");
    Ok(())
}

#[tokio::test]
async fn e2e_get_unknown_key_is_not_found() -> anyhow::Result<()> {
    let app = start_server(MEMORY_CONFIG).await?;
    let res = client()
        .get(format!("{}/lode/prod/missing", app.base_url))
        .query(&[("customer_id", "1")])
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body: ErrorBody = res.json().await?;
    assert!(!body.error.is_empty());
    Ok(())
}

#[tokio::test]
async fn e2e_write_without_required_parameter_is_rejected() -> anyhow::Result<()> {
    let raw = MEMORY_CONFIG.replace(
        "[lode.storage]",
        "write_template = \"{context}.someapp.{customer_id}.{key}\"\n\n[lode.storage]",
    );
    let app = start_server(&raw).await?;
    let c = client();

    // writes pinned to the customer-specific template need customer_id
    let res = c
        .post(format!("{}/lode/dev/foo", app.base_url))
        .form(&[("value", "v")])
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body: ErrorBody = res.json().await?;
    assert!(body.error.contains("customer_id"), "{}", body.error);

    // empty value counts as missing
    let res = c
        .post(format!("{}/lode/dev/foo", app.base_url))
        .form(&[("value", "v"), ("customer_id", "")])
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = c
        .post(format!("{}/lode/dev/foo", app.base_url))
        .form(&[("value", "v"), ("customer_id", "77")])
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<EntryBody>().await?.key, "dev.someapp.77.foo");

    // the specific entry is only visible to reads that bind customer_id
    let res = c.get(format!("{}/lode/dev/foo", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let res = c
        .get(format!("{}/lode/dev/foo?customer_id=77", app.base_url))
        .send()
        .await?;
    assert_eq!(res.json::<EntryBody>().await?.value, "v");
    Ok(())
}

#[tokio::test]
async fn e2e_write_without_value_is_rejected() -> anyhow::Result<()> {
    let app = start_server(MEMORY_CONFIG).await?;
    let res = client()
        .post(format!("{}/lode/dev/foo", app.base_url))
        .form(&[("customer_id", "1")])
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body: ErrorBody = res.json().await?;
    assert!(body.error.contains("value"));
    Ok(())
}

#[tokio::test]
async fn e2e_non_form_body_gets_json_error() -> anyhow::Result<()> {
    let app = start_server(MEMORY_CONFIG).await?;
    let res = client()
        .post(format!("{}/lode/dev/foo", app.base_url))
        .json(&serde_json::json!({ "value": "v" }))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body: ErrorBody = res.json().await?;
    assert!(body.error.contains("Content-Type"), "{}", body.error);
    Ok(())
}

#[tokio::test]
async fn e2e_file_backend_survives_restart() -> anyhow::Result<()> {
    let dir = std::env::temp_dir().join(format!("lode_e2e_{}", uuid::Uuid::new_v4()));
    let path = dir.join("lode.json");
    let raw = format!(
        "[lode]\nsearch = [\"{{context}}.{{key}}\"]\n[lode.storage]\ntype = \"file\"\npath = {:?}\n",
        path.display().to_string()
    );

    let first = start_server(&raw).await?;
    let res = client()
        .post(format!("{}/lode/dev/foo", first.base_url))
        .form(&[("value", "persisted")])
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let second = start_server(&raw).await?;
    let res = client().get(format!("{}/lode/dev/foo", second.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let got: EntryBody = res.json().await?;
    assert_eq!(got.key, "dev.foo");
    assert_eq!(got.value, "persisted");

    let _ = tokio::fs::remove_dir_all(&dir).await;
    Ok(())
}

#[tokio::test]
async fn e2e_malformed_template_refuses_to_start() -> anyhow::Result<()> {
    let raw = MEMORY_CONFIG.replace("\"{context}.someapp.{key}\"]", "\"{context}.someapp.{key\"]");
    let mut cfg = configs::load_from_str(&raw)?;
    cfg.normalize_and_validate()?;
    assert!(build_app(&cfg).await.is_err());
    Ok(())
}
