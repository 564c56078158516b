use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub base_url: String,
    _child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        let mut cmd = Command::new("target/debug/prompti-api");
        cmd.env("PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if std::env::var("SECRET_KEY").is_err() {
            cmd.env("SECRET_KEY", "integration-test-secret");
        }

        let child = cmd.spawn().context("failed to spawn server binary")?;
        Ok(Self { base_url, _child: child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK
                    || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// Shared server for the whole test binary; `None` means the environment has
/// no database configured and the test should pass as a no-op.
pub async fn try_server() -> Result<Option<&'static TestServer>> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("skipping integration test: DATABASE_URL not set");
        return Ok(None);
    }
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(15)).await?;
    Ok(Some(server))
}

pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, uuid::Uuid::new_v4())
}

/// Register a fresh author account and log in, returning (token, user).
pub async fn register_and_login(
    client: &reqwest::Client,
    base_url: &str,
) -> Result<(String, Value)> {
    let email = unique_email("author");
    let resp = client
        .post(format!("{}/api/auth/register", base_url))
        .json(&json!({ "email": email, "password": "pass1234", "name": "Test Author" }))
        .send()
        .await?;
    anyhow::ensure!(resp.status() == StatusCode::CREATED, "register failed: {}", resp.status());

    login(client, base_url, &email, "pass1234").await
}

/// Log in as the seeded admin (ADMIN_EMAIL / ADMIN_PASSWORD or the defaults).
pub async fn admin_login(client: &reqwest::Client, base_url: &str) -> Result<(String, Value)> {
    let email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@localhost".to_string());
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());
    login(client, base_url, &email, &password).await
}

pub async fn login(
    client: &reqwest::Client,
    base_url: &str,
    email: &str,
    password: &str,
) -> Result<(String, Value)> {
    let resp = client
        .post(format!("{}/api/auth/login", base_url))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;
    anyhow::ensure!(resp.status() == StatusCode::OK, "login failed: {}", resp.status());
    let body: Value = resp.json().await?;
    let token = body["access_token"]
        .as_str()
        .context("login response missing access_token")?
        .to_string();
    Ok((token, body["user"].clone()))
}
