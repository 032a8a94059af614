#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tempfile::TempDir;

use funeral_api::config::AppConfig;
use funeral_api::services::{Mailer, NotifyError, OutboundEmail, PdfRenderer};
use funeral_api::{app, AppState};

pub const SUPERADMIN_EMAIL: &str = "ops@example.com";
pub const SUPERADMIN_PASSWORD: &str = "correct horse battery";
pub const WEBHOOK_SECRET: &str = "whsec-test";

#[derive(Clone, Default)]
pub struct CapturingMailer {
    sent: Arc<Mutex<Vec<OutboundEmail>>>,
}

impl CapturingMailer {
    pub fn last_reset_token(&self) -> Option<String> {
        let sent = self.sent.lock().ok()?;
        sent.iter()
            .rev()
            .find_map(|m| m.body.lines().find_map(|l| l.strip_prefix("Reset token: ")).map(str::to_string))
    }

    pub fn count(&self) -> usize {
        self.sent.lock().map(|s| s.len()).unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for CapturingMailer {
    async fn send(&self, message: OutboundEmail) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .map_err(|_| NotifyError::Delivery("poisoned".into()))?
            .push(message);
        Ok(())
    }
}

/// One server per test, each with its own data directory.
pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    pub mailer: CapturingMailer,
    pub state: AppState,
    pub dir: TempDir,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let dir = tempfile::tempdir().context("failed to create temp dir")?;
        let mut config = AppConfig::rooted_at(dir.path());
        config.server.enable_request_logging = false;
        config.security.webhook_secret = Some(WEBHOOK_SECRET.to_string());

        let mailer = CapturingMailer::default();
        let state = AppState::with_collaborators(config, Arc::new(mailer.clone()), Arc::new(PdfRenderer))?;
        state
            .sessions
            .bootstrap(SUPERADMIN_EMAIL, SUPERADMIN_PASSWORD, chrono::Utc::now())
            .await?;

        // Bind to port 0 so every test gets a free port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind test listener")?;
        let base_url = format!("http://{}", listener.local_addr()?);

        let router = app(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let server = Self {
            base_url,
            client: reqwest::Client::new(),
            mailer,
            state,
            dir,
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        let mut req = self.client.get(self.url(path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        Self::read(req.send().await?).await
    }

    pub async fn send_json(
        &self,
        method: reqwest::Method,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> Result<(StatusCode, Value)> {
        let mut req = self.client.request(method, self.url(path)).json(&body);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        Self::read(req.send().await?).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.send_json(reqwest::Method::POST, path, token, body).await
    }

    pub async fn read(resp: reqwest::Response) -> Result<(StatusCode, Value)> {
        let status = resp.status();
        let body = resp.json::<Value>().await.unwrap_or(Value::Null);
        Ok((status, body))
    }

    /// Sign a funeral home up and return `(slug, tempAdminKey)`.
    pub async fn signup(&self, name: &str, email: &str) -> Result<(String, String)> {
        let (status, body) = self
            .post("/api/signup", None, json!({ "funeralHomeName": name, "email": email }))
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "signup failed: {status} {body}");
        let slug = body["data"]["slug"].as_str().context("slug")?.to_string();
        let key = body["data"]["tempAdminKey"].as_str().context("key")?.to_string();
        Ok((slug, key))
    }

    /// Log a tenant admin in and return the access token.
    pub async fn admin_token(&self, slug: &str, key: &str) -> Result<String> {
        let (status, body) = self
            .post("/api/admin/login", None, json!({ "tenant": slug, "key": key }))
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "admin login failed: {status} {body}");
        Ok(body["data"]["token"].as_str().context("token")?.to_string())
    }

    /// Sign up and log in as the new tenant's admin: `(slug, key, token)`.
    pub async fn onboard(&self, name: &str, email: &str) -> Result<(String, String, String)> {
        let (slug, key) = self.signup(name, email).await?;
        let token = self.admin_token(&slug, &key).await?;
        Ok((slug, key, token))
    }

    pub async fn superadmin_token(&self) -> Result<String> {
        let (status, body) = self
            .post(
                "/superadmin/login",
                None,
                json!({ "email": SUPERADMIN_EMAIL, "password": SUPERADMIN_PASSWORD }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "superadmin login failed: {status} {body}");
        Ok(body["data"]["token"].as_str().context("token")?.to_string())
    }

    /// Push a tenant's trial end into the past.
    pub async fn expire_trial(&self, slug: &str) -> Result<()> {
        let path = self.dir.path().join("data").join("tenants.json");
        let raw = tokio::fs::read_to_string(&path).await?;
        let mut tenants: Value = serde_json::from_str(&raw)?;
        for tenant in tenants.as_array_mut().context("tenants array")? {
            if tenant["slug"] == slug {
                tenant["trialEndsAt"] = json!(chrono::Utc::now().timestamp_millis() - 1_000);
            }
        }
        tokio::fs::write(&path, serde_json::to_vec_pretty(&tenants)?).await?;
        Ok(())
    }
}
