//! HTTP session against the budgeting server.
//!
//! Read-only: the watchdog lists accounts, transactions, payees and
//! scheduled rules, and never mutates the ledger.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use paywatch_core::{Account, Payee, ReportWindow, ScheduledRule, Transaction};

use crate::decode;
use crate::error::{LedgerError, Result};

const TOKEN_HEADER: &str = "X-Actual-Token";

/// Connection settings for the budgeting server. Deserialized straight from
/// the `[server]` section of config.toml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub base_url: String,
    pub password: String,
    /// Budget file name or id.
    pub file: String,
    /// Optional extra root certificate (PEM) for self-hosted TLS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert: Option<std::path::PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5006".to_string(),
            password: String::new(),
            file: "My Budget".to_string(),
            cert: None,
        }
    }
}

/// An authenticated session. Opened once per run; the pipeline closes it on
/// every exit path, including early failure.
pub struct LedgerSession {
    http: reqwest::Client,
    base_url: String,
    token: String,
    file_id: String,
}

impl LedgerSession {
    /// Authenticate and resolve the configured budget file.
    pub async fn open(config: &ServerConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(path) = &config.cert {
            let pem = std::fs::read(path)
                .map_err(|e| LedgerError::Config(format!("read cert {}: {e}", path.display())))?;
            builder = builder.add_root_certificate(reqwest::Certificate::from_pem(&pem)?);
        }
        let http = builder.build()?;
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let resp = http
            .post(format!("{base_url}/account/login"))
            .json(&serde_json::json!({ "password": config.password }))
            .send()
            .await?;
        let body: Value = check_status(resp).await?.json().await?;
        let token = body
            .pointer("/data/token")
            .and_then(Value::as_str)
            .ok_or(LedgerError::Auth)?
            .to_string();

        let resp = http
            .get(format!("{base_url}/sync/list-user-files"))
            .header(TOKEN_HEADER, &token)
            .send()
            .await?;
        let files: Value = check_status(resp).await?.json().await?;
        let file_id = files
            .pointer("/data")
            .and_then(Value::as_array)
            .ok_or_else(|| LedgerError::Shape("list-user-files missing data array".into()))?
            .iter()
            .find(|f| {
                f.get("name").and_then(Value::as_str) == Some(config.file.as_str())
                    || f.get("fileId").and_then(Value::as_str) == Some(config.file.as_str())
            })
            .and_then(|f| f.get("fileId").and_then(Value::as_str))
            .ok_or_else(|| LedgerError::UnknownBudget(config.file.clone()))?
            .to_string();

        info!(%base_url, %file_id, "ledger session opened");
        Ok(Self {
            http,
            base_url,
            token,
            file_id,
        })
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<Value>> {
        let url = format!("{}/api/budgets/{}/{path}", self.base_url, self.file_id);
        debug!(%url, "ledger fetch");
        let resp = self
            .http
            .get(&url)
            .header(TOKEN_HEADER, &self.token)
            .query(query)
            .send()
            .await?;
        let body: Value = check_status(resp).await?.json().await?;
        body.pointer("/data")
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| LedgerError::Shape(format!("{path} response missing data array")))
    }

    pub async fn accounts(&self) -> Result<Vec<Account>> {
        Ok(decode::accounts(&self.get("accounts", &[]).await?))
    }

    /// Transactions across all accounts, server-side restricted to the window.
    pub async fn transactions(&self, window: &ReportWindow) -> Result<Vec<Transaction>> {
        let query = [
            ("since", window.start.to_string()),
            ("until", window.end.to_string()),
        ];
        Ok(decode::transactions(
            &self.get("transactions", &query).await?,
        ))
    }

    pub async fn payees(&self) -> Result<Vec<Payee>> {
        Ok(decode::payees(&self.get("payees", &[]).await?))
    }

    pub async fn scheduled_rules(&self) -> Result<Vec<ScheduledRule>> {
        Ok(decode::rules(&self.get("rules", &[]).await?))
    }

    /// Log out, releasing the remote session.
    pub async fn close(self) -> Result<()> {
        let resp = self
            .http
            .post(format!("{}/account/logout", self.base_url))
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await?;
        check_status(resp).await?;
        debug!("ledger session closed");
        Ok(())
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(LedgerError::Auth);
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(LedgerError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp)
}
