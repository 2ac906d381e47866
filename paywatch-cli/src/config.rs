use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use paywatch_ledger::ServerConfig;

/// Everything the pipeline needs, passed in explicitly so the matching
/// logic never reads ambient state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub report: ReportSection,
    /// When absent, `send` skips email delivery.
    pub email: Option<EmailSection>,
    /// When absent, `send` skips the monitoring ping.
    pub healthcheck: Option<HealthcheckSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    /// Half-width of the search window, in days.
    #[serde(default = "default_window_days")]
    pub window_days: i64,
    /// Glyph marking monitored credit-card accounts.
    #[serde(default = "default_card_marker")]
    pub card_marker: String,
    /// Payee-name substrings to track, independent of account.
    #[serde(default)]
    pub monitored_payees: Vec<String>,
}

fn default_window_days() -> i64 {
    14
}

fn default_card_marker() -> String {
    "💳".to_string()
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            card_marker: default_card_marker(),
            monitored_payees: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailSection {
    /// HTTP endpoint of the mail-delivery API.
    pub endpoint: String,
    pub api_token: String,
    pub from: String,
    pub to: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthcheckSection {
    pub ping_url: String,
}

const TEMPLATE: &str = r#"# paywatch configuration

[server]
base_url = "http://localhost:5006"
password = "your_password_here"
# Budget file name or id
file = "My Budget"
# cert = "/path/to/cert.pem"

[report]
window_days = 14
card_marker = "💳"
# Payee names (or partial names) to track for payments
monitored_payees = ["Target", "Auto Financing"]

# Optional: deliver the report by email (HTTP mail API)
# [email]
# endpoint = "https://api.mailprovider.example/v1/send"
# api_token = "your_api_token"
# from = "paywatch@example.com"
# to = ["you@example.com"]

# Optional: ping a monitoring endpoint with the run outcome
# [healthcheck]
# ping_url = "https://hc-ping.com/your-uuid"
"#;

fn paywatch_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".paywatch"))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(paywatch_home()?.join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        bail!("No config found at {}. Run: paywatch init", path.display());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    fs::write(path, TEMPLATE).with_context(|| format!("write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_parses_with_defaults() {
        let config: Config = toml::from_str(TEMPLATE).unwrap();
        assert_eq!(config.server.base_url, "http://localhost:5006");
        assert_eq!(config.report.window_days, 14);
        assert_eq!(config.report.card_marker, "💳");
        assert_eq!(config.report.monitored_payees, vec!["Target", "Auto Financing"]);
        assert!(config.email.is_none());
        assert!(config.healthcheck.is_none());
    }

    #[test]
    fn minimal_config_fills_report_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            base_url = "https://budget.example.com"
            password = "pw"
            file = "Family"
            "#,
        )
        .unwrap();
        assert_eq!(config.report.window_days, 14);
        assert!(config.report.monitored_payees.is_empty());
    }

    #[test]
    fn full_config_parses_optional_sections() {
        let config: Config = toml::from_str(
            r#"
            [server]
            base_url = "https://budget.example.com"
            password = "pw"
            file = "Family"

            [report]
            window_days = 7
            monitored_payees = ["Rent"]

            [email]
            endpoint = "https://mail.example.com/send"
            api_token = "tok"
            from = "a@example.com"
            to = ["b@example.com", "c@example.com"]

            [healthcheck]
            ping_url = "https://hc-ping.com/uuid"
            "#,
        )
        .unwrap();
        assert_eq!(config.report.window_days, 7);
        assert_eq!(config.email.unwrap().to.len(), 2);
        assert_eq!(config.healthcheck.unwrap().ping_url, "https://hc-ping.com/uuid");
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        init_config(&path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, TEMPLATE);

        fs::write(&path, "customized = true").unwrap();
        init_config(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "customized = true");
    }
}
