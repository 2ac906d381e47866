//! Report delivery: HTML-wrapped email over an HTTP mail API, plus a
//! success/failure ping to a monitoring endpoint.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use crate::config::{EmailSection, HealthcheckSection};

pub fn subject(success: bool, run_date: NaiveDate) -> String {
    let glyph = if success { "✅" } else { "❌" };
    format!("{glyph} Payment report {run_date}")
}

/// Wrap the plain-text report for HTML mail clients. The report is
/// line-oriented monospace text, so a `<pre>` block is all it needs.
pub fn html_envelope(text: &str) -> String {
    let escaped = text
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    format!("<html><body><pre style=\"font-family: monospace\">{escaped}</pre></body></html>")
}

#[derive(Serialize)]
struct MailRequest<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    text: &'a str,
    html: String,
}

pub async fn send_email(email: &EmailSection, subject: &str, text: &str) -> Result<()> {
    let body = MailRequest {
        from: &email.from,
        to: &email.to,
        subject,
        text,
        html: html_envelope(text),
    };

    let client = reqwest::Client::new();
    let resp = client
        .post(&email.endpoint)
        .bearer_auth(&email.api_token)
        .json(&body)
        .send()
        .await
        .context("mail request")?;

    let status = resp.status();
    if !status.is_success() {
        let detail = resp.text().await.unwrap_or_default();
        bail!("mail API error: {status} {detail}");
    }
    Ok(())
}

/// Best-effort: a gap in monitoring is logged, never fatal.
pub async fn ping_healthcheck(hc: &HealthcheckSection, success: bool) {
    let url = if success {
        hc.ping_url.clone()
    } else {
        format!("{}/fail", hc.ping_url.trim_end_matches('/'))
    };
    match reqwest::get(&url).await {
        Ok(resp) if resp.status().is_success() => {}
        Ok(resp) => warn!(status = %resp.status(), %url, "healthcheck ping rejected"),
        Err(err) => warn!(%err, %url, "healthcheck ping failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_carries_outcome_glyph_and_date() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 4).unwrap();
        assert_eq!(subject(true, date), "✅ Payment report 2026-02-04");
        assert_eq!(subject(false, date), "❌ Payment report 2026-02-04");
    }

    #[test]
    fn html_envelope_escapes_markup() {
        let html = html_envelope("a < b & b > c");
        assert!(html.contains("a &lt; b &amp; b &gt; c"));
        assert!(html.starts_with("<html><body><pre"));
        assert!(html.ends_with("</pre></body></html>"));
    }

    #[test]
    fn html_envelope_preserves_report_lines() {
        let html = html_envelope("line one\n  • 💳 Chase United | 2026-01-06 | $163.03\n");
        assert!(html.contains("line one\n  • 💳 Chase United | 2026-01-06 | $163.03\n"));
    }
}
