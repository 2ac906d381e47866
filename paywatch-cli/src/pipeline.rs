//! The run pipeline: open a session, fetch, match, build the report.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{info, warn};

use paywatch_core::{
    Account, MonitoredPayee, Payee, Report, ReportWindow, ScheduledRule, Transaction,
};
use paywatch_ledger::LedgerSession;

use crate::config::Config;

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub today: NaiveDate,
    pub window_days: i64,
}

pub async fn generate_report(config: &Config, opts: RunOptions) -> Result<Report> {
    let window = ReportWindow::around(opts.today, opts.window_days);
    info!(start = %window.start, end = %window.end, run_date = %opts.today, "checking for payments");

    let session = LedgerSession::open(&config.server)
        .await
        .context("connecting to ledger server")?;

    // The remote session must be released on every exit path, so run the
    // fallible stage first and propagate its error only after closing.
    let fetched = fetch(&session, &window).await;
    if let Err(err) = session.close().await {
        warn!(%err, "failed to close ledger session");
    }
    let (accounts, transactions, payees, rules) = fetched?;

    info!(
        accounts = accounts.len(),
        transactions = transactions.len(),
        payees = payees.len(),
        rules = rules.len(),
        "ledger data fetched"
    );

    let monitored: Vec<MonitoredPayee> = config
        .report
        .monitored_payees
        .iter()
        .map(MonitoredPayee::new)
        .collect();

    Ok(Report::build(
        &accounts,
        &transactions,
        &payees,
        &rules,
        &monitored,
        window,
        opts.today,
        &config.report.card_marker,
    ))
}

async fn fetch(
    session: &LedgerSession,
    window: &ReportWindow,
) -> Result<(
    Vec<Account>,
    Vec<Transaction>,
    Vec<Payee>,
    Vec<ScheduledRule>,
)> {
    let accounts = session.accounts().await.context("fetching accounts")?;
    let transactions = session
        .transactions(window)
        .await
        .context("fetching transactions")?;
    let payees = session.payees().await.context("fetching payees")?;
    let rules = session
        .scheduled_rules()
        .await
        .context("fetching scheduled rules")?;
    Ok((accounts, transactions, payees, rules))
}
