use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;

mod config;
mod notify;
mod pipeline;

#[derive(Parser, Debug)]
#[command(
    name = "paywatch",
    version,
    about = "Recurring-payment watchdog for a budgeting server"
)]
struct Cli {
    /// Path to config.toml (default: ~/.paywatch/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the run date (YYYY-MM-DD) for reproducible windows
    #[arg(long, global = true)]
    date: Option<NaiveDate>,

    /// Override the window half-width in days
    #[arg(long, global = true)]
    window_days: Option<i64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a config template (refuses to overwrite an existing one)
    Init,

    /// Fetch, match and print the payment report to stdout
    Report,

    /// Print the report, deliver it by email and ping the healthcheck endpoint
    Send,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr so the rendered report on stdout stays clean.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config_path = match &cli.config {
        Some(p) => p.clone(),
        None => config::default_config_path()?,
    };

    match cli.command {
        Command::Init => config::init_config(&config_path),

        Command::Report => {
            let config = config::load_config(&config_path)?;
            let opts = run_options(&cli, &config);
            let report = pipeline::generate_report(&config, opts).await?;
            print!("{}", report.render());
            Ok(())
        }

        Command::Send => {
            let config = config::load_config(&config_path)?;
            let opts = run_options(&cli, &config);
            send(&config, opts).await
        }
    }
}

fn run_options(cli: &Cli, config: &config::Config) -> pipeline::RunOptions {
    pipeline::RunOptions {
        today: cli.date.unwrap_or_else(|| Local::now().date_naive()),
        window_days: cli.window_days.unwrap_or(config.report.window_days),
    }
}

async fn send(config: &config::Config, opts: pipeline::RunOptions) -> Result<()> {
    match pipeline::generate_report(config, opts).await {
        Ok(report) => {
            let text = report.render();
            print!("{text}");
            if let Some(email) = &config.email {
                notify::send_email(email, &notify::subject(true, opts.today), &text)
                    .await
                    .context("delivering report email")?;
            }
            if let Some(hc) = &config.healthcheck {
                notify::ping_healthcheck(hc, true).await;
            }
            Ok(())
        }
        Err(err) => {
            // The failure still has to reach the operator: trace it on the
            // output stream, email it if we can, and flip the healthcheck.
            let body = format!("❌ Error generating report: {err:#}\n");
            print!("{body}");
            if let Some(email) = &config.email {
                if let Err(mail_err) =
                    notify::send_email(email, &notify::subject(false, opts.today), &body).await
                {
                    tracing::warn!(%mail_err, "failed to deliver failure email");
                }
            }
            if let Some(hc) = &config.healthcheck {
                notify::ping_healthcheck(hc, false).await;
            }
            Err(err)
        }
    }
}
