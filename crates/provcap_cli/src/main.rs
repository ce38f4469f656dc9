//! CLI smoke consumer for the manifest boundary.
//!
//! # Responsibility
//! - Query each selected provider through the linked C exports.
//! - Print one `[PASS]`/`[FAIL]` line per provider and per check.
//! - Exit non-zero when any check failed, unless `--report-only` is set.

use clap::Parser;
use log::info;
use provcap_core::{default_log_level, init_logging, ProviderId, ValidationMode};
use provcap_ffi::{
    ConsumerConfig, ManifestConsumer, ManifestSource, ProbeReport, ProviderReport,
};
use std::process::ExitCode;

const LOG_DIR_ENV: &str = "PROVCAP_LOG_DIR";

#[derive(Parser, Debug)]
#[command(name = "provcap", version, about = "Probe provider capability manifests across the C ABI")]
struct Args {
    /// Provider to query (`openai|anthropic`); repeat to select several. Defaults to all.
    #[arg(long = "provider", value_name = "ID")]
    providers: Vec<ProviderId>,

    /// Also decode each manifest and validate its schema.
    #[arg(long)]
    strict: bool,

    /// Print results but always exit with status 0.
    #[arg(long)]
    report_only: bool,

    /// Log level (`trace|debug|info|warn|error`). Only used when a log directory
    /// is configured; without one no logger is started and this is ignored.
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files. Falls back to `PROVCAP_LOG_DIR`.
    #[arg(long, value_name = "DIR")]
    log_dir: Option<String>,
}

impl Args {
    fn consumer_config(&self) -> ConsumerConfig {
        let defaults = ConsumerConfig::default();
        ConsumerConfig {
            providers: if self.providers.is_empty() {
                defaults.providers
            } else {
                self.providers.clone()
            },
            mode: if self.strict {
                ValidationMode::Strict
            } else {
                defaults.mode
            },
        }
    }

    fn resolved_log_dir(&self) -> Option<String> {
        self.log_dir
            .clone()
            .or_else(|| std::env::var(LOG_DIR_ENV).ok())
            .map(|raw| raw.trim().to_string())
            .filter(|dir| !dir.is_empty())
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(log_dir) = args.resolved_log_dir() {
        let level = args.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, &log_dir) {
            eprintln!("provcap: logging disabled: {err}");
        }
    }

    let config = args.consumer_config();
    info!(
        "event=cli_run module=cli status=start providers={} strict={} report_only={}",
        config.providers.len(),
        config.mode == ValidationMode::Strict,
        args.report_only
    );

    let consumer = ManifestConsumer::linked(config.mode);
    let status = run_probe(&consumer, &config.providers, args.report_only);
    ExitCode::from(status)
}

/// Probes `providers`, prints the report and returns the process exit status.
fn run_probe<S: ManifestSource>(
    consumer: &ManifestConsumer<S>,
    providers: &[ProviderId],
    report_only: bool,
) -> u8 {
    let report = consumer.run(providers);
    for (index, provider_report) in report.providers.iter().enumerate() {
        print_provider(index + 1, provider_report);
    }

    let failed = report.failed_checks();
    if failed == 0 {
        println!("\n[PASS] manifest probe complete: all checks passed");
    } else {
        println!("\n[FAIL] manifest probe complete: {failed} check(s) failed");
    }

    let status = exit_status(&report, report_only);
    info!(
        "event=cli_run module=cli status=ok failed_checks={} exit_code={}",
        failed, status
    );
    status
}

/// `1` when any check failed, `0` otherwise or under `--report-only`.
fn exit_status(report: &ProbeReport, report_only: bool) -> u8 {
    if report_only {
        0
    } else {
        report.exit_code()
    }
}

fn print_provider(position: usize, report: &ProviderReport) {
    let provider = report.provider;
    println!(
        "{position}. {} manifest ({})",
        provider.display_name(),
        provider.as_str()
    );
    match report.payload_len {
        Some(len) => println!("   [PASS] handle: retrieved {len} bytes"),
        None => println!("   [FAIL] handle: provider returned NULL"),
    }
    for check in &report.checks {
        match check.result.reason() {
            None => println!("   [PASS] {}", check.kind),
            Some(reason) => println!("   [FAIL] {}: {reason}", check.kind),
        }
    }
}
