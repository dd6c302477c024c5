use anyhow::Result;

use pado::config::Config;
use pado::error::{Error, PadoErrorTrait};
use pado::notifications::format_summary;
use pado::watch::Monitor;

pub async fn check(config: Config, dry_run: bool) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let monitor = Monitor::from_config(&config, today).map_err(report_failure)?;

    let settings = monitor.settings();
    tracing::info!(
        url = %config.page.url,
        target_dates = ?settings.target_dates,
        target_levels = ?settings.target_levels,
        include_all_dates = settings.include_all_dates,
        dry_run,
        "Checking availability"
    );

    if dry_run {
        let evaluation = monitor.evaluate().await.map_err(report_failure)?;
        let outcome = &evaluation.outcome;

        println!("Dry run (no notifications sent, baseline untouched)");
        println!("  Reconstructed: {}", evaluation.reconstructed.len());
        println!("  Filtered:      {}", evaluation.filtered.len());
        println!("  Baseline:      {} records", evaluation.previous.len());
        println!(
            "  Would report:  {} ({} new, {} increased)",
            outcome.new_or_increased.len(),
            outcome.new_count,
            outcome.increased_count
        );
        if !outcome.new_or_increased.is_empty() {
            println!();
            println!("{}", format_summary(&outcome.new_or_increased));
        }
        return Ok(());
    }

    let report = monitor.run_once().await.map_err(report_failure)?;

    println!("Check complete");
    println!("  Reconstructed: {}", report.reconstructed);
    println!("  Filtered:      {}", report.filtered);
    println!("  Reported:      {}", report.new_or_increased.len());
    for status in &report.deliveries {
        println!("  {status}");
    }
    println!("  Baseline:      {}", report.baseline_path.display());

    Ok(())
}

/// Log a failed run with its category, then hand it to anyhow for the exit status
fn report_failure(err: Error) -> anyhow::Error {
    tracing::error!(
        category = err.category().korean_desc(),
        recoverable = err.is_recoverable(),
        error = %err,
        "{}",
        err.korean_desc()
    );
    if err.is_recoverable() {
        eprintln!("{} (다음 실행에서 다시 시도됩니다)", err.korean_desc());
    } else {
        eprintln!("{}", err.korean_desc());
    }
    err.into()
}
