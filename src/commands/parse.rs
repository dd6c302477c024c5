use anyhow::{Context, Result};
use std::path::PathBuf;

use pado::config::Config;
use pado::parser::SlotReconstructor;
use pado::render::{FileRenderer, PageRenderer};
use pado::watch::filter_slots;

/// Reconstruct slots from a saved HTML snapshot and print them as JSON
pub async fn parse(config: Config, html: PathBuf) -> Result<()> {
    let renderer = FileRenderer::new(&html, &config.page.seat_region)?;
    let fragments = renderer
        .render(&config.page.url)
        .await
        .with_context(|| format!("Failed to render {}", html.display()))?;

    let settings = config.resolve(chrono::Local::now().date_naive());
    let reconstructor = SlotReconstructor::new(
        settings.date_hint.clone(),
        settings.target_levels.iter().copied(),
    )
    .with_proximity(settings.proximity);

    let reconstructed = reconstructor.reconstruct(&fragments);
    let filtered = filter_slots(reconstructed.clone(), &settings);

    tracing::info!(
        fragments = fragments.len(),
        reconstructed = reconstructed.len(),
        filtered = filtered.len(),
        "Parsed snapshot"
    );

    let output = serde_json::json!({
        "fragments": fragments.len(),
        "reconstructed": reconstructed,
        "filtered": filtered,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
