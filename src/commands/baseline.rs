use anyhow::Result;

use pado::config::Config;
use pado::storage::BaselineStore;

/// Print the stored baseline
pub async fn baseline(config: Config) -> Result<()> {
    let store = BaselineStore::new(&config.state.path);

    match store.try_load()? {
        Some(baseline) => {
            tracing::debug!(
                records = baseline.len(),
                path = %store.path().display(),
                "Loaded baseline"
            );
            println!("{}", serde_json::to_string_pretty(&baseline)?);
        }
        None => {
            println!("No baseline at {}", store.path().display());
        }
    }

    Ok(())
}
