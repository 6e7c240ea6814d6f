use anyhow::{Context, Result};
use globegen::{DEFAULT_CONFIG_PATH, GlobeGenConfig, GlobeGenerator};
use hexglobe::GlobeSummary;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = GlobeGenConfig::load_or_default(&path).with_context(|| format!("failed to load {path}"))?;
    log::debug!("generation settings: {config:?}");

    let globe = GlobeGenerator::from_config(config)
        .generate()
        .context("globe generation failed")?;
    log::info!("{}", GlobeSummary::from_globe(&globe));
    Ok(())
}
