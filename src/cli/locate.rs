//! `placeline locate` - device position to committed address.

use anyhow::{Context, Result, bail};
use std::time::Duration;

use super::render;
use super::search::wait_limit;
use crate::config::PlacelineConfig;
use crate::logger::{status_info, status_success};
use crate::widget::{Widget, WidgetOptions};

pub async fn run_locate(config: &PlacelineConfig) -> Result<()> {
    let options = WidgetOptions::from_config(&config.widget).with_location_hook(|address| {
        status_success(&format!("location detected: {}", address.formatted_address));
    });
    let widget = Widget::mount_with_config(config, options).await;
    if let Some(e) = widget.state().bootstrap_error {
        bail!(e);
    }

    status_info("locating...");
    widget.detect_location().await?;

    // Position fix, then two provider round-trips
    let limit = wait_limit(config)
        + Duration::from_millis(config.location.timeout_ms)
        + Duration::from_secs(config.provider.timeout_secs);
    let state = tokio::time::timeout(
        limit,
        widget.wait_for(|s| !s.locating && (s.is_committed() || s.last_failure.is_some())),
    )
    .await
    .context("timed out waiting for location")??;
    widget.unmount().await;

    if let Some(failure) = &state.last_failure {
        bail!("{failure}");
    }
    println!("{}", render::field_line(&state, &config.widget));
    println!("{}", render::address_json(&state.address)?);
    Ok(())
}
