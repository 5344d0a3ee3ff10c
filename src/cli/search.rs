//! `placeline search` - type text, list suggestions, optionally commit one.

use anyhow::{Context, Result, bail};
use std::time::Duration;

use super::render;
use crate::config::PlacelineConfig;
use crate::logger::{status_error, status_info, status_success};
use crate::widget::{Failure, SuggestionStatus, Widget, WidgetHandle, WidgetOptions};

pub async fn run_search(config: &PlacelineConfig, text: &str, pick: Option<u16>) -> Result<()> {
    if text.trim().is_empty() {
        bail!("nothing to search for");
    }

    let options = WidgetOptions::from_config(&config.widget);
    let widget = Widget::mount_with_config(config, options).await;
    if let Some(e) = widget.state().bootstrap_error {
        bail!(e);
    }
    let limit = wait_limit(config);

    widget.focus().await?;
    type_text(&widget, text).await?;
    status_info(&format!("searching {text:?}..."));

    let state = tokio::time::timeout(
        limit,
        widget.wait_for(|s| {
            s.suggestions.query == text
                && matches!(
                    s.suggestions.status,
                    SuggestionStatus::Ready | SuggestionStatus::Failed
                )
        }),
    )
    .await
    .context("timed out waiting for suggestions")??;

    if let Some(Failure::Suggestions(e)) = &state.last_failure {
        status_error(&format!("suggestion lookup failed: {e}"));
        bail!("no suggestions for {text:?}");
    }
    status_success(&format!("{} suggestion(s)", state.suggestions.candidates.len()));
    println!("{}", render::render(&state, &config.widget));

    let Some(pick) = pick else {
        widget.unmount().await;
        return Ok(());
    };

    let index = usize::from(pick) - 1;
    let Some(candidate) = state.suggestions.candidates.get(index) else {
        bail!(
            "--pick {pick} is out of range ({} suggestion(s))",
            state.suggestions.candidates.len()
        );
    };
    crate::log!("widget"; "selecting {:?}", candidate.label);
    widget.select(index).await?;

    let state = tokio::time::timeout(
        limit,
        widget.wait_for(|s| s.is_committed() || matches!(s.last_failure, Some(Failure::Details(_)))),
    )
    .await
    .context("timed out waiting for address details")??;
    widget.unmount().await;

    if let Some(failure) = &state.last_failure {
        bail!("{failure}");
    }
    println!("{}", render::field_line(&state, &config.widget));
    println!("{}", render::address_json(&state.address)?);
    Ok(())
}

/// Feed `text` one keystroke at a time, as a user would.
pub async fn type_text(widget: &WidgetHandle, text: &str) -> Result<()> {
    let mut typed = String::with_capacity(text.len());
    for ch in text.chars() {
        typed.push(ch);
        widget.input(typed.clone()).await?;
    }
    Ok(())
}

/// Upper bound for one lookup round: quiet period plus provider timeout.
pub fn wait_limit(config: &PlacelineConfig) -> Duration {
    Duration::from_millis(config.widget.debounce_ms)
        + Duration::from_secs(config.provider.timeout_secs)
        + Duration::from_secs(1)
}
