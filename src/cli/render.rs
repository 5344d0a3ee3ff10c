//! Text rendering of widget snapshots.
//!
//! The terminal plays the part of the visual layer: the field line, the
//! suggestion list (or "No address found"), the inline validation message,
//! and the map link of a committed address.

use owo_colors::OwoColorize;

use crate::config::WidgetConfig;
use crate::core::Address;
use crate::widget::{NO_RESULTS, Phase, SuggestionStatus, WidgetState};

const LOCATION_ICON: &str = "◎";
const MAP_ICON: &str = "⌖";

/// Field line: icons, text (or placeholder), and a status marker.
pub fn field_line(state: &WidgetState, config: &WidgetConfig) -> String {
    let mut line = String::new();

    if config.show_location_icon {
        let icon = if state.locating { "…" } else { LOCATION_ICON };
        line.push_str(&icon_with_class(icon, &config.location_icon_class));
        line.push(' ');
    }

    if state.search_text.is_empty() {
        let placeholder = if state.placeholder.is_empty() {
            config.placeholder.as_str()
        } else {
            state.placeholder.as_str()
        };
        line.push_str(&placeholder.dimmed().to_string());
    } else {
        line.push_str(&state.search_text);
    }

    match state.phase {
        Phase::Committed => line.push_str(&format!(" {}", "✓".green())),
        Phase::Resolving => line.push_str(&format!(" {}", "…".dimmed())),
        _ => {}
    }

    if config.show_map_icon
        && state.is_committed()
        && let Some(url) = state.address.map_url(&state.selected_id)
    {
        line.push_str(&format!(
            "\n{} {}",
            icon_with_class(MAP_ICON, &config.map_icon_class),
            url
        ));
    }

    line
}

/// Suggestion list body; `None` while the list is closed.
pub fn suggestion_list(state: &WidgetState) -> Option<String> {
    if !state.list_open {
        return None;
    }

    let view = &state.suggestions;
    let body = match view.status {
        SuggestionStatus::Idle => return None,
        SuggestionStatus::Loading => format!("searching {:?}...", view.query).dimmed().to_string(),
        SuggestionStatus::Failed => "suggestions unavailable".red().to_string(),
        SuggestionStatus::Ready if view.is_no_results() => NO_RESULTS.to_string(),
        SuggestionStatus::Ready => view
            .candidates
            .iter()
            .enumerate()
            .map(|(i, c)| format!("  {}. {}", (i + 1).to_string().cyan(), c.label))
            .collect::<Vec<_>>()
            .join("\n"),
    };
    Some(body)
}

/// Whole widget as one block.
pub fn render(state: &WidgetState, config: &WidgetConfig) -> String {
    let mut block = field_line(state, config);

    if let Some(list) = suggestion_list(state) {
        block.push('\n');
        block.push_str(&list);
    }
    if let Some(message) = state.inline_error() {
        block.push('\n');
        block.push_str(&message.red().to_string());
    }
    if let Some(e) = &state.bootstrap_error {
        block.push('\n');
        block.push_str(&format!("{} {}", "lookups disabled:".red(), e));
    }

    block
}

/// Address as pretty JSON, the shape a host would persist.
pub fn address_json(address: &Address) -> serde_json::Result<String> {
    serde_json::to_string_pretty(address)
}

fn icon_with_class(icon: &str, class: &str) -> String {
    if class.is_empty() {
        icon.to_string()
    } else {
        format!("{icon}[{class}]")
    }
}
