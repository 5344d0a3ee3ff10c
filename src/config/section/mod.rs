//! Configuration section definitions.

mod location;
mod provider;
mod widget;

pub use location::LocationConfig;
pub use provider::{API_KEY_ENV, DEFAULT_BASE_URL, ProviderConfig};
pub use widget::WidgetConfig;
