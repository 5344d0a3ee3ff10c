//! `placeline repl` - drive one widget from stdin.
//!
//! Plain lines replace the field text. Commands:
//!
//! | Command    | Effect                                  |
//! |------------|-----------------------------------------|
//! | `:pick N`  | choose the N-th suggestion              |
//! | `:clear`   | clear control                           |
//! | `:blur`    | field loses focus                       |
//! | `:focus`   | field gains focus                       |
//! | `:locate`  | detect the device location              |
//! | `:show`    | print the current address as JSON       |
//! | `:quit`    | unmount and exit                        |

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::render;
use crate::config::PlacelineConfig;
use crate::logger::{status_detach, status_info};
use crate::widget::{Widget, WidgetHandle, WidgetOptions};

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Text(String),
    Pick(usize),
    Clear,
    Blur,
    Focus,
    Locate,
    Show,
    Quit,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        let Some(rest) = line.strip_prefix(':') else {
            return Self::Text(line.to_string());
        };

        let mut parts = rest.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("pick" | "p"), Some(n)) => match n.parse::<usize>() {
                Ok(n) if n >= 1 => Self::Pick(n - 1),
                _ => Self::Unknown(line.to_string()),
            },
            (Some("clear" | "c"), None) => Self::Clear,
            (Some("blur"), None) => Self::Blur,
            (Some("focus"), None) => Self::Focus,
            (Some("locate" | "l"), None) => Self::Locate,
            (Some("show" | "s"), None) => Self::Show,
            (Some("quit" | "q"), None) => Self::Quit,
            _ => Self::Unknown(line.to_string()),
        }
    }
}

pub async fn run_repl(config: &PlacelineConfig) -> Result<()> {
    let options = WidgetOptions::from_config(&config.widget);
    let widget = Widget::mount_with_config(config, options).await;

    spawn_renderer(&widget, config);
    widget.focus().await?;
    status_info("type an address, :pick N to choose, :quit to exit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        // The echoed input line breaks the status block
        status_detach();

        match Command::parse(line.trim_end()) {
            Command::Quit => break,
            command => dispatch(&widget, command).await?,
        }
    }

    widget.unmount().await;
    Ok(())
}

async fn dispatch(widget: &WidgetHandle, command: Command) -> Result<()> {
    match command {
        Command::Text(text) => widget.input(text).await?,
        Command::Pick(index) => widget.select(index).await?,
        Command::Clear => widget.clear().await?,
        Command::Blur => widget.blur().await?,
        Command::Focus => widget.focus().await?,
        Command::Locate => widget.detect_location().await?,
        Command::Show => {
            let state = widget.state();
            println!("phase: {}", state.phase.name());
            println!("{}", render::address_json(&state.address)?);
        }
        Command::Unknown(line) => crate::log!("warning"; "unknown command: {}", line),
        Command::Quit => {}
    }
    Ok(())
}

/// Redraw the widget block on every snapshot.
fn spawn_renderer(widget: &WidgetHandle, config: &PlacelineConfig) {
    let mut rx = widget.subscribe();
    let widget_config = config.widget.clone();

    tokio::spawn(async move {
        status_info(&render::render(&rx.borrow_and_update(), &widget_config));
        while rx.changed().await.is_ok() {
            let block = render::render(&rx.borrow_and_update(), &widget_config);
            status_info(&block);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_input() {
        assert_eq!(Command::parse("1600 Amphi"), Command::Text("1600 Amphi".into()));
        assert_eq!(Command::parse(""), Command::Text(String::new()));
    }

    #[test]
    fn test_pick_is_one_based() {
        assert_eq!(Command::parse(":pick 1"), Command::Pick(0));
        assert_eq!(Command::parse(":p 3"), Command::Pick(2));
        assert!(matches!(Command::parse(":pick 0"), Command::Unknown(_)));
        assert!(matches!(Command::parse(":pick x"), Command::Unknown(_)));
    }

    #[test]
    fn test_commands() {
        assert_eq!(Command::parse(":clear"), Command::Clear);
        assert_eq!(Command::parse(":blur"), Command::Blur);
        assert_eq!(Command::parse(":focus"), Command::Focus);
        assert_eq!(Command::parse(":locate"), Command::Locate);
        assert_eq!(Command::parse(":show"), Command::Show);
        assert_eq!(Command::parse(":q"), Command::Quit);
        assert!(matches!(Command::parse(":clear now"), Command::Unknown(_)));
    }
}
