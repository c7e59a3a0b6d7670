use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use url::Url;

use crate::settings::Settings;

pub const CALLBACK_HELP: &str = "help";
pub const CALLBACK_BACK: &str = "back";

fn link_row(settings: &Settings) -> Vec<InlineKeyboardButton> {
    let mut row = Vec::new();
    if let Some(url) = &settings.updates_url {
        row.push(InlineKeyboardButton::url("📢 Updates", url.clone()));
    }
    if let Some(url) = &settings.support_url {
        row.push(InlineKeyboardButton::url("💬 Support", url.clone()));
    }
    row
}

/// Updates/support buttons, if any are configured.
pub fn links(settings: &Settings) -> Option<InlineKeyboardMarkup> {
    let row = link_row(settings);
    (!row.is_empty()).then(|| InlineKeyboardMarkup::new([row]))
}

pub fn start(settings: &Settings) -> InlineKeyboardMarkup {
    let mut rows = Vec::new();
    let links = link_row(settings);
    if !links.is_empty() {
        rows.push(links);
    }
    rows.push(vec![InlineKeyboardButton::callback("ℹ️ Help", CALLBACK_HELP)]);
    InlineKeyboardMarkup::new(rows)
}

pub fn back() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([[InlineKeyboardButton::callback("🔙 Back", CALLBACK_BACK)]])
}

pub fn unmute(link: Url) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([[InlineKeyboardButton::url("🔓 CLICK TO UNMUTE", link)]])
}
