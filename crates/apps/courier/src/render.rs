//! Terminal rendering of the dashboard
//!
//! Consolidates all text generation so the live view and the one-shot
//! commands look the same.

use briefcase::{Badge, BadgeTone, DashboardView, DocumentCard, ListKind, ListView, Recipient, Renderer};
use chrono::Local;
use log::debug;

use crate::input::shortcuts;

const RESET: &str = "\x1b[0m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Prints every fresh view to stdout
pub struct TerminalRenderer {
    color: bool,
}

impl TerminalRenderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl Renderer for TerminalRenderer {
    fn render(&self, view: &DashboardView) {
        let text = render_view(view, self.color);
        debug!("Rendered dashboard ({} bytes)", text.len());
        print!("{text}");
    }
}

pub fn render_view(view: &DashboardView, color: bool) -> String {
    let mut out = String::new();
    out.push_str(&section("Received documents", view.list(ListKind::Received), 'd', color));
    out.push_str(&section("Sent documents", view.list(ListKind::Sent), 's', color));
    out.push_str(&paint(
        &format!(
            "Updated {}\n",
            view.rendered_at.with_timezone(&Local).format("%H:%M:%S")
        ),
        DIM,
        color,
    ));
    out
}

fn section(title: &str, list: &ListView, key: char, color: bool) -> String {
    let mut out = format!("\n{}\n", paint(title, BOLD, color));
    match list {
        ListView::Empty { placeholder } => {
            out.push_str(&format!("  {placeholder}\n"));
        }
        ListView::Cards(cards) => {
            for (i, card) in cards.iter().enumerate() {
                out.push_str(&card_text(i + 1, card, key, color));
            }
        }
    }
    out
}

fn card_text(number: usize, card: &DocumentCard, key: char, color: bool) -> String {
    let badge = card
        .badge
        .as_ref()
        .map(|b| format!(" {}", badge_text(b, color)))
        .unwrap_or_default();
    let action = match card.action {
        Some(label) => format!("    [{key} {number}] {label}\n"),
        None => String::new(),
    };
    format!(
        "  {number}. {filename}{badge}\n     {label} {counterpart}  Views: {views}  Expires: {expires}  Created: {created}\n{action}",
        filename = card.filename,
        label = card.counterpart_label,
        counterpart = card.counterpart,
        views = card.views,
        expires = card.expires,
        created = card.created,
    )
}

fn badge_text(badge: &Badge, color: bool) -> String {
    let style = match badge.tone {
        BadgeTone::Warning => YELLOW,
        BadgeTone::Danger => RED,
    };
    paint(&format!("[{}]", badge.label), style, color)
}

pub fn render_recipients(recipients: &[Recipient]) -> String {
    if recipients.is_empty() {
        return "No recipients available\n".to_string();
    }
    recipients
        .iter()
        .enumerate()
        .map(|(i, r)| format!("  {}. {}  (id {})\n", i + 1, r.label(), r.id))
        .collect()
}

/// Status line for a download control activation
///
/// `engaged` is false when the control was still locked from an earlier
/// activation and no request was made.
pub fn download_status(filename: &str, engaged: bool) -> String {
    if engaged {
        format!("Downloading {filename}...\n")
    } else {
        format!("Already downloading {filename}\n")
    }
}

pub fn render_help() -> String {
    let width = shortcuts().iter().map(|s| s.keys.len()).max().unwrap_or(0);
    shortcuts()
        .iter()
        .map(|s| format!("  {:<width$}  {}\n", s.keys, s.description))
        .collect()
}

fn paint(text: &str, style: &str, color: bool) -> String {
    if color {
        format!("{style}{text}{RESET}")
    } else {
        text.to_string()
    }
}
