//! Semantic style builders.

use brigterm_app::Tone;
use brigterm_core::Phase;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};

use super::palette;

// --- Text styles ---
pub fn text_primary() -> Style {
    Style::default().fg(palette::TEXT_PRIMARY)
}

pub fn text_secondary() -> Style {
    Style::default().fg(palette::TEXT_SECONDARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(palette::TEXT_MUTED)
}

// --- Border styles ---
pub fn border_inactive() -> Style {
    Style::default().fg(palette::BORDER_DIM)
}

pub fn border_active() -> Style {
    Style::default().fg(palette::BORDER_ACTIVE)
}

// --- Accent styles ---
pub fn accent_bold() -> Style {
    Style::default()
        .fg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn status_red() -> Style {
    Style::default().fg(palette::STATUS_RED)
}

// --- Keybinding hint style ---
pub fn keybinding() -> Style {
    Style::default().fg(palette::STATUS_YELLOW)
}

/// "Black on Cyan" - the selected table row
pub fn focused_selected() -> Style {
    Style::default()
        .fg(palette::CONTRAST_FG)
        .bg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

// --- Phase tones ---

/// Foreground style for a semantic tone.
pub fn tone(tone: Tone) -> Style {
    match tone {
        Tone::Success => Style::default().fg(palette::STATUS_GREEN),
        Tone::Active => Style::default().fg(palette::STATUS_YELLOW),
        Tone::Failure => Style::default().fg(palette::STATUS_RED),
        Tone::Neutral => text_primary(),
        Tone::Muted => text_muted(),
    }
}

/// Tone style for an optional phase; a missing phase reads as muted.
pub fn phase(phase: Option<Phase>) -> Style {
    tone(phase.map_or(Tone::Muted, Tone::of))
}

// --- Block builders ---
pub fn glass_block(focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            border_active()
        } else {
            border_inactive()
        })
}

/// Block whose border follows a phase when one is known.
pub fn phase_block(phase: Option<Phase>) -> Block<'static> {
    match phase {
        Some(p) => glass_block(false).border_style(tone(Tone::of(p))),
        None => glass_block(false),
    }
}
