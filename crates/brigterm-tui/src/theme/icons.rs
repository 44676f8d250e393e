//! Icon set for the TUI.
//!
//! `IconSet` resolves icons at runtime based on `IconMode`.
//! - `IconMode::Unicode`: characters that work in all terminals
//! - `IconMode::NerdFonts`: Nerd Font glyphs (requires Nerd Font installed)

use brigterm_app::config::IconMode;
use brigterm_core::Phase;

/// Runtime icon resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct IconSet {
    mode: IconMode,
}

impl IconSet {
    pub fn new(mode: IconMode) -> Self {
        Self { mode }
    }

    /// Status glyph for a phase; `None` renders as unknown.
    pub fn phase(&self, phase: Option<Phase>) -> &'static str {
        match phase {
            Some(Phase::Succeeded) => self.success(),
            Some(Phase::Running | Phase::Starting) => self.running(),
            Some(Phase::Pending) => self.pending(),
            Some(
                Phase::Aborted
                | Phase::Canceled
                | Phase::Failed
                | Phase::SchedulingFailed
                | Phase::TimedOut,
            ) => self.failure(),
            Some(Phase::Unknown) | None => self.unknown(),
        }
    }

    pub fn success(&self) -> &'static str {
        match self.mode {
            IconMode::NerdFonts => "\u{f058}", // nf-fa-check_circle
            IconMode::Unicode => "\u{2714}",   // ✔
        }
    }

    pub fn failure(&self) -> &'static str {
        match self.mode {
            IconMode::NerdFonts => "\u{f057}", // nf-fa-times_circle
            IconMode::Unicode => "\u{2716}",   // ✖
        }
    }

    pub fn running(&self) -> &'static str {
        match self.mode {
            IconMode::NerdFonts => "\u{f04b}", // nf-fa-play
            IconMode::Unicode => "\u{25b6}",   // ▶
        }
    }

    pub fn pending(&self) -> &'static str {
        match self.mode {
            IconMode::NerdFonts => "\u{f017}", // nf-fa-clock_o
            IconMode::Unicode => "\u{27f3}",   // ⟳
        }
    }

    pub fn unknown(&self) -> &'static str {
        match self.mode {
            IconMode::NerdFonts => "\u{f059}", // nf-fa-question_circle
            IconMode::Unicode => "?",
        }
    }

    pub fn terminal(&self) -> &'static str {
        match self.mode {
            IconMode::NerdFonts => "\u{f120}", // nf-fa-terminal
            IconMode::Unicode => "\u{276f}",   // ❯
        }
    }

    pub fn alert(&self) -> &'static str {
        match self.mode {
            IconMode::NerdFonts => "\u{f071}", // nf-fa-warning
            IconMode::Unicode => "\u{26a0}",   // ⚠
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unicode_phase_icons() {
        let icons = IconSet::new(IconMode::Unicode);
        assert_eq!(icons.phase(Some(Phase::Succeeded)), "✔");
        assert_eq!(icons.phase(Some(Phase::Starting)), "▶");
        assert_eq!(icons.phase(Some(Phase::Pending)), "⟳");
        assert_eq!(icons.phase(Some(Phase::Canceled)), "✖");
        assert_eq!(icons.phase(Some(Phase::TimedOut)), "✖");
        assert_eq!(icons.phase(Some(Phase::Unknown)), "?");
        assert_eq!(icons.phase(None), "?");
    }

    #[test]
    fn test_nerd_font_icons_differ() {
        let unicode = IconSet::new(IconMode::Unicode);
        let nerd = IconSet::new(IconMode::NerdFonts);
        assert_ne!(unicode.success(), nerd.success());
        assert_ne!(unicode.alert(), nerd.alert());
    }
}
