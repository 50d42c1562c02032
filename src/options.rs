//! Parser configuration (spec §6.2).
//!
//! Extensions are immutable for the lifetime of a parse (spec §4.8): build an
//! [`Options`] value up front and hand it to [`crate::parse`].

/// Feature flags gating the documented Markdown extensions.
///
/// All flags default to `false`, matching classic Markdown with no extensions
/// enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
    /// Smart punctuation: apostrophes, ellipses, em/en-dashes, curly quotes.
    pub smart: bool,
    /// Footnotes / endnotes (`[^key]`, `^[inline note]`, `[^key]: definition`).
    pub notes: bool,
    /// Strikethrough (`~~text~~`).
    pub strike: bool,
    /// Definition lists (title lines followed by `:`/`~`-marked definitions).
    pub dlists: bool,
    /// Strip raw HTML blocks, keeping block structure but emitting an empty list.
    pub filter_html: bool,
    /// Strip `<style>` blocks the same way `filter_html` strips HTML blocks.
    pub filter_styles: bool,
    /// Optional hard cap on arena node allocations; `None` means unbounded, which
    /// is the default and matches spec §4.1 (no cap unless the caller imposes one).
    pub max_nodes: Option<usize>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_smart(mut self, on: bool) -> Self {
        self.smart = on;
        self
    }

    pub fn with_notes(mut self, on: bool) -> Self {
        self.notes = on;
        self
    }

    pub fn with_strike(mut self, on: bool) -> Self {
        self.strike = on;
        self
    }

    pub fn with_dlists(mut self, on: bool) -> Self {
        self.dlists = on;
        self
    }

    pub fn with_filter_html(mut self, on: bool) -> Self {
        self.filter_html = on;
        self
    }

    pub fn with_filter_styles(mut self, on: bool) -> Self {
        self.filter_styles = on;
        self
    }

    pub fn with_max_nodes(mut self, cap: Option<usize>) -> Self {
        self.max_nodes = cap;
        self
    }
}
