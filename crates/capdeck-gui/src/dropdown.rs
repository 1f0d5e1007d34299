//! Dropdown state machine: open/closed, search text and keyboard highlight.

use serde::Serialize;

/// Keys the selection list reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    ArrowUp,
    ArrowDown,
    /// Anything else (typing, Tab, ...).
    Other,
}

/// Where the dropdown is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropdownPhase {
    Closed,
    /// Open with non-empty search text.
    Searching,
    /// Open without search text.
    Viewing,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropdownState {
    open: bool,
    search: String,
    highlighted: usize,
    search_focused: bool,
}

impl DropdownState {
    /// Open with a fresh search and the highlight on the first item.
    pub fn open(&mut self) {
        self.open = true;
        self.search.clear();
        self.highlighted = 0;
        self.search_focused = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.search_focused = false;
    }

    pub const fn is_open(&self) -> bool {
        self.open
    }

    pub fn phase(&self) -> DropdownPhase {
        match (self.open, self.search.trim().is_empty()) {
            (false, _) => DropdownPhase::Closed,
            (true, true) => DropdownPhase::Viewing,
            (true, false) => DropdownPhase::Searching,
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Replace the search text. Typing resets the highlight.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
        self.highlighted = 0;
    }

    pub const fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub const fn is_search_focused(&self) -> bool {
        self.search_focused
    }

    /// Apply a navigation key over a list of `count` items and return the
    /// new highlight. `Enter` leaves the highlight alone.
    pub fn navigate(&mut self, key: Key, count: usize) -> usize {
        let last = count.saturating_sub(1);
        self.highlighted = match key {
            Key::ArrowDown => (self.highlighted + 1).min(last),
            Key::ArrowUp => self.highlighted.saturating_sub(1).min(last),
            Key::Enter => self.highlighted.min(last),
            Key::Other => 0,
        };
        self.highlighted
    }
}
