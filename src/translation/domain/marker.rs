//! Idempotency markers left in pull request comments.

use std::fmt;

/// Outcome recorded on a pull request as a `` `[trans-bot:<tag>]` `` comment
/// prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// The task issue was told the pull request is open.
    Pushed,
    /// The task issue was told the pull request merged.
    Merged,
    /// The pull request cannot be tracked.
    NotApplicable,
}

impl Marker {
    const ALL: [Self; 3] = [Self::Pushed, Self::Merged, Self::NotApplicable];

    /// Returns the tag between the brackets.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Pushed => "pushed",
            Self::Merged => "merged",
            Self::NotApplicable => "N/A",
        }
    }

    /// Returns `true` when no further processing should follow the marker.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Merged | Self::NotApplicable)
    }

    /// Renders a comment body starting with the marker.
    #[must_use]
    pub fn comment(self, message: &str) -> String {
        if message.is_empty() {
            self.to_string()
        } else {
            format!("{self} {message}")
        }
    }

    /// Returns the marker a comment body starts with, if any.
    #[must_use]
    pub fn scan(body: &str) -> Option<Self> {
        let text = body.trim_start();
        Self::ALL
            .into_iter()
            .find(|marker| text.starts_with(&marker.to_string()))
    }

    /// Collects the markers found in a sequence of comment bodies.
    #[must_use]
    pub fn scan_all<'a>(bodies: impl IntoIterator<Item = &'a str>) -> Vec<Self> {
        bodies.into_iter().filter_map(Self::scan).collect()
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`[trans-bot:{}]`", self.tag())
    }
}
