//! Gmail inbox categories.

use std::fmt;
use std::str::FromStr;

/// One of the tabs Gmail sorts the inbox into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Person-to-person mail and anything not matching another tab.
    Primary,
    /// Social networks and media-sharing sites.
    Social,
    /// Deals, offers and other marketing mail.
    Promotions,
    /// Confirmations, receipts, bills and statements.
    Updates,
    /// Online groups, discussion boards and mailing lists.
    Forums,
}

impl Category {
    /// All categories in menu order.
    pub const ALL: [Self; 5] = [
        Self::Primary,
        Self::Social,
        Self::Promotions,
        Self::Updates,
        Self::Forums,
    ];

    /// Looks a category up by its 1-based menu number.
    #[must_use]
    pub fn from_menu_number(number: usize) -> Option<Self> {
        number
            .checked_sub(1)
            .and_then(|index| Self::ALL.get(index).copied())
    }

    /// Lowercase name as used in Gmail search.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Social => "social",
            Self::Promotions => "promotions",
            Self::Updates => "updates",
            Self::Forums => "forums",
        }
    }

    /// Display name for menus.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Primary => "Primary",
            Self::Social => "Social",
            Self::Promotions => "Promotions",
            Self::Updates => "Updates",
            Self::Forums => "Forums",
        }
    }

    /// Gmail search query selecting every message in this category.
    #[must_use]
    pub fn query(&self) -> String {
        format!("category:{}", self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a category name or number is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Accepts a menu number (`"3"`) or a name in any case (`"Promotions"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(number) = trimmed.parse::<usize>() {
            return Self::from_menu_number(number).ok_or_else(|| UnknownCategory(s.to_string()));
        }

        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
