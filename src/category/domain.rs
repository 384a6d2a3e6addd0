//! Category models and validated field types.

use std::fmt::Display;

use serde::Serialize;
use time::OffsetDateTime;
use unicode_segmentation::UnicodeSegmentation;

use crate::{Error, database_id::CategoryId, entry_type::EntryType};

/// The most grapheme clusters a category name may have.
pub const MAX_CATEGORY_NAME_LENGTH: usize = 50;

/// A user defined label for income or expenses, e.g. "Food & Dining".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The name transactions refer to the category by.
    pub name: CategoryName,
    /// A glyph shown next to the name, e.g. "🍔".
    pub icon: String,
    /// A hex color, e.g. "#EF4444".
    pub color: String,
    /// Whether the category applies to income or expenses.
    #[serde(rename = "type")]
    pub kind: EntryType,
    /// Default categories are seeded automatically and cannot be changed.
    pub is_default: bool,
    /// When the category was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the category was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The fields needed to create a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: CategoryName,
    pub icon: String,
    pub color: String,
    pub kind: EntryType,
}

/// The fields of a category that may be changed. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryUpdate {
    pub name: Option<CategoryName>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// The name of a category.
///
/// Names are trimmed, non-empty and at most [MAX_CATEGORY_NAME_LENGTH] characters long.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// # Errors
    ///
    /// Returns an [Error::Validation] if `name` is blank or too long.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            return Err(Error::validation("Category name is required"));
        }

        if name.graphemes(true).count() > MAX_CATEGORY_NAME_LENGTH {
            return Err(Error::validation(format!(
                "Category name cannot exceed {MAX_CATEGORY_NAME_LENGTH} characters"
            )));
        }

        Ok(Self(name.to_owned()))
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is trimmed, non-empty and not too long.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
