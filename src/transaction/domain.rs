//! Defines the core data models for transactions.

use serde::Serialize;
use time::OffsetDateTime;
use unicode_segmentation::UnicodeSegmentation;

use crate::{Error, database_id::TransactionId, entry_type::EntryType, money::Money};

/// The most grapheme clusters a transaction description may have.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether money was earned or spent.
    #[serde(rename = "type")]
    pub kind: EntryType,
    /// How much money was earned or spent. Always greater than zero.
    pub amount: Money,
    /// The name of the category the transaction belongs to.
    pub category: String,
    /// A text description of what the transaction was for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When the transaction happened.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the transaction was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(kind: EntryType, amount: Money, category: &str) -> TransactionBuilder {
        TransactionBuilder {
            kind,
            amount,
            category: category.to_owned(),
            description: None,
            date: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// Only the type, amount and category are required. Pass the builder to
/// [crate::transaction::insert_transaction] to store it.
///
/// # Examples
///
/// ```ignore
/// use time::macros::datetime;
///
/// let builder = Transaction::build(EntryType::Expense, Money::from_cents(450), "Food & Dining")
///     .description(Some("Flat white".to_owned()))
///     .date(datetime!(2025-03-14 08:15 UTC));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionBuilder {
    /// Whether money was earned or spent.
    pub kind: EntryType,

    /// How much money was earned or spent.
    pub amount: Money,

    /// The name of one of the owner's categories with the same type.
    ///
    /// The name is checked when the transaction is created through the API,
    /// not when it is inserted.
    pub category: String,

    /// An optional, trimmed description of at most [MAX_DESCRIPTION_LENGTH] characters.
    pub description: Option<String>,

    /// When the transaction happened.
    ///
    /// `None` means the transaction happened when it is inserted.
    pub date: Option<OffsetDateTime>,
}

impl TransactionBuilder {
    /// Set the description of the transaction.
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Set when the transaction happened.
    pub fn date(mut self, date: OffsetDateTime) -> Self {
        self.date = Some(date);
        self
    }
}

/// The fields of a transaction that may be changed. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionUpdate {
    pub kind: Option<EntryType>,
    pub amount: Option<Money>,
    pub category: Option<String>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    pub date: Option<OffsetDateTime>,
}

/// Trim a description, treating blank text as no description.
///
/// # Errors
///
/// Returns an [Error::Validation] if the description is too long.
pub fn parse_description(text: &str) -> Result<Option<String>, Error> {
    let text = text.trim();

    if text.is_empty() {
        return Ok(None);
    }

    if text.graphemes(true).count() > MAX_DESCRIPTION_LENGTH {
        return Err(Error::validation(format!(
            "Description cannot exceed {MAX_DESCRIPTION_LENGTH} characters"
        )));
    }

    Ok(Some(text.to_owned()))
}
