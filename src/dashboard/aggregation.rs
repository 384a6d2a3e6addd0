//! SQL aggregation of transaction amounts over a window.
//!
//! Amounts are summed as integer cents inside SQLite, so totals are exact.

use rusqlite::{Connection, named_params};

use crate::{
    Error, auth::OwnerId, entry_type::EntryType, money::Money,
    window::{Window, to_unix_millis},
};

/// The summed amount and number of transactions of each type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeTotals {
    pub income: Money,
    pub income_count: u64,
    pub expense: Money,
    pub expense_count: u64,
}

/// The summed amount and number of transactions in one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Money,
    pub count: u64,
}

/// Sum the owner's transactions in `window`, grouped by type.
pub fn totals_by_type(
    owner_id: OwnerId,
    window: &Window,
    connection: &Connection,
) -> Result<TypeTotals, Error> {
    let mut statement = connection.prepare(
        "SELECT type, SUM(amount_cents), COUNT(id) FROM \"transaction\"
        WHERE owner_id = :owner_id AND occurred_at BETWEEN :start AND :end
        GROUP BY type",
    )?;

    let rows = statement.query_map(
        named_params! {
            ":owner_id": owner_id,
            ":start": to_unix_millis(window.start),
            ":end": to_unix_millis(window.end),
        },
        |row| {
            Ok((
                row.get::<_, EntryType>(0)?,
                Money::from_cents(row.get(1)?),
                row.get::<_, i64>(2)? as u64,
            ))
        },
    )?;

    let mut totals = TypeTotals::default();

    for row in rows {
        match row? {
            (EntryType::Income, amount, count) => {
                totals.income = amount;
                totals.income_count = count;
            }
            (EntryType::Expense, amount, count) => {
                totals.expense = amount;
                totals.expense_count = count;
            }
        }
    }

    Ok(totals)
}

/// Sum the owner's transactions of `kind` in `window`, grouped by category.
///
/// Sorted by amount, largest first. Categories with equal amounts are sorted by name.
pub fn totals_by_category(
    owner_id: OwnerId,
    kind: EntryType,
    window: &Window,
    connection: &Connection,
) -> Result<Vec<CategoryTotal>, Error> {
    connection
        .prepare(
            "SELECT category, SUM(amount_cents) AS total, COUNT(id) FROM \"transaction\"
            WHERE owner_id = :owner_id AND type = :type AND occurred_at BETWEEN :start AND :end
            GROUP BY category
            ORDER BY total DESC, category ASC",
        )?
        .query_map(
            named_params! {
                ":owner_id": owner_id,
                ":type": kind,
                ":start": to_unix_millis(window.start),
                ":end": to_unix_millis(window.end),
            },
            |row| {
                Ok(CategoryTotal {
                    category: row.get(0)?,
                    amount: Money::from_cents(row.get(1)?),
                    count: row.get::<_, i64>(2)? as u64,
                })
            },
        )?
        .map(|maybe_total| maybe_total.map_err(|error| error.into()))
        .collect()
}
