//! Database operations for transactions.

use rusqlite::{Connection, Row, named_params};
use time::OffsetDateTime;

use crate::{
    Error,
    auth::OwnerId,
    database_id::TransactionId,
    db::get_timestamp,
    entry_type::EntryType,
    money::Money,
    transaction::{Transaction, TransactionBuilder},
    window::to_unix_millis,
};

const SELECT_COLUMNS: &str = "SELECT id, type, amount_cents, category, description, occurred_at, created_at, updated_at FROM \"transaction\"";

const FILTER_CLAUSE: &str = "WHERE owner_id = :owner_id
    AND (:type IS NULL OR type = :type)
    AND (:category IS NULL OR category = :category)
    AND (:start IS NULL OR occurred_at >= :start)
    AND (:end IS NULL OR occurred_at <= :end)";

/// Optional conditions that listed transactions must all meet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Only income or only expenses.
    pub kind: Option<EntryType>,
    /// Only transactions in the category with exactly this name.
    pub category: Option<String>,
    /// Only transactions on or after this instant.
    pub start: Option<OffsetDateTime>,
    /// Only transactions on or before this instant.
    pub end: Option<OffsetDateTime>,
}

/// Store a new transaction for `owner_id` and return it with its generated ID.
///
/// The date defaults to `now` when the builder does not set one. This does not
/// check the category, see [crate::consistency::ensure_category_for_type].
pub fn insert_transaction(
    owner_id: OwnerId,
    builder: &TransactionBuilder,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let date = builder.date.unwrap_or(now);
    let timestamp = to_unix_millis(now);

    connection.execute(
        "INSERT INTO \"transaction\" (owner_id, type, amount_cents, category, description, occurred_at, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
        (
            owner_id,
            builder.kind,
            builder.amount.cents(),
            &builder.category,
            &builder.description,
            to_unix_millis(date),
            timestamp,
        ),
    )?;

    get_transaction(owner_id, connection.last_insert_rowid(), connection)
}

/// Retrieve a transaction owned by `owner_id`.
///
/// # Errors
/// Returns [Error::TransactionNotFound] if the transaction does not exist or belongs to another owner.
pub fn get_transaction(
    owner_id: OwnerId,
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE id = :id AND owner_id = :owner_id"
        ))?
        .query_row(named_params! {":id": id, ":owner_id": owner_id}, map_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::TransactionNotFound,
            error => error.into(),
        })
}

/// Get one page of the owner's transactions matching `filter`, newest first.
///
/// Transactions on the same date are ordered by most recently inserted first.
pub fn query_transactions(
    owner_id: OwnerId,
    filter: &TransactionFilter,
    limit: u64,
    skip: u64,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let start = filter.start.map(to_unix_millis);
    let end = filter.end.map(to_unix_millis);
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let skip = i64::try_from(skip).unwrap_or(i64::MAX);

    connection
        .prepare(&format!(
            "{SELECT_COLUMNS} {FILTER_CLAUSE} ORDER BY occurred_at DESC, id DESC LIMIT :limit OFFSET :skip"
        ))?
        .query_map(
            named_params! {
                ":owner_id": owner_id,
                ":type": filter.kind,
                ":category": filter.category,
                ":start": start,
                ":end": end,
                ":limit": limit,
                ":skip": skip,
            },
            map_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Count the owner's transactions matching `filter`.
pub fn count_transactions(
    owner_id: OwnerId,
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<u64, Error> {
    let start = filter.start.map(to_unix_millis);
    let end = filter.end.map(to_unix_millis);

    let count: i64 = connection
        .prepare(&format!(
            "SELECT COUNT(id) FROM \"transaction\" {FILTER_CLAUSE}"
        ))?
        .query_row(
            named_params! {
                ":owner_id": owner_id,
                ":type": filter.kind,
                ":category": filter.category,
                ":start": start,
                ":end": end,
            },
            |row| row.get(0),
        )?;

    Ok(count as u64)
}

/// Write every field of `transaction` except its creation time back to the database.
///
/// # Errors
/// Returns [Error::TransactionNotFound] if the transaction no longer exists.
pub fn update_transaction_row(
    owner_id: OwnerId,
    transaction: &Transaction,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE \"transaction\"
        SET type = ?1, amount_cents = ?2, category = ?3, description = ?4, occurred_at = ?5, updated_at = ?6
        WHERE id = ?7 AND owner_id = ?8",
        (
            transaction.kind,
            transaction.amount.cents(),
            &transaction.category,
            &transaction.description,
            to_unix_millis(transaction.date),
            to_unix_millis(transaction.updated_at),
            transaction.id,
            owner_id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::TransactionNotFound);
    }

    Ok(())
}

/// Delete a transaction owned by `owner_id`.
///
/// # Errors
/// Returns [Error::TransactionNotFound] if the transaction does not exist or belongs to another owner.
pub fn delete_transaction(
    owner_id: OwnerId,
    id: TransactionId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND owner_id = ?2",
        (id, owner_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::TransactionNotFound);
    }

    Ok(())
}

/// Create the transaction table and its indexes.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            owner_id INTEGER NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
            amount_cents INTEGER NOT NULL CHECK (amount_cents > 0),
            category TEXT NOT NULL,
            description TEXT,
            occurred_at INTEGER NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_owner_date
            ON \"transaction\"(owner_id, occurred_at DESC);
        CREATE INDEX IF NOT EXISTS idx_transaction_owner_type
            ON \"transaction\"(owner_id, type);
        CREATE INDEX IF NOT EXISTS idx_transaction_owner_category
            ON \"transaction\"(owner_id, category);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        kind: row.get(1)?,
        amount: Money::from_cents(row.get(2)?),
        category: row.get(3)?,
        description: row.get(4)?,
        date: get_timestamp(row, 5)?,
        created_at: get_timestamp(row, 6)?,
        updated_at: get_timestamp(row, 7)?,
    })
}
