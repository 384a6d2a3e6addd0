//! Database operations for categories.

use rusqlite::{Connection, Row, Transaction as SqlTransaction, TransactionBehavior};
use time::OffsetDateTime;

use crate::{
    Error,
    auth::OwnerId,
    category::{Category, CategoryName, DEFAULT_CATEGORIES, NewCategory},
    database_id::CategoryId,
    db::{get_timestamp, is_unique_violation},
    window::to_unix_millis,
};

const SELECT_COLUMNS: &str =
    "SELECT id, name, icon, color, type, is_default, created_at, updated_at FROM category";

/// Create a category for `owner_id` and return it with its generated ID.
///
/// # Errors
/// Returns [Error::DuplicateCategory] if the owner already has a category of
/// the same type whose name only differs in case.
pub fn insert_category(
    owner_id: OwnerId,
    new_category: &NewCategory,
    is_default: bool,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Category, Error> {
    let timestamp = to_unix_millis(now);

    let result = connection.execute(
        "INSERT INTO category (owner_id, name, icon, color, type, is_default, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7);",
        (
            owner_id,
            new_category.name.as_ref(),
            &new_category.icon,
            &new_category.color,
            new_category.kind,
            is_default,
            timestamp,
        ),
    );

    match result {
        Ok(_) => {}
        Err(error) if is_unique_violation(&error) => {
            return Err(Error::DuplicateCategory {
                name: new_category.name.to_string(),
                kind: new_category.kind,
            });
        }
        Err(error) => return Err(error.into()),
    }

    get_category(owner_id, connection.last_insert_rowid(), connection)
}

/// Retrieve a single category owned by `owner_id`.
///
/// # Errors
/// Returns [Error::CategoryNotFound] if the category does not exist or belongs to another owner.
pub fn get_category(
    owner_id: OwnerId,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE id = :id AND owner_id = :owner_id;"
        ))?
        .query_row(
            rusqlite::named_params! {":id": category_id, ":owner_id": owner_id},
            map_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::CategoryNotFound,
            error => error.into(),
        })
}

/// Retrieve all of an owner's categories, sorted by type and then name.
pub fn get_all_categories(
    owner_id: OwnerId,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_COLUMNS} WHERE owner_id = ?1 ORDER BY type ASC, name ASC;"
        ))?
        .query_map([owner_id], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Write the name, icon and color of `category` back to the database.
///
/// # Errors
/// Returns [Error::DuplicateCategory] if the new name collides with another
/// category, or [Error::CategoryNotFound] if the category no longer exists.
pub fn update_category_row(
    owner_id: OwnerId,
    category: &Category,
    connection: &Connection,
) -> Result<(), Error> {
    let result = connection.execute(
        "UPDATE category SET name = ?1, icon = ?2, color = ?3, updated_at = ?4
        WHERE id = ?5 AND owner_id = ?6",
        (
            category.name.as_ref(),
            &category.icon,
            &category.color,
            to_unix_millis(category.updated_at),
            category.id,
            owner_id,
        ),
    );

    match result {
        Ok(0) => Err(Error::CategoryNotFound),
        Ok(_) => Ok(()),
        Err(error) if is_unique_violation(&error) => Err(Error::DuplicateCategory {
            name: category.name.to_string(),
            kind: category.kind,
        }),
        Err(error) => Err(error.into()),
    }
}

/// Delete a category by ID.
///
/// # Errors
/// Returns [Error::CategoryNotFound] if the category doesn't exist.
pub fn delete_category_row(
    owner_id: OwnerId,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM category WHERE id = ?1 AND owner_id = ?2",
        (category_id, owner_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::CategoryNotFound);
    }

    Ok(())
}

/// Insert the default categories for an owner that has no categories yet.
///
/// The count and the inserts run in one IMMEDIATE transaction, and rows that
/// would break the unique name index are skipped, so seeding twice never
/// creates duplicates. Returns the number of categories inserted.
pub fn seed_default_categories(
    owner_id: OwnerId,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<usize, Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let existing: i64 = transaction.query_row(
        "SELECT COUNT(id) FROM category WHERE owner_id = ?1",
        [owner_id],
        |row| row.get(0),
    )?;

    let mut inserted = 0;

    if existing == 0 {
        let timestamp = to_unix_millis(now);
        let mut statement = transaction.prepare(
            "INSERT INTO category (owner_id, name, icon, color, type, is_default, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6)
            ON CONFLICT DO NOTHING;",
        )?;

        for category in DEFAULT_CATEGORIES {
            inserted += statement.execute((
                owner_id,
                category.name,
                category.icon,
                category.color,
                category.kind,
                timestamp,
            ))?;
        }
    }

    transaction.commit()?;

    if inserted > 0 {
        tracing::info!("seeded {inserted} default categories for owner {owner_id}");
    }

    Ok(inserted)
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            owner_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            icon TEXT NOT NULL,
            color TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
            is_default INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_category_owner_type_name
            ON category(owner_id, type, name COLLATE NOCASE);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let raw_name: String = row.get(1)?;

    Ok(Category {
        id: row.get(0)?,
        name: CategoryName::new_unchecked(&raw_name),
        icon: row.get(2)?,
        color: row.get(3)?,
        kind: row.get(4)?,
        is_default: row.get(5)?,
        created_at: get_timestamp(row, 6)?,
        updated_at: get_timestamp(row, 7)?,
    })
}
