//! Checks that keep transactions and categories consistent with each other.
//!
//! Transactions refer to categories by name rather than by ID, so these rules
//! are enforced whenever either side is written:
//! - a transaction's (category, type) pair must name one of the owner's categories,
//! - default categories are never edited or deleted,
//! - a category that transactions still refer to cannot be deleted,
//! - category names are unique per owner and type, ignoring case.
//!
//! Renaming a category does not touch the transactions that use the old name.

use rusqlite::Connection;

use crate::{
    Error,
    auth::OwnerId,
    category::{Category, CategoryName},
    database_id::CategoryId,
    entry_type::EntryType,
};

/// A change to an existing category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryChange {
    Edit,
    Delete,
}

/// Check that the owner has a category called exactly `name` for `kind`.
///
/// # Errors
/// Returns [Error::InvalidCategoryForType] if there is no such category.
pub fn ensure_category_for_type(
    owner_id: OwnerId,
    name: &str,
    kind: EntryType,
    connection: &Connection,
) -> Result<(), Error> {
    let exists: bool = connection.query_row(
        "SELECT EXISTS (SELECT 1 FROM category WHERE owner_id = ?1 AND name = ?2 AND type = ?3)",
        (owner_id, name, kind),
        |row| row.get(0),
    )?;

    if !exists {
        return Err(Error::InvalidCategoryForType);
    }

    Ok(())
}

/// Check that `category` is not one of the seeded defaults.
///
/// # Errors
/// Returns [Error::EditDefaultCategory] or [Error::DeleteDefaultCategory] for default categories.
pub fn ensure_not_default(category: &Category, change: CategoryChange) -> Result<(), Error> {
    if !category.is_default {
        return Ok(());
    }

    Err(match change {
        CategoryChange::Edit => Error::EditDefaultCategory,
        CategoryChange::Delete => Error::DeleteDefaultCategory,
    })
}

/// Count the owner's transactions whose category is `name`.
pub fn count_referencing_transactions(
    owner_id: OwnerId,
    name: &str,
    connection: &Connection,
) -> Result<u64, Error> {
    let count: i64 = connection.query_row(
        "SELECT COUNT(id) FROM \"transaction\" WHERE owner_id = ?1 AND category = ?2",
        (owner_id, name),
        |row| row.get(0),
    )?;

    Ok(count as u64)
}

/// Check that no transaction refers to `category` by name.
///
/// # Errors
/// Returns [Error::CategoryInUse] with the number of referencing transactions.
pub fn ensure_unreferenced(
    owner_id: OwnerId,
    category: &Category,
    connection: &Connection,
) -> Result<(), Error> {
    match count_referencing_transactions(owner_id, category.name.as_ref(), connection)? {
        0 => Ok(()),
        count => Err(Error::CategoryInUse { count }),
    }
}

/// Check that no other category of the owner with the same type has `name`, ignoring case.
///
/// `exclude` is the ID of the category being renamed, if any.
/// The unique index on the category table has the final say; this check
/// only gives the common case a friendly error before the write.
///
/// # Errors
/// Returns [Error::DuplicateCategory] if the name is taken.
pub fn ensure_unique_name(
    owner_id: OwnerId,
    name: &CategoryName,
    kind: EntryType,
    exclude: Option<CategoryId>,
    connection: &Connection,
) -> Result<(), Error> {
    let taken: bool = connection.query_row(
        "SELECT EXISTS (
            SELECT 1 FROM category
            WHERE owner_id = ?1 AND type = ?2 AND name = ?3 COLLATE NOCASE
                AND (?4 IS NULL OR id != ?4)
        )",
        (owner_id, kind, name.as_ref(), exclude),
        |row| row.get(0),
    )?;

    if taken {
        return Err(Error::DuplicateCategory {
            name: name.to_string(),
            kind,
        });
    }

    Ok(())
}
