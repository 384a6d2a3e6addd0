use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    auth::OwnerId,
    category::{Category, CategoryName, NewCategory, insert_category},
    db::initialize,
    entry_type::EntryType,
};

#[track_caller]
pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");
    connection
}

/// Insert a non-default category directly, skipping the duplicate check.
#[track_caller]
pub(crate) fn seed_category(
    owner_id: OwnerId,
    name: &str,
    kind: EntryType,
    connection: &Connection,
) -> Category {
    let new_category = NewCategory {
        name: CategoryName::new_unchecked(name),
        icon: "🧪".to_owned(),
        color: "#000000".to_owned(),
        kind,
    };

    insert_category(owner_id, &new_category, false, OffsetDateTime::now_utc(), connection)
        .expect("Could not create test category")
}
