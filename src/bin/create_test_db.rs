use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use pocketbook_rs::{
    EntryType, Money, OwnerId, Transaction, initialize_db, insert_transaction,
    seed_default_categories,
};

/// A utility for creating a test database for the REST API server of pocketbook_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The ID of the owner the demo records belong to.
    #[arg(long, default_value_t = 1)]
    owner_id: i64,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let owner_id = OwnerId::new(args.owner_id);
    let now = OffsetDateTime::now_utc();

    println!("Creating default categories for owner {owner_id}...");
    seed_default_categories(owner_id, now, &conn)?;

    println!("Creating demo transactions...");
    let demo_transactions = [
        (EntryType::Income, 450_000, "Salary", "Monthly pay", 20),
        (EntryType::Expense, 185_000, "Bills & Utilities", "Rent", 18),
        (EntryType::Expense, 6_450, "Food & Dining", "Groceries", 12),
        (EntryType::Expense, 2_300, "Transportation", "Bus pass top up", 9),
        (EntryType::Income, 40_000, "Freelance", "Logo design", 6),
        (EntryType::Expense, 1_890, "Entertainment", "Cinema tickets", 3),
        (EntryType::Expense, 4_275, "Food & Dining", "Dinner out", 1),
    ];

    for (kind, cents, category, description, days_ago) in demo_transactions {
        let builder = Transaction::build(kind, Money::from_cents(cents), category)
            .description(Some(description.to_owned()))
            .date(now - Duration::days(days_ago));

        insert_transaction(owner_id, &builder, now, &conn)?;
    }

    println!("Success!");

    Ok(())
}
