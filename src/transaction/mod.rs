//! Income and expense transactions.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod get;
mod list;

pub use create::create_transaction_endpoint;
pub use db::{
    TransactionFilter, count_transactions, create_transaction_table, delete_transaction,
    get_transaction, insert_transaction, query_transactions, update_transaction_row,
};
pub use delete::delete_transaction_endpoint;
pub use domain::{Transaction, TransactionBuilder, TransactionUpdate, parse_description};
pub use edit::update_transaction_endpoint;
pub use get::get_transaction_endpoint;
pub use list::list_transactions_endpoint;
