//! User defined categories for income and expenses.

mod create;
mod db;
mod defaults;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::create_category_endpoint;
pub use db::{
    create_category_table, delete_category_row, get_all_categories, get_category,
    insert_category, seed_default_categories, update_category_row,
};
pub use defaults::DEFAULT_CATEGORIES;
pub use delete::delete_category_endpoint;
pub use domain::{Category, CategoryName, CategoryUpdate, NewCategory};
pub use edit::update_category_endpoint;
pub use list::list_categories_endpoint;
