//! Resolves bearer tokens to the owner that every category and transaction is scoped to.

mod middleware;
mod owner;
mod token;

pub use middleware::auth_guard;
pub use owner::OwnerId;
pub use token::{DEFAULT_TOKEN_DURATION, decode_token, encode_token};
