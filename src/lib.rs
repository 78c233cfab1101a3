pub mod args;
pub mod commands;
mod config;
mod error;
pub mod form;
pub mod model;
pub mod store;
mod utils;
pub mod validate;

#[cfg(test)]
mod test;

pub use config::Config;
pub use error::Error;
pub use error::Result;
pub use utils::{generate_transaction_id, today};
