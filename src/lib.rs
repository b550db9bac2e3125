pub mod app;
pub mod config;
pub mod db;
pub mod domains;
pub mod email;
pub mod error;
pub mod state;
pub mod utils;
pub mod views;

#[cfg(test)]
mod test_support;

pub use utils::error::AppError;
