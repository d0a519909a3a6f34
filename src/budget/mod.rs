pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use handlers::{create_budget, get_budget, list_budgets, update_budget};
