pub mod engine;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use handlers::get_summary;
