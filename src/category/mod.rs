pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use handlers::{
    create_category, create_sub_category, list_categories, list_sub_categories, update_category,
    update_sub_category,
};
