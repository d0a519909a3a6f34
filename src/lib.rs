pub mod audit;
pub mod auth;
pub mod budget;
pub mod category;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod extractors;
pub mod money;
pub mod openapi;
pub mod routes;
pub mod transaction;
pub mod validation;
