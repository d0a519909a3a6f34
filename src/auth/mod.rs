pub mod handlers;
mod jwt;
pub mod models;
mod password;
mod service;

pub use handlers::{login, logout, me, refresh};

pub use jwt::{create_access_token, decode_token};
pub use service::AuthService;
