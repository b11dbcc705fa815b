pub mod jwt;
pub mod login_token_repository;

pub use jwt::{create_jwt, verify_jwt};
pub use login_token_repository::LoginTokenRepository;
