pub mod review_models;
pub mod review_repository;

pub use review_models::Review;
pub use review_repository::ReviewRepository;
