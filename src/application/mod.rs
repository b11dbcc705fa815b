pub mod application_models;
pub mod application_repository;

pub use application_models::{Application, ApplicationStatus};
pub use application_repository::ApplicationRepository;
