pub mod client;
pub mod token_repository;
pub mod webhook;

pub use client::TelegramClient;
pub use token_repository::TelegramTokenRepository;
