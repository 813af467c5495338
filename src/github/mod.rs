pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod queries;

pub use client::GithubClient;
pub use error::GithubError;
pub use models::*;
