pub mod client;
pub mod error;

pub use client::{CompletionClient, CompletionResponse};
pub use error::CompletionError;
