pub mod db;
pub mod error;
pub mod manager;
pub mod store;

pub use error::ContextError;
pub use manager::ContextManager;
pub use store::{ContextStore, SqliteStore};
