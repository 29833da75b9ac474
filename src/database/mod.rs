pub mod manager;
pub mod memory;
pub mod models;
pub mod repository;
pub mod store;

pub use manager::DatabaseError;
pub use memory::MemoryArticleStore;
pub use repository::PgArticleStore;
pub use store::{ArticleStore, StoreError};
