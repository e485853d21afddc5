#![forbid(unsafe_code)]

pub mod blob;
pub mod repository;
pub mod sqlite;

pub use repository::{
    BlobStore, InMemoryRepository, QuizProgressRepository, Storage, StorageError,
    TallyRepository,
};
pub use sqlite::{SqliteInitError, SqliteRepository};
