#![forbid(unsafe_code)]

pub mod catalog;
pub mod model;
pub mod seed;

pub use catalog::{CatalogError, QuestionCatalog};
pub use seed::{FixedSeed, SeedProvider};
