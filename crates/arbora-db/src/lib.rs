//! Arbora Database Library
//!
//! Relational persistence for verification records and the resolved-image
//! cache, on sqlx/Postgres. Each store is exposed as a trait so the pipeline
//! and resolver can be exercised against in-memory fakes in tests.

pub mod db;

pub use db::image_cache::{ImageCacheRepository, ImageCacheStore};
pub use db::verification::{VerificationRepository, VerificationStore};
