//! Generic CRUD resource engine.
//!
//! One resource type, two storage backends, one HTTP surface: the
//! [`Resource`] trait describes what a stored entity looks like, the
//! [`Repository`] trait is the storage port, [`UseCase`] is the thin
//! orchestration layer between transport and storage, and [`rest`]
//! adapts the whole thing to axum routes under a configurable prefix.

pub mod error;
pub mod memory;
pub mod repo;
pub mod resource;
pub mod rest;
pub mod usecase;

pub use error::RepoError;
pub use memory::MemoryRepository;
pub use repo::{Repository, PAGE_SIZE};
pub use resource::Resource;
pub use usecase::UseCase;
