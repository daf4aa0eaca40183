//! # Inkpost Core
//!
//! The domain layer of the Inkpost blog API.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod query;
pub mod services;
pub mod utils;

pub use error::{DomainError, RepoError};
