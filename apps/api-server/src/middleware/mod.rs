//! Middleware modules.

pub mod auth;
pub mod error;
pub mod normalizer;

pub use normalizer::ErrorNormalizer;
