//! Application services - business rules orchestrating the ports.

mod posts;

pub use posts::PostService;
