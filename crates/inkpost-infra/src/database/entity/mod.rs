//! SeaORM entities mirroring the tables created by the migration app.

pub mod post;
pub mod user;
