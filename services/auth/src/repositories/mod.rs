//! Repositories for user persistence

pub mod user;

pub use user::{USERS, UserRepository};
