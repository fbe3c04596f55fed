//! # Townsquare Shared Library
//!
//! This crate contains the shared types, auth utilities, and data accessors
//! used by the Townsquare API server.
//!
//! ## Module Organization
//!
//! - `models`: database models and data accessors (users, profiles, posts, Q&A)
//! - `auth`: password hashing, JWT issuance/validation, auth extractor
//! - `db`: SQLite connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Townsquare shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
