//! # Townsquare API Server Library
//!
//! This library provides the core functionality for the Townsquare API server.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling, response envelope, and HTTP status mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
