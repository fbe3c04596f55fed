/// Authentication utilities
///
/// This module provides the auth building blocks used by the API server:
///
/// - `password`: Argon2id password hashing and strength validation
/// - `jwt`: bearer token issuance and validation (HS256)
/// - `middleware`: the `AuthContext` extractor populated by the API's
///   auth layer

pub mod jwt;
pub mod middleware;
pub mod password;
