//! Domain models for authgate
//!
//! This module contains the core domain models used throughout the application.

pub mod auth;
pub mod user;

// Re-export commonly used types
pub use auth::{AuthResponse, SigninRequest, SignupRequest};
pub use user::{AuthenticatedUser, User};
