//! Authentication system for authgate
//!
//! This module provides authentication functionality:
//! - Password hashing and verification
//! - Access token issuance and validation
//! - Signup, signin, and per-request identity verification

pub mod password;
pub mod service;
pub mod token;

pub use password::{hash_password, verify_password, HashError};
pub use service::AuthService;
pub use token::{Claims, IssuedToken, TokenCodec};
