//! authgate - A minimal JWT bearer-token authentication backend
//!
//! This crate provides an HTTP service that registers users, verifies
//! credentials, and issues signed bearer tokens that gate access to
//! protected endpoints.

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod server;
pub mod telemetry;
