//! Common library for the render service
//!
//! This crate provides shared functionality used across the render
//! service, including environment-driven configuration and the error
//! types of the storage and render subsystems.

pub mod config;
pub mod error;
