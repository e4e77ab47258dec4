//! Shared types, errors, and configuration for Tesoro.
//!
//! This crate provides common types used across all other crates:
//! - Monetary amounts with decimal precision
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management
//! - The outbound notification boundary (back-dated / deleted entries)

pub mod config;
pub mod error;
pub mod notify;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use notify::{EntryEvent, EntryNotifier, MailNotifier};
