//! wedNfest Core - Shared types library.
//!
//! This crate provides common types used across all wedNfest auth components:
//! - `server` - Registration and authentication HTTP service
//! - `cli` - Command-line tools for migrations and account management
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, phone numbers, and the
//!   fixed account enumerations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
