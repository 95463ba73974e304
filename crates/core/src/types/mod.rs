//! Core types for wedNfest.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod account;
pub mod email;
pub mod id;
pub mod phone;

pub use account::{AccountKind, BusinessCategory, IndianState, ParseEnumError, Role};
pub use email::{Email, EmailError};
pub use id::*;
pub use phone::{Phone, PhoneError};
