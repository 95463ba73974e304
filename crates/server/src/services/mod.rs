//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Account lifecycle: signup, verification, login, password reset
//! - `mail` - Email delivery (verification and reset links)

pub mod auth;
pub mod mail;
