//! wedNfest auth service library.
//!
//! Registration, email verification, login, and password reset for
//! marketplace customers and vendors. The binary in `main.rs` wires this
//! library to `PostgreSQL` and SMTP; tests drive it with in-memory fakes.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
