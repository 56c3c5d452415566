//! HTTP server exposing the block and admin API.
//!
//! - [`api`]: Application state, request/response types, and route handlers

pub mod api;
