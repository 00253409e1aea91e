//! API Module - backend access
//!
//! - `client`: HTTP transport, envelope decoding, error mapping
//! - `auth`: login / logout / session restore
//! - `normativas`, `anexos`: resource services

pub mod anexos;
pub mod auth;
pub mod client;
pub mod normativas;

pub use anexos::AnexosService;
pub use auth::AuthService;
pub use client::ApiClient;
pub use normativas::NormativasService;
