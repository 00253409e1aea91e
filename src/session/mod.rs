//! Session Module - token and signed-in user
//!
//! This module handles:
//! - Persisting the session between runs
//! - The explicit auth context handed to the HTTP client

pub mod context;
pub mod storage;

pub use context::AuthContext;
pub use storage::{FileSessionStore, MemorySessionStore, SessionStore, StorageError};
