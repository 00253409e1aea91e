//! View state for the matrix pages

pub mod list;

pub use list::{ListView, LoadState, LoadTicket};
