//! Leterago Normativas & Anexos SOA dashboard core
//!
//! Client-side core of the compliance dashboard: typed access to the
//! backend, the category matrices, expiration status and compliance
//! progress shown on the normativas and anexos SOA pages.
//!
//! # Layout
//!
//! ```text
//! config / constants      environment + fixed enumerations
//! models                  wire types (envelope, user, normativa, anexo)
//! logic                   pure display logic (dates, status, matrix, progress, validation)
//! session                 auth context + persisted session store
//! api                     HTTP client and resource services
//! view                    list state behind a matrix page
//! ```

pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod logic;
pub mod models;
pub mod session;
pub mod view;

pub use api::{AnexosService, ApiClient, AuthService, NormativasService};
pub use config::{ClientConfig, Config};
pub use error::{ApiError, ApiResult};
pub use session::{AuthContext, FileSessionStore, MemorySessionStore, SessionStore};
pub use view::{ListView, LoadState, LoadTicket};
