//! Client-side auth session store.
//!
//! Holds the current session (user, bearer token, profile id) in memory,
//! mirrors it into a persistent key-value store, and establishes, refreshes
//! and clears it through the auth service's REST API.

pub mod api;
pub mod config;
pub mod error;
pub mod session;
pub mod storage;
pub mod store;
pub mod types;

pub use api::{AuthApi, HttpAuthApi};
pub use config::{FetchFailurePolicy, SessionConfig};
pub use error::{AuthError, StorageError};
pub use session::Session;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::{FetchOutcome, SessionStore};
pub use types::{LoginResponse, MeResponse, RegisterResponse, User};
