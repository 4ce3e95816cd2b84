//! Upload storage using Apache OpenDAL.
//!
//! Uploaded files are staged here before any database row references them.
//! The stored key doubles as `Media.path`, so a media URL is always
//! `base_url + key`.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                Apache OpenDAL                  │
//! ├───────────────────────────────────────────────┤
//! │ op.write("key", data)   │ op.stat("key")       │
//! │ op.delete("key")        │                      │
//! └───────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::{StagedFile, StorageService};
