//! # State Module
//!
//! Startup state shared by every command.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │          ┌──────────────────────────────────────┐                      │
//! │          ▼                                      ▼                       │
//! │  ┌──────────────┐                      ┌──────────────────┐            │
//! │  │   DbState    │                      │   ConfigState    │            │
//! │  │              │                      │                  │            │
//! │  │  Database    │                      │  store_name      │            │
//! │  │  (SQLite     │                      │  currency        │            │
//! │  │   pool)      │                      │  admin_password  │            │
//! │  └──────────────┘                      └──────────────────┘            │
//! │                                                                         │
//! │  Business state (Books) is NOT kept here: each command loads it,       │
//! │  runs one operation, and saves it back.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;

pub use config::{ConfigError, ConfigState};
pub use db::DbState;
