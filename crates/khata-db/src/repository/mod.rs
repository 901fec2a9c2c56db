//! # Repository Module
//!
//! Database repository implementations for Khata POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  BookStore (typed collections)                                         │
//! │       │                                                                 │
//! │       │  repo.put("sales", "[...]")                                     │
//! │       ▼                                                                 │
//! │  CollectionRepository (raw text by key)                                │
//! │  ├── get(&self, key)                                                   │
//! │  ├── put(&self, key, value)                                            │
//! │  ├── put_many(&self, entries)   one transaction                        │
//! │  └── remove_many(&self, keys)   one transaction                        │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite `collections` table                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`collection::CollectionRepository`] - Key-value access to stored collections

pub mod collection;
