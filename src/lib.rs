//! Forward-chaining production-rule classifier.
//!
//! chainer stores ordered rules of the form `a+b=c` and a table of knowledge entries,
//! then classifies a `+`-joined token string by repeatedly rewriting it with the rules
//! until a terminal rule fires or nothing applies. The terminal token is resolved to a
//! knowledge entry.
//!
//! # Architecture
//!
//! - **Engine**: pure, synchronous matching and driver loop, bounded by a pass limit and
//!   an optional deadline
//! - **Storage**: SQLite tables for rules and knowledge, read by the engine through two
//!   traits
//! - **Transport**: JSON over HTTP (axum) and a CLI
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`db`] — SQLite database initialization, schema, and health checks
//! - [`engine`] — Working memory, the matching pass, and the inference driver
//! - [`store`] — Rule and knowledge CRUD, and the SQLite-backed engine sources
//! - [`api`] — HTTP handlers and the response envelope
//! - [`server`] — HTTP server startup

pub mod api;
pub mod config;
pub mod db;
pub mod engine;
pub mod server;
pub mod store;
