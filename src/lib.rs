//! Launchpad serves a product landing page with a waitlist signup.
//!
//! The page is rendered server-side from a small site config. Waitlist
//! submissions go to an external backend service through a same-origin
//! proxy route, so the browser never talks to the backend directly. An
//! optional browser-only analytics bootstrap is emitted into the page.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, health, join, validate).
//! - [`config`] -- Site config loading, auto-detection and validation.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`health`] -- `GET /health` endpoint handler returning runtime diagnostics.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`proxy`] -- The `/api/proxy` route: envelope parsing, the outbound
//!   backend call with timeout, and error classification.
//! - [`client`] -- Waitlist API client used by the form and the CLI.
//! - [`form`] -- Waitlist form rules and user-facing messages.
//! - [`page`] -- HTML shell, metadata, web manifest and analytics bootstrap.
//! - [`server`] -- Axum server setup, shared application state, HTTP client, and
//!   graceful shutdown.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML config file support _(enabled by default)_ |
//! | `json` | JSON config file support |
//! | `toml` | TOML config file support |
//! | `file-backends` | All config file formats |
//! | `full` | All features |

// Binary crate — public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod client;
pub mod cmd;
pub mod config;
pub mod error;
pub mod form;
pub mod health;
pub mod logging;
pub mod page;
pub mod proxy;
pub mod server;
