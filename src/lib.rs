//! Library crate for iam-console.
//!
//! This crate exposes the building blocks of the TUI:
//! - REST client, wire models and the background worker (`api`)
//! - Application state, config, keymap and update loop (`app`)
//! - Add-user wizard: steps, aggregator and controller (`wizard`)
//! - Submission gateway and notification policy (`gateway`, `notify`)
//! - Application settings and identity provider list (`application`, `idp`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `iam-console` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod app;
pub mod application;
pub mod confirm;
pub mod error;
pub mod gateway;
pub mod idp;
pub mod notify;
pub mod scim;
pub mod scope;
pub mod search;
pub mod ui;
pub mod wizard;

/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
