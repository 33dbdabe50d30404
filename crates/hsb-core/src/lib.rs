//! Core domain + application logic for the homework-status notifier bot.
//!
//! This crate is intentionally framework-agnostic. The homework-status API
//! and Telegram live behind ports (traits) implemented in adapter crates.

pub mod config;
pub mod domain;
pub mod errors;
pub mod homework;
pub mod logging;
pub mod poller;
pub mod ports;

pub use errors::{Error, Result};
