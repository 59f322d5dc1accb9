//! Core modules for the soul store: configuration, storage, and errors.
//!
//! Every subsystem in `plugins` reaches the database through the `Store`
//! handle and the `DbBroker` defined here.

pub mod broker;
pub mod config;
pub mod db;
pub mod error;
pub mod schemas;
pub mod store;
pub mod time;
