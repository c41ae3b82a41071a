//! Quick-setup wizard for a mesh network management console.
//!
//! The [`wizard`] module holds the engine; [`console`] and [`routes`] are the
//! terminal and HTTP front ends over it.

pub mod api;
pub mod config;
pub mod console;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;
pub mod wizard;
