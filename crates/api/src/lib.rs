//! HTTP layer: routing, views, templates, and server configuration.

pub mod app;
pub mod config;
