//! Edge request authentication and role gate for page requests.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod pages;
pub mod services;
pub mod state;
