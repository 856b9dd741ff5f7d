//! HTTP front end for the shopping-list service.

pub mod api;
pub mod config;
