pub mod access;
pub mod auth;
pub mod error;
pub mod service;
pub mod storage;

pub use error::{HubError, HubResult};
