//! HTTP inbound adapter exposing REST endpoints.

pub mod basic_auth;
pub mod error;
pub mod health;
pub mod newsletter;
pub mod schemas;
pub mod state;

pub use error::ApiResult;
