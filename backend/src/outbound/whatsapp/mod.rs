//! WhatsApp gateway outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `WhatsappClient`
//! port on top of an upstream WhatsApp REST gateway.

mod dto;
mod gateway_client;

pub use gateway_client::GatewayWhatsappClient;
