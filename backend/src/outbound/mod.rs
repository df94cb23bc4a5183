//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **whatsapp**: reqwest-backed client for an upstream WhatsApp REST gateway
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod whatsapp;
