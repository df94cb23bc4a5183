//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod newsletter_command;
mod whatsapp_client;

#[cfg(test)]
pub use newsletter_command::MockNewsletterCommand;
pub use newsletter_command::NewsletterCommand;
#[cfg(test)]
pub use whatsapp_client::MockWhatsappClient;
pub use whatsapp_client::{
    FixtureWhatsappClient, SessionState, WhatsappClient, WhatsappClientError,
};
