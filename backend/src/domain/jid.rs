//! Canonical WhatsApp addresses.
//!
//! A JID has the shape `user@server`. Bare phone numbers are completed with
//! the default user server supplied by the caller, so the same parser serves
//! user, group and newsletter addresses.

use std::fmt;

use thiserror::Error;

/// Validation errors raised by [`Jid::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JidValidationError {
    /// Nothing was left once whitespace and a leading `+` were removed.
    #[error("jid must not be empty")]
    Empty,
    /// The part before `@` was empty.
    #[error("jid `{raw}` has no user part")]
    MissingUser { raw: String },
    /// The part after `@` was empty or contained another `@`.
    #[error("jid `{raw}` has an invalid server part")]
    InvalidServer { raw: String },
}

/// Canonical `user@server` address.
///
/// ## Invariants
/// - `user` and `server` are non-empty.
/// - `server` contains no `@`.
///
/// # Examples
/// ```
/// use wa_gateway::domain::Jid;
///
/// let jid = Jid::parse("+628123", "s.whatsapp.net").expect("valid jid");
/// assert_eq!(jid.to_string(), "628123@s.whatsapp.net");
///
/// let channel = Jid::parse("120363@newsletter", "s.whatsapp.net").expect("valid jid");
/// assert_eq!(channel.server(), "newsletter");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Jid {
    user: String,
    server: String,
}

impl Jid {
    /// Parse a raw identifier, completing bare users with `default_server`.
    pub fn parse(raw: &str, default_server: &str) -> Result<Self, JidValidationError> {
        let trimmed = raw.trim();
        let value = trimmed.strip_prefix('+').unwrap_or(trimmed);
        if value.is_empty() {
            return Err(JidValidationError::Empty);
        }

        let Some((user, server)) = value.split_once('@') else {
            return Self::from_parts(value, default_server);
        };
        if user.is_empty() {
            return Err(JidValidationError::MissingUser { raw: raw.to_owned() });
        }
        if server.is_empty() || server.contains('@') {
            return Err(JidValidationError::InvalidServer { raw: raw.to_owned() });
        }
        Ok(Self {
            user: user.to_owned(),
            server: server.to_owned(),
        })
    }

    /// Build a JID from already separated parts.
    pub fn from_parts(
        user: impl Into<String>,
        server: impl Into<String>,
    ) -> Result<Self, JidValidationError> {
        let user = user.into();
        let server = server.into();
        if user.is_empty() {
            return Err(JidValidationError::MissingUser {
                raw: format!("{user}@{server}"),
            });
        }
        if server.is_empty() || server.contains('@') {
            return Err(JidValidationError::InvalidServer {
                raw: format!("{user}@{server}"),
            });
        }
        Ok(Self { user, server })
    }

    /// The account or channel part.
    pub fn user(&self) -> &str {
        self.user.as_str()
    }

    /// The server part, without the `@`.
    pub fn server(&self) -> &str {
        self.server.as_str()
    }
}

impl fmt::Display for Jid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.user, self.server)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const USER_SERVER: &str = "s.whatsapp.net";

    #[rstest]
    #[case("628123", "628123@s.whatsapp.net")]
    #[case("+628123", "628123@s.whatsapp.net")]
    #[case(" 628123 ", "628123@s.whatsapp.net")]
    #[case("120363025246125486@newsletter", "120363025246125486@newsletter")]
    #[case("1203630@g.us", "1203630@g.us")]
    fn parses_valid_identifiers(#[case] raw: &str, #[case] expected: &str) {
        let jid = Jid::parse(raw, USER_SERVER).expect("valid jid");
        assert_eq!(jid.to_string(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("+")]
    fn rejects_empty_identifiers(#[case] raw: &str) {
        assert_eq!(Jid::parse(raw, USER_SERVER), Err(JidValidationError::Empty));
    }

    #[rstest]
    fn rejects_missing_user() {
        let err = Jid::parse("@newsletter", USER_SERVER).expect_err("missing user");
        assert!(matches!(err, JidValidationError::MissingUser { .. }));
    }

    #[rstest]
    #[case("123@")]
    #[case("123@news@letter")]
    fn rejects_invalid_server(#[case] raw: &str) {
        let err = Jid::parse(raw, USER_SERVER).expect_err("invalid server");
        assert!(matches!(err, JidValidationError::InvalidServer { .. }));
    }

    #[rstest]
    fn bare_user_with_blank_default_server_is_invalid() {
        let err = Jid::parse("628123", "").expect_err("no server");
        assert!(matches!(err, JidValidationError::InvalidServer { .. }));
    }
}
