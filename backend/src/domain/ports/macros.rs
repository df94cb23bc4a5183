//! Macro for port error enums whose variants each carry a detail message.

/// Generate a `thiserror` enum plus one snake_case constructor per variant.
///
/// Every variant gets a `message: String` field; constructors accept
/// anything convertible into `String`.
macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $display:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($display)]
                $variant { message: String },
            )*
        }

        impl $name {
            $(
                ::paste::paste! {
                    pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                        Self::$variant { message: message.into() }
                    }
                }
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    define_port_error! {
        pub enum UpstreamError {
            ConnectionReset => "connection reset: {message}",
            BadGateway => "bad gateway: {message}",
        }
    }

    #[rstest]
    #[case(UpstreamError::connection_reset("peer closed"), "connection reset: peer closed")]
    #[case(UpstreamError::bad_gateway(String::from("502")), "bad gateway: 502")]
    fn constructors_fill_message_field(#[case] error: UpstreamError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    fn constructors_build_matching_variant() {
        assert_eq!(
            UpstreamError::bad_gateway("x"),
            UpstreamError::BadGateway {
                message: "x".to_owned()
            }
        );
    }
}
