//! Configuration errors.
//!
//! These are the only failures that escape the library as `Err`. Problems with
//! the *content* being parsed never do: they produce an
//! [`Outcome::Invalid`](crate::Outcome::Invalid) result with [`Issue`](crate::Issue)s.

/// Errors raised while configuring a parser.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Neither the requested locale nor any fallback is registered.
    #[error("locale not found (tried: {})", attempted.join(", "))]
    LocaleNotFound { attempted: Vec<String> },

    /// A locale pack was rejected at registration.
    #[error("invalid locale pack: {0}")]
    LocaleInvalid(String),

    /// Option overrides did not fit the options schema.
    #[error("invalid parse options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
