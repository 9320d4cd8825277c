//! Administrator credential (`name:password`) and its validation.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Why a credential string was rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum CredentialError {
    #[error("Admin secret is missing")]
    Empty,
    #[error("Admin secret must have the form name:password")]
    MissingDelimiter,
    #[error("Admin name must not be empty")]
    EmptyName,
    #[error("Admin password must not be empty")]
    EmptyPassword,
}

/// A validated `name:password` credential. Only constructible through [`Credential::parse`].
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    raw: String,
    name_len: usize,
}

impl Credential {
    /// Validate and wrap a credential string.
    ///
    /// The name is everything before the first `:` and the password is the segment
    /// after it, up to a second `:` if there is one. Both must be non-blank. The
    /// input is kept exactly as typed; that is what gets cached and sent.
    pub fn parse(input: &str) -> Result<Self, CredentialError> {
        if input.trim().is_empty() {
            return Err(CredentialError::Empty);
        }
        let (name, rest) = input.split_once(':').ok_or(CredentialError::MissingDelimiter)?;
        let password = rest.split_once(':').map_or(rest, |(first, _)| first);
        if name.trim().is_empty() {
            return Err(CredentialError::EmptyName);
        }
        if password.trim().is_empty() {
            return Err(CredentialError::EmptyPassword);
        }
        Ok(Self {
            raw: input.to_string(),
            name_len: name.len(),
        })
    }

    pub fn name(&self) -> &str {
        self.raw[..self.name_len].trim()
    }

    /// The credential as sent to the scoring service and cached.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for Credential {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("name", &self.name())
            .field("password", &"***")
            .finish()
    }
}
