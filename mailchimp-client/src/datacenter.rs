//! Datacenter routing for the Mailchimp API

use std::fmt;

use crate::error::{Error, Result};

/// Account-assigned datacenter shard, embedded in the API base URL
///
/// Unlike a fixed region set, Mailchimp assigns shards per account
/// (`us1`, `us21`, ...), so any lowercase alphanumeric segment is
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Datacenter(String);

impl Datacenter {
    /// Create a datacenter from its routing segment (e.g. `us6`)
    pub fn new(segment: impl Into<String>) -> Result<Self> {
        let segment = segment.into();
        let valid = !segment.is_empty()
            && segment
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit());
        if !valid {
            return Err(Error::InvalidDatacenter(segment));
        }
        Ok(Self(segment))
    }

    /// Extract the datacenter from an API key
    ///
    /// Mailchimp API keys carry their datacenter after the final `-`
    /// (e.g. `0123456789abcdef0123456789abcdef-us6`).
    pub fn from_api_key(api_key: &str) -> Result<Self> {
        let (_, segment) = api_key
            .rsplit_once('-')
            .ok_or(Error::InvalidApiKey {
                reason: "no datacenter suffix",
            })?;
        Self::new(segment)
    }

    /// Routing segment as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Datacenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Datacenter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_datacenter_new() {
        assert_eq!(Datacenter::new("us6").unwrap().as_str(), "us6");
        assert_eq!(Datacenter::new("us21").unwrap().as_str(), "us21");
        assert!(Datacenter::new("").is_err());
        assert!(Datacenter::new("US6").is_err());
        assert!(Datacenter::new("us 6").is_err());
    }

    #[test]
    fn test_datacenter_from_api_key() {
        let dc = Datacenter::from_api_key("0123456789abcdef0123456789abcdef-us6").unwrap();
        assert_eq!(dc.as_str(), "us6");

        assert!(matches!(
            Datacenter::from_api_key("0123456789abcdef"),
            Err(Error::InvalidApiKey { .. })
        ));
        assert!(matches!(
            Datacenter::from_api_key("0123-US6"),
            Err(Error::InvalidDatacenter(_))
        ));
    }

    #[test]
    fn test_datacenter_from_str() {
        use std::str::FromStr;

        assert_eq!(Datacenter::from_str("us6").unwrap().as_str(), "us6");
        assert!(Datacenter::from_str("nope!").is_err());
    }

    #[test]
    fn test_datacenter_display() {
        assert_eq!(Datacenter::new("us6").unwrap().to_string(), "us6");
    }
}
