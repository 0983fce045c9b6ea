//! HTTP verbs understood by the transport layer, including the non-standard PURGE.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ApiSuiteError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Options,
    Head,
    Purge,
}

impl Method {
    pub const ALL: [Method; 7] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Delete,
        Method::Options,
        Method::Head,
        Method::Purge,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
            Self::Purge => "PURGE",
        }
    }

    /// Side-effect-free verbs: eligible for caching and retry.
    pub fn is_safe(&self) -> bool {
        matches!(self, Self::Get | Self::Head | Self::Options)
    }

    /// Verbs that carry a request body and vendor write headers.
    pub fn is_modifying(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Delete)
    }

    pub fn to_reqwest(self) -> Result<reqwest::Method, ApiSuiteError> {
        Ok(match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
            Self::Options => reqwest::Method::OPTIONS,
            Self::Head => reqwest::Method::HEAD,
            Self::Purge => reqwest::Method::from_bytes(b"PURGE")
                .map_err(|e| ApiSuiteError::InvalidParameter(e.to_string()))?,
        })
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ApiSuiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == upper)
            .ok_or_else(|| ApiSuiteError::InvalidParameter(format!("unknown HTTP method '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("purge".parse::<Method>().unwrap(), Method::Purge);
        assert_eq!(" Get ".parse::<Method>().unwrap(), Method::Get);
        assert!("BREW".parse::<Method>().is_err());
    }

    #[test]
    fn safe_methods_are_get_head_options() {
        let safe: Vec<_> = Method::ALL.into_iter().filter(Method::is_safe).collect();
        assert_eq!(safe, vec![Method::Get, Method::Options, Method::Head]);
    }

    #[test]
    fn purge_maps_to_extension_verb() {
        assert_eq!(Method::Purge.to_reqwest().unwrap().as_str(), "PURGE");
    }
}
