//! HTTP verb and message types shared by the adapter layer.
//!
//! This module provides [`Method`], [`Request`], and [`Response`]. These are
//! deliberately minimal: the adapter layer performs no wire parsing and no
//! network I/O, so requests and responses only carry what a provider (or a
//! programmatic [`invoke`](crate::server::ServiceServer::invoke)) hands
//! through the handler chain.

use std::fmt;

use thiserror::Error;

pub mod request;
pub mod response;

pub use request::Request;
pub use response::Response;

/// An HTTP request method registrable through the adapter layer.
///
/// Only the seven verbs the adapter exposes registration for are represented;
/// providers wrapping servers with extension-method support handle those
/// outside this contract.
///
/// # Examples
///
/// ```
/// use portico::http::Method;
///
/// let method: Method = "GET".parse().unwrap();
/// assert_eq!(method, Method::Get);
/// assert_eq!(method.as_str(), "GET");
/// assert!(!method.expects_body());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET — retrieve a representation of the target resource.
    Get,
    /// PUT — replace the target resource's current representation.
    Put,
    /// POST — perform resource-specific processing on the request payload.
    Post,
    /// DELETE — remove the target resource.
    Delete,
    /// PATCH — apply partial modifications to a resource.
    Patch,
    /// OPTIONS — describe the communication options for the target resource.
    Options,
    /// HEAD — identical to GET but without a response body.
    Head,
}

/// Error returned when parsing a method string outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported HTTP method {0:?}")]
pub struct UnsupportedMethod(pub String);

impl Method {
    /// All seven registrable verbs, in registration-surface order.
    pub const ALL: [Method; 7] = [
        Method::Get,
        Method::Put,
        Method::Post,
        Method::Delete,
        Method::Patch,
        Method::Options,
        Method::Head,
    ];

    /// Returns the method as its canonical uppercase string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
        }
    }

    /// Returns `true` for verbs that conventionally carry a request body.
    ///
    /// Providers use this to decide whether attaching a body parser to a
    /// route makes sense.
    pub fn expects_body(self) -> bool {
        matches!(self, Self::Put | Self::Post | Self::Patch)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Method {
    type Err = UnsupportedMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "GET" => Self::Get,
            "PUT" => Self::Put,
            "POST" => Self::Post,
            "DELETE" => Self::Delete,
            "PATCH" => Self::Patch,
            "OPTIONS" => Self::Options,
            "HEAD" => Self::Head,
            other => return Err(UnsupportedMethod(other.to_owned())),
        })
    }
}

impl AsRef<str> for Method {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrip_all_verbs() {
        for method in Method::ALL {
            let parsed: Method = method.as_str().parse().unwrap();
            assert_eq!(parsed, method);
        }
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "BREW".parse::<Method>().unwrap_err();
        assert_eq!(err, UnsupportedMethod("BREW".to_owned()));
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert!("get".parse::<Method>().is_err());
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(Method::Patch.to_string(), "PATCH");
    }

    #[test]
    fn body_verbs() {
        assert!(Method::Post.expects_body());
        assert!(Method::Put.expects_body());
        assert!(Method::Patch.expects_body());
        assert!(!Method::Get.expects_body());
        assert!(!Method::Head.expects_body());
    }
}
