//! Live-log endpoint derivation.
//!
//! The log stream lives next to the dashboard page: same host, same port,
//! socket scheme matching the page's transport security.

use std::fmt;

use url::Url;

use crate::error::Error;

/// Fixed path of the live-log socket on the dashboard backend.
pub const LOG_STREAM_PATH: &str = "/api/ws/logs";

/// Where the dashboard page is served from.
///
/// `host` includes the port when it is not the scheme default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    secure: bool,
    host: String,
}

impl PageLocation {
    pub fn new(secure: bool, host: impl Into<String>) -> Self {
        Self {
            secure,
            host: host.into(),
        }
    }

    /// Derive the page location from a dashboard URL.
    ///
    /// `https`/`wss` are secure, `http`/`ws` are not. Anything else is rejected.
    pub fn from_url(url: &Url) -> Result<Self, Error> {
        let secure = match url.scheme() {
            "https" | "wss" => true,
            "http" | "ws" => false,
            other => {
                return Err(Error::UnsupportedScheme {
                    scheme: other.to_owned(),
                });
            }
        };

        let host = url.host_str().ok_or_else(|| Error::MissingHost {
            url: url.to_string(),
        })?;

        // `port()` is None when the port is the scheme default.
        let host = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_owned(),
        };

        Ok(Self { secure, host })
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// `wss:` for secure pages, `ws:` otherwise.
    pub fn socket_scheme(&self) -> &'static str {
        if self.secure { "wss:" } else { "ws:" }
    }

    /// `{scheme}//{host}/api/ws/logs`.
    pub fn log_stream_url(&self) -> Result<Url, Error> {
        let raw = format!("{}//{}{LOG_STREAM_PATH}", self.socket_scheme(), self.host);
        Ok(Url::parse(&raw)?)
    }
}

impl fmt::Display for PageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scheme = if self.secure { "https" } else { "http" };
        write!(f, "{scheme}://{}", self.host)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn location(raw: &str) -> PageLocation {
        PageLocation::from_url(&Url::parse(raw).unwrap()).unwrap()
    }

    #[test]
    fn secure_page_uses_wss() {
        let loc = location("https://bot.example.com:8443/teams");
        assert!(loc.is_secure());
        assert_eq!(loc.host(), "bot.example.com:8443");
        assert_eq!(
            loc.log_stream_url().unwrap().as_str(),
            "wss://bot.example.com:8443/api/ws/logs"
        );
    }

    #[test]
    fn insecure_page_uses_ws() {
        let loc = location("http://localhost");
        assert!(!loc.is_secure());
        assert_eq!(loc.log_stream_url().unwrap().as_str(), "ws://localhost/api/ws/logs");
    }

    #[test]
    fn default_port_is_omitted() {
        let loc = location("https://dash.local:443/");
        assert_eq!(loc.host(), "dash.local");
        assert_eq!(loc.log_stream_url().unwrap().as_str(), "wss://dash.local/api/ws/logs");
    }

    #[test]
    fn non_default_port_is_kept() {
        let loc = location("http://127.0.0.1:8000");
        assert_eq!(loc.log_stream_url().unwrap().as_str(), "ws://127.0.0.1:8000/api/ws/logs");
    }

    #[test]
    fn page_path_and_query_are_ignored() {
        let loc = location("http://localhost:3000/history?team=7#top");
        assert_eq!(loc.log_stream_url().unwrap().as_str(), "ws://localhost:3000/api/ws/logs");
    }

    #[test]
    fn socket_urls_are_accepted_as_page_locations() {
        assert!(location("wss://h").is_secure());
        assert!(!location("ws://h").is_secure());
    }

    #[test]
    fn unsupported_scheme_is_rejected() {
        let url = Url::parse("ftp://files.example.com").unwrap();
        let err = PageLocation::from_url(&url).unwrap_err();
        assert!(matches!(err, Error::UnsupportedScheme { ref scheme } if scheme == "ftp"));
    }

    #[test]
    fn display_renders_page_origin() {
        assert_eq!(PageLocation::new(true, "h:1").to_string(), "https://h:1");
    }
}
