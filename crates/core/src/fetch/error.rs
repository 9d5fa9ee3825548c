use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The request never produced a response (DNS, connect, reset).
    Transport,
    /// The server answered with a non-2xx status.
    Status,
    /// The body was not the expected JSON.
    Decode,
}

#[derive(Debug, Clone)]
pub struct FetchError {
    pub url: String,
    pub status: Option<u16>,
    pub kind: FetchErrorKind,
    pub detail: String,
}

impl FetchError {
    pub fn transport(url: impl Into<String>, detail: impl fmt::Display) -> Self {
        Self {
            url: url.into(),
            status: None,
            kind: FetchErrorKind::Transport,
            detail: detail.to_string(),
        }
    }

    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self {
            url: url.into(),
            status: Some(status),
            kind: FetchErrorKind::Status,
            detail: format!("HTTP {status}"),
        }
    }

    pub fn decode(url: impl Into<String>, status: u16, detail: impl fmt::Display) -> Self {
        Self {
            url: url.into(),
            status: Some(status),
            kind: FetchErrorKind::Decode,
            detail: detail.to_string(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(
                f,
                "fetch error (url={}, status={}, kind={:?}): {}",
                self.url, status, self.kind, self.detail
            ),
            None => write!(
                f,
                "fetch error (url={}, kind={:?}): {}",
                self.url, self.kind, self.detail
            ),
        }
    }
}

impl std::error::Error for FetchError {}
