//! HTTP status code helpers used when classifying remote store failures.

/// HTTP status code returned by the remote expense store.
///
/// Kept as a plain number so error values stay `Copy` and independent of the
/// HTTP client crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpStatusCode(pub u16);

impl HttpStatusCode {
    pub const NOT_FOUND: HttpStatusCode = HttpStatusCode(404);

    /// 4xx responses: the request itself was rejected.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.0)
    }

    /// 5xx responses: the store failed while handling a valid request.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.0)
    }

    pub fn is_not_found(&self) -> bool {
        *self == Self::NOT_FOUND
    }

    /// Codes where repeating the same request later can succeed.
    pub fn is_retryable(&self) -> bool {
        self.is_server_error() || matches!(self.0, 408 | 429)
    }
}

impl From<u16> for HttpStatusCode {
    fn from(code: u16) -> Self {
        HttpStatusCode(code)
    }
}

impl std::fmt::Display for HttpStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
