//! The request being signed or verified.

use crate::params::{EMPTY_PARAMS, RawParams, RequestParams, normalize};

/// Method, target URL and parameters of an API request.
///
/// The caller extracts these from its HTTP framework; the URL must be the
/// base URL without query string, with query parameters passed as
/// parameters instead.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: String,
    url: String,
    params: RequestParams,
    multipart: bool,
}

impl ApiRequest {
    /// Create a request with normalized parameters.
    pub fn new(
        method: impl Into<String>,
        url: impl Into<String>,
        params: impl Into<RawParams>,
    ) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            params: normalize(params.into()),
            multipart: false,
        }
    }

    /// Mark the body as `multipart/form-data` encoded.
    #[must_use]
    pub fn with_multipart(mut self, multipart: bool) -> Self {
        self.multipart = multipart;
        self
    }

    /// HTTP method as supplied.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Target URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// All request parameters.
    #[must_use]
    pub fn params(&self) -> &RequestParams {
        &self.params
    }

    /// Whether the body is `multipart/form-data` encoded.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.multipart
    }

    /// The parameters that take part in the signature.
    ///
    /// Multipart bodies of non-GET requests are not signed, so the empty set
    /// is returned for them.
    #[must_use]
    pub fn signing_params(&self) -> &RequestParams {
        if self.multipart && !self.method.eq_ignore_ascii_case("GET") {
            &EMPTY_PARAMS
        } else {
            &self.params
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_sign_params_for_regular_requests() {
        let request = ApiRequest::new("POST", "http://example.com/upload", "a=1");
        assert_eq!(request.signing_params().len(), 1);
    }

    #[test]
    fn test_should_exclude_multipart_body_from_signing() {
        let request =
            ApiRequest::new("POST", "http://example.com/upload", "a=1").with_multipart(true);

        assert!(request.signing_params().is_empty());
        assert_eq!(request.params().len(), 1);
    }

    #[test]
    fn test_should_keep_params_for_multipart_get() {
        let request =
            ApiRequest::new("GET", "http://example.com/upload", "a=1").with_multipart(true);
        assert_eq!(request.signing_params().len(), 1);
    }
}
