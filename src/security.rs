use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    Error,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
};

// Feed content is inserted as raw markup, so scripts are restricted to our own origin.
const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data: https:; media-src https:; connect-src 'self'; frame-src 'none'";

/// Security headers middleware
pub struct SecurityHeaders;

impl<S, B> Transform<S, ServiceRequest> for SecurityHeaders
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityHeadersMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityHeadersMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct SecurityHeadersMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SecurityHeadersMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        Box::pin(async move {
            let mut res = srv.call(req).await?;
            let headers = res.headers_mut();

            // Prevent clickjacking
            headers.insert(
                HeaderName::from_static("x-frame-options"),
                HeaderValue::from_static("DENY"),
            );

            // Prevent MIME type sniffing
            headers.insert(
                HeaderName::from_static("x-content-type-options"),
                HeaderValue::from_static("nosniff"),
            );

            // Linked articles should not learn which reader sent the visitor
            headers.insert(
                HeaderName::from_static("referrer-policy"),
                HeaderValue::from_static("no-referrer"),
            );

            headers.insert(
                HeaderName::from_static("content-security-policy"),
                HeaderValue::from_static(CONTENT_SECURITY_POLICY),
            );

            Ok(res)
        })
    }
}

/// Input validation utilities
pub mod validation {
    use url::Url;

    const MAX_URL_LEN: usize = 2048;

    /// Validate URL format and scheme
    pub fn validate_url(url: &str) -> Result<(), String> {
        if url.is_empty() {
            return Err("URL cannot be empty".to_string());
        }

        if url.len() > MAX_URL_LEN {
            return Err(format!("URL too long (max {MAX_URL_LEN} characters)"));
        }

        let parsed = Url::parse(url).map_err(|e| format!("Invalid URL: {e}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err("Invalid URL format. Must be HTTP or HTTPS".to_string());
        }
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err("URL must include a host".to_string());
        }

        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_accepts_http_and_https() {
            assert!(validate_url("https://example.com/feed.xml").is_ok());
            assert!(validate_url("http://127.0.0.1:8000/rss").is_ok());
        }

        #[test]
        fn test_rejects_bad_urls() {
            assert_eq!(validate_url(""), Err("URL cannot be empty".to_string()));
            assert!(validate_url("example.com/feed").is_err());
            assert!(validate_url("ftp://example.com/feed").is_err());
            assert!(validate_url("file:///etc/passwd").is_err());

            let long = format!("https://example.com/{}", "a".repeat(MAX_URL_LEN));
            assert!(validate_url(&long).is_err());
        }
    }
}

/// Rate limiting configuration
pub use actix_governor::{GovernorConfig, GovernorConfigBuilder};

pub fn create_rate_limiter() -> GovernorConfig<
    actix_governor::PeerIpKeyExtractor,
    actix_governor::governor::middleware::StateInformationMiddleware,
> {
    GovernorConfigBuilder::default()
        .per_second(10) // Allow 10 requests per second
        .burst_size(30) // A page load fires several requests at once
        .use_headers() // Send rate limit info in headers
        .finish()
        .expect("rate limiter quota is non-zero")
}
