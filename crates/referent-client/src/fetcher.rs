use std::net::IpAddr;

use referent_core::error::AppError;
use referent_core::traits::Fetcher;
use reqwest::header::{ACCEPT, ACCEPT_CHARSET, HeaderMap, HeaderValue, LOCATION};
use reqwest::redirect::Policy;
use reqwest::{Client, Response};
use url::Url;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const MAX_REDIRECTS: usize = 10;

/// HTTP fetcher for article pages.
///
/// Sends a desktop browser `User-Agent`. No client timeout is set; the
/// transport defaults apply. Redirects are followed by the fetcher itself
/// (at most 10 hops) so that every hop passes the same URL check.
/// By default, SSRF protection is **enabled**: requests to private/reserved
/// IP ranges are blocked. Use [`allow_private_urls`](Self::allow_private_urls)
/// to disable this (e.g., for CLI usage where the user controls the machine).
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
    ssrf_protection: bool,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_CHARSET, HeaderValue::from_static("utf-8"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .redirect(Policy::none())
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            ssrf_protection: true,
        })
    }

    /// Disable SSRF protection, allowing requests to private/reserved IPs.
    pub fn allow_private_urls(mut self) -> Self {
        self.ssrf_protection = false;
        self
    }

    async fn get(&self, url: &str) -> Result<Response, AppError> {
        self.client.get(url).send().await.map_err(|e| {
            if e.is_connect() {
                AppError::NetworkError(format!("Connection failed: {e}"))
            } else if e.is_builder() {
                AppError::ValidationError(format!("Invalid URL: {e}"))
            } else {
                AppError::HttpError(e.to_string())
            }
        })
    }
}

impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        if self.ssrf_protection {
            validate_url(url).await?;
        }

        let mut current = url.to_string();
        let mut response = self.get(&current).await?;
        for _ in 0..MAX_REDIRECTS {
            let location = match response.headers().get(LOCATION) {
                Some(value) if response.status().is_redirection() => value
                    .to_str()
                    .map_err(|_| AppError::HttpError("Invalid redirect location".to_string()))?
                    .to_string(),
                _ => break,
            };
            current = next_hop(&current, &location, self.ssrf_protection).await?;
            tracing::debug!(url, to = %current, "Following redirect");
            response = self.get(&current).await?;
        }

        let status = response.status();
        if status.is_redirection() && response.headers().contains_key(LOCATION) {
            return Err(AppError::HttpError(format!(
                "Too many redirects while loading {url}"
            )));
        }
        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "Article fetch failed");
            return Err(AppError::UpstreamError {
                status_code: status.as_u16(),
                message: format!(
                    "Failed to load page: {}",
                    status.canonical_reason().unwrap_or("unknown status")
                ),
            });
        }

        response
            .text()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to read response body: {e}")))
    }
}

/// Resolve a `Location` header against the current URL, checking the target when protected.
async fn next_hop(current: &str, location: &str, protect: bool) -> Result<String, AppError> {
    let base =
        Url::parse(current).map_err(|e| AppError::ValidationError(format!("Invalid URL: {e}")))?;
    let target = base
        .join(location)
        .map_err(|e| AppError::ValidationError(format!("Invalid redirect location: {e}")))?;

    if protect {
        validate_url(target.as_str()).await?;
    }
    Ok(target.into())
}

// ---------------------------------------------------------------------------
// SSRF protection
// ---------------------------------------------------------------------------

/// Validate a URL to prevent server-side request forgery (SSRF).
///
/// 1. Only allow `http` and `https` schemes.
/// 2. Resolve the hostname via DNS.
/// 3. Reject if any resolved IP is private/reserved.
async fn validate_url(url: &str) -> Result<(), AppError> {
    let parsed =
        Url::parse(url).map_err(|e| AppError::ValidationError(format!("Invalid URL: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(AppError::ValidationError(format!(
                "URL scheme '{scheme}' is not allowed (only http/https)"
            )));
        }
    }

    let host = parsed
        .host_str()
        .ok_or_else(|| AppError::ValidationError("URL has no host".to_string()))?;

    // IPv6 literals come back bracketed from host_str
    let literal = host.trim_start_matches('[').trim_end_matches(']');
    if let Ok(ip) = literal.parse::<IpAddr>() {
        if is_private_ip(ip) {
            return Err(AppError::ValidationError(format!(
                "SSRF blocked: {host} resolves to private/reserved IP"
            )));
        }
        return Ok(());
    }

    let port = parsed.port_or_known_default().unwrap_or(80);
    let addrs: Vec<_> = tokio::net::lookup_host((host, port))
        .await
        .map_err(|e| AppError::NetworkError(format!("DNS resolution failed for {host}: {e}")))?
        .collect();

    if addrs.is_empty() {
        return Err(AppError::NetworkError(format!(
            "DNS resolution returned no addresses for {host}"
        )));
    }

    for socket_addr in &addrs {
        if is_private_ip(socket_addr.ip()) {
            return Err(AppError::ValidationError(format!(
                "SSRF blocked: {host} resolves to private/reserved IP {}",
                socket_addr.ip()
            )));
        }
    }

    Ok(())
}

/// Check if an IP address is in a private/reserved/link-local range.
fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local() // 169.254.0.0/16, cloud metadata
                || v4.is_unspecified()
                || v4.is_broadcast()
                || v4.is_documentation()
                || v4.octets()[0] == 100 && (v4.octets()[1] & 0xC0) == 64 // 100.64.0.0/10 (CGN)
        }
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || v6.is_unspecified()
                || (v6.segments()[0] & 0xFFC0) == 0xFE80 // fe80::/10
                || (v6.segments()[0] & 0xFE00) == 0xFC00 // fc00::/7
                || match v6.to_ipv4_mapped() {
                    Some(v4) => is_private_ip(IpAddr::V4(v4)),
                    None => false,
                }
        }
    }
}
