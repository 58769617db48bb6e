//! HTTP download with size limits and bounded retries.

use std::time::Duration;

use url::form_urlencoded;

use super::ProvisionConfig;
use crate::config::{DOWNLOAD_CONNECT_TIMEOUT, GEOLITE2_EDITION, MAX_DOWNLOAD_SIZE};
use crate::error_handling::ProvisionError;

/// Builds the HTTP client used for one database.
pub(crate) fn build_client(
    config: &ProvisionConfig,
    user_agent: Option<&str>,
    proxy: Option<&str>,
) -> Result<reqwest::Client, ProvisionError> {
    let mut builder = reqwest::Client::builder()
        .timeout(config.timeout)
        .connect_timeout(DOWNLOAD_CONNECT_TIMEOUT);

    if let Some(user_agent) = user_agent {
        builder = builder.user_agent(user_agent);
    }
    if let Some(proxy) = proxy {
        log::info!("Using proxy {}", proxy);
        builder = builder.proxy(reqwest::Proxy::all(proxy).map_err(ProvisionError::Client)?);
    }

    builder.build().map_err(ProvisionError::Client)
}

/// GeoLite2-City tar.gz URL; the license key is URL-encoded.
pub(crate) fn geolite2_url(base: &str, license_key: &str) -> String {
    let encoded_key = form_urlencoded::byte_serialize(license_key.as_bytes()).collect::<String>();
    format!(
        "{}?edition_id={}&license_key={}&suffix=tar.gz",
        base, GEOLITE2_EDITION, encoded_key
    )
}

/// URL with its query string removed, safe to log.
pub(crate) fn redact_url(url: &str) -> String {
    match url.split_once('?') {
        Some((base, _)) => format!("{}?<redacted>", base),
        None => url.to_string(),
    }
}

/// Downloads `url`, retrying transient failures with exponential backoff.
///
/// Permanent failures (4xx other than 429, oversized payload) return at once.
pub(crate) async fn download_with_retries(
    client: &reqwest::Client,
    url: &str,
    database: &'static str,
    config: &ProvisionConfig,
) -> Result<Vec<u8>, ProvisionError> {
    let display_url = redact_url(url);
    log::info!("Downloading {} from {}", database, display_url);

    let mut attempt = 1;
    loop {
        match download_with_size_limit(client, url, database).await {
            Ok(bytes) => {
                log::info!("Downloaded {} ({} bytes)", database, bytes.len());
                return Ok(bytes);
            }
            Err(e) if e.is_transient() && attempt < config.max_retries => {
                let delay = backoff_delay(config.retry_base_delay, attempt);
                log::warn!(
                    "Failed to download {} from {} (attempt {}/{}): {}; retrying in {:?}",
                    database,
                    display_url,
                    attempt,
                    config.max_retries,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// 1x, 2x, 4x, ... the base delay.
fn backoff_delay(base: Duration, attempt: usize) -> Duration {
    let shift = attempt.saturating_sub(1).min(16) as u32;
    base.saturating_mul(1u32 << shift)
}

/// Single download attempt with size limit enforcement
async fn download_with_size_limit(
    client: &reqwest::Client,
    url: &str,
    database: &'static str,
) -> Result<Vec<u8>, ProvisionError> {
    let network = |source: reqwest::Error| ProvisionError::Network { database, source };

    let response = client.get(url).send().await.map_err(network)?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProvisionError::HttpStatus {
            database,
            status: status.as_u16(),
        });
    }

    let too_large = |size: u64| ProvisionError::Validation {
        database,
        reason: format!("payload too large: {} bytes (max: {} bytes)", size, MAX_DOWNLOAD_SIZE),
    };

    // Check content-length header if available
    if let Some(content_length) = response.content_length() {
        if content_length > MAX_DOWNLOAD_SIZE as u64 {
            return Err(too_large(content_length));
        }
    }

    let downloaded_bytes = response.bytes().await.map_err(network)?.to_vec();

    // Content-length may be missing or wrong
    if downloaded_bytes.len() > MAX_DOWNLOAD_SIZE {
        return Err(too_large(downloaded_bytes.len() as u64));
    }

    Ok(downloaded_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use httptest::{matchers::*, responders::*, Expectation, Server};

    fn fast_config() -> ProvisionConfig {
        ProvisionConfig {
            retry_base_delay: Duration::from_millis(10),
            ..ProvisionConfig::from(&Config::default())
        }
    }

    #[test]
    fn test_geolite2_url_encodes_key() {
        let url = geolite2_url("https://example.com/dl", "a b&c=d");
        assert_eq!(
            url,
            "https://example.com/dl?edition_id=GeoLite2-City&license_key=a+b%26c%3Dd&suffix=tar.gz"
        );
    }

    #[test]
    fn test_redact_url_hides_license_key() {
        let url = geolite2_url("https://example.com/dl", "secret-key");
        let redacted = redact_url(&url);
        assert!(!redacted.contains("secret-key"));
        assert_eq!(redacted, "https://example.com/dl?<redacted>");
        assert_eq!(redact_url("https://example.com/a.ipdb"), "https://example.com/a.ipdb");
    }

    #[test]
    fn test_backoff_delay_doubles() {
        let base = Duration::from_millis(100);
        assert_eq!(backoff_delay(base, 1), Duration::from_millis(100));
        assert_eq!(backoff_delay(base, 2), Duration::from_millis(200));
        assert_eq!(backoff_delay(base, 3), Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_download_success() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/db"))
                .respond_with(status_code(200).body("payload")),
        );

        let config = fast_config();
        let client = build_client(&config, None, None).unwrap();
        let url = server.url("/db").to_string();
        let bytes = download_with_retries(&client, &url, "PureIPDB", &config)
            .await
            .unwrap();
        assert_eq!(bytes, b"payload");
    }

    #[tokio::test]
    async fn test_download_retries_server_errors() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/db"))
                .times(3)
                .respond_with(httptest::cycle![
                    status_code(500),
                    status_code(502),
                    status_code(200).body("third time lucky"),
                ]),
        );

        let config = fast_config();
        let client = build_client(&config, None, None).unwrap();
        let url = server.url("/db").to_string();
        let bytes = download_with_retries(&client, &url, "PureIPDB", &config)
            .await
            .unwrap();
        assert_eq!(bytes, b"third time lucky");
    }

    #[tokio::test]
    async fn test_download_gives_up_after_max_retries() {
        let config = fast_config();
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/db"))
                .times(config.max_retries)
                .respond_with(status_code(503)),
        );

        let client = build_client(&config, None, None).unwrap();
        let url = server.url("/db").to_string();
        let err = download_with_retries(&client, &url, "PureIPDB", &config)
            .await
            .unwrap_err();
        assert!(matches!(err, ProvisionError::HttpStatus { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_download_does_not_retry_not_found() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/db"))
                .times(1)
                .respond_with(status_code(404)),
        );

        let config = fast_config();
        let client = build_client(&config, None, None).unwrap();
        let url = server.url("/db").to_string();
        let err = download_with_retries(&client, &url, "GeoLite2", &config)
            .await
            .unwrap_err();
        assert!(matches!(err, ProvisionError::HttpStatus { status: 404, .. }));
        assert!(!err.is_transient());
    }
}
