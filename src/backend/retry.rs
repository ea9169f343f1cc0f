use std::time::Duration;

use tracing::debug;
use url::Url;

use super::FetchError;

/// GET `url`, trying up to `attempts` times with a fixed `delay` in between.
/// Both transport errors and non-2xx responses count as failures. The error
/// from the last attempt is returned if none succeed.
pub async fn get_with_retry(
    client: &reqwest::Client,
    url: Url,
    attempts: u32,
    delay: Duration,
) -> Result<reqwest::Response, FetchError> {
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        let err = match client.get(url.clone()).send().await {
            Ok(res) if res.status().is_success() => return Ok(res),
            Ok(res) => FetchError::BadStatus(res.status()),
            Err(err) => FetchError::Network(err),
        };

        if attempt >= attempts {
            return Err(err);
        }
        debug!("GET {url} failed (attempt {attempt}/{attempts}): {err}");
        attempt += 1;
        tokio::time::sleep(delay).await;
    }
}
