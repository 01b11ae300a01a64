pub fn remove_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url[..url.len() - 1].to_string()
    } else {
        url.to_string()
    }
}

/// Retry an async operation with exponential backoff, capped at 30s per wait.
pub async fn retry<T, E, F, Fut>(mut retries: u32, base_delay_ms: u64, mut f: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Debug,
{
    let mut attempt = 0u32;
    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) if retries == 0 => return Err(e),
            Err(e) => {
                let delay = (base_delay_ms * (1u64 << attempt.min(5))).min(30_000);
                log::warn!(
                    "attempt {} failed ({:?}), retrying in {}ms...",
                    attempt + 1,
                    e,
                    delay
                );
                tokio::time::sleep(tokio::time::Duration::from_millis(delay)).await;
                retries -= 1;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_trailing_slash() {
        assert_eq!(remove_trailing_slash("http://x/"), "http://x");
        assert_eq!(remove_trailing_slash("http://x"), "http://x");
    }

    #[tokio::test]
    async fn test_retry_eventually_succeeds() {
        let mut attempts = 0;
        let result: Result<u32, &str> = retry(3, 1, || {
            attempts += 1;
            let outcome = if attempts < 3 { Err("nope") } else { Ok(7) };
            async move { outcome }
        })
        .await;
        assert_eq!(result, Ok(7));
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn test_retry_exhausts() {
        let result: Result<u32, &str> = retry(2, 1, || async { Err("still down") }).await;
        assert_eq!(result, Err("still down"));
    }
}
