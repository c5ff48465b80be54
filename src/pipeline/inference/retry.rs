use std::time::Duration;

use super::types::InferenceClient;
use super::InferenceError;

/// Retries transport failures with exponential backoff: base, 2×base, 4×base, ...
///
/// Malformed responses are returned immediately. With `max_retries == 0`
/// the wrapper behaves exactly like the inner client.
pub struct RetryingClient<C: InferenceClient> {
    inner: C,
    max_retries: u32,
    base_delay: Duration,
}

impl<C: InferenceClient> RetryingClient<C> {
    pub fn new(inner: C, max_retries: u32, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

impl<C: InferenceClient> InferenceClient for RetryingClient<C> {
    fn submit(&self, prompt: &str) -> Result<String, InferenceError> {
        let mut attempt = 0;
        loop {
            match self.inner.submit(prompt) {
                Err(e) if e.is_transport() && attempt < self.max_retries => {
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        model = %self.inner.model(),
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Inference transport failure, retrying"
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    fn model(&self) -> &str {
        self.inner.model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails with `error` for the first `failures` calls, then succeeds.
    struct Flaky {
        failures: u32,
        calls: AtomicU32,
        error: InferenceError,
    }

    impl InferenceClient for Flaky {
        fn submit(&self, _prompt: &str) -> Result<String, InferenceError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(self.error.clone())
            } else {
                Ok("recovered".into())
            }
        }

        fn model(&self) -> &str {
            "flaky"
        }
    }

    fn flaky(failures: u32, error: InferenceError) -> Flaky {
        Flaky {
            failures,
            calls: AtomicU32::new(0),
            error,
        }
    }

    fn refused() -> InferenceError {
        InferenceError::Connection {
            endpoint: "http://localhost:11434".into(),
            reason: "refused".into(),
        }
    }

    #[test]
    fn retries_transport_errors_until_success() {
        let client = RetryingClient::new(flaky(2, refused()), 3, Duration::from_millis(1));
        assert_eq!(client.submit("p").unwrap(), "recovered");
        assert_eq!(client.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn gives_up_after_max_retries() {
        let client = RetryingClient::new(flaky(5, refused()), 2, Duration::from_millis(1));
        assert!(client.submit("p").unwrap_err().is_transport());
        assert_eq!(client.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn malformed_response_is_not_retried() {
        let client = RetryingClient::new(
            flaky(1, InferenceError::MalformedResponse("bad".into())),
            3,
            Duration::from_millis(1),
        );
        assert!(matches!(
            client.submit("p"),
            Err(InferenceError::MalformedResponse(_))
        ));
        assert_eq!(client.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn zero_retries_is_passthrough() {
        let client = RetryingClient::new(flaky(1, refused()), 0, Duration::from_millis(1));
        assert!(client.submit("p").is_err());
        assert_eq!(client.inner().calls.load(Ordering::SeqCst), 1);
        assert_eq!(client.model(), "flaky");
    }

    #[test]
    fn backoff_doubles() {
        let client = RetryingClient::new(flaky(0, refused()), 3, Duration::from_millis(100));
        assert_eq!(client.delay_for(0), Duration::from_millis(100));
        assert_eq!(client.delay_for(1), Duration::from_millis(200));
        assert_eq!(client.delay_for(2), Duration::from_millis(400));
    }
}
