use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::types::InferenceClient;
use super::InferenceError;
use crate::config::DEFAULT_OLLAMA_URL;

/// Ollama HTTP client for local LLM inference, bound to one model.
pub struct OllamaClient {
    base_url: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    /// Create a new OllamaClient pointing at an Ollama instance.
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        }
    }

    /// Default Ollama instance at localhost:11434 with 5-minute timeout.
    pub fn default_local(model: &str) -> Self {
        Self::new(DEFAULT_OLLAMA_URL, model, 300)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Response body from Ollama /api/generate. Only `response` is read.
#[derive(Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

impl InferenceClient for OllamaClient {
    fn submit(&self, prompt: &str) -> Result<String, InferenceError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        tracing::debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            "Submitting prompt to Ollama"
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    InferenceError::Connection {
                        endpoint: self.base_url.clone(),
                        reason: e.to_string(),
                    }
                } else if e.is_timeout() {
                    InferenceError::Timeout {
                        duration_secs: self.timeout_secs,
                    }
                } else if e.is_request() {
                    // Reset or closed mid-exchange; the backend is unreachable.
                    InferenceError::Connection {
                        endpoint: self.base_url.clone(),
                        reason: e.to_string(),
                    }
                } else {
                    InferenceError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| InferenceError::MalformedResponse(e.to_string()))?;

        parsed
            .response
            .ok_or_else(|| InferenceError::MalformedResponse("missing `response` field".into()))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Mock inference client for testing. Returns a configurable response.
pub struct MockInferenceClient {
    response: Result<String, InferenceError>,
    model: String,
}

impl MockInferenceClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            model: "mock-model".to_string(),
        }
    }

    /// A client whose every call fails with `error`.
    pub fn failing(error: InferenceError) -> Self {
        Self {
            response: Err(error),
            model: "mock-model".to_string(),
        }
    }
}

impl InferenceClient for MockInferenceClient {
    fn submit(&self, _prompt: &str) -> Result<String, InferenceError> {
        self.response.clone()
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Scripted inference client for workflow tests.
///
/// Each rule pairs a prompt fragment with a canned result; the first rule
/// whose fragment occurs in the prompt answers. Prompts matching no rule get
/// the fallback response. Every submitted prompt is recorded.
pub struct ScriptedInferenceClient {
    rules: Vec<(String, Result<String, InferenceError>)>,
    fallback: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedInferenceClient {
    pub fn new(fallback: &str) -> Self {
        Self {
            rules: Vec::new(),
            fallback: fallback.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn respond_when(mut self, fragment: &str, response: &str) -> Self {
        self.rules
            .push((fragment.to_string(), Ok(response.to_string())));
        self
    }

    pub fn fail_when(mut self, fragment: &str, error: InferenceError) -> Self {
        self.rules.push((fragment.to_string(), Err(error)));
        self
    }

    /// Prompts submitted so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }
}

impl InferenceClient for ScriptedInferenceClient {
    fn submit(&self, prompt: &str) -> Result<String, InferenceError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.rules
            .iter()
            .find(|(fragment, _)| prompt.contains(fragment.as_str()))
            .map(|(_, result)| result.clone())
            .unwrap_or_else(|| Ok(self.fallback.clone()))
    }

    fn model(&self) -> &str {
        "scripted-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_client_returns_configured_response() {
        let client = MockInferenceClient::new("test response");
        assert_eq!(client.submit("prompt").unwrap(), "test response");
    }

    #[test]
    fn mock_client_failing_returns_error() {
        let client = MockInferenceClient::failing(InferenceError::Timeout { duration_secs: 1 });
        assert!(matches!(
            client.submit("prompt"),
            Err(InferenceError::Timeout { .. })
        ));
    }

    #[test]
    fn scripted_client_first_matching_rule_wins() {
        let client = ScriptedInferenceClient::new("fallback")
            .respond_when("alpha", "first")
            .respond_when("alpha beta", "second");
        assert_eq!(client.submit("alpha beta").unwrap(), "first");
        assert_eq!(client.submit("gamma").unwrap(), "fallback");
        assert_eq!(client.call_count(), 2);
        assert_eq!(client.prompts()[1], "gamma");
    }

    #[test]
    fn scripted_client_failure_rule() {
        let client = ScriptedInferenceClient::new("ok").fail_when(
            "boom",
            InferenceError::Status {
                status: 500,
                body: "err".into(),
            },
        );
        assert!(client.submit("boom now").is_err());
        assert!(client.submit("calm").is_ok());
    }

    #[test]
    fn ollama_client_constructor() {
        let client = OllamaClient::new("http://localhost:11434", "medexpert", 120);
        assert_eq!(client.base_url, "http://localhost:11434");
        assert_eq!(client.timeout_secs, 120);
        assert_eq!(client.model(), "medexpert");
    }

    #[test]
    fn ollama_client_trims_trailing_slash() {
        let client = OllamaClient::new("http://localhost:11434/", "m", 60);
        assert_eq!(client.base_url(), "http://localhost:11434");
    }

    #[test]
    fn default_local_uses_standard_port() {
        let client = OllamaClient::default_local("m");
        assert_eq!(client.base_url(), "http://localhost:11434");
    }

    #[test]
    fn unreachable_backend_is_transport_error() {
        // Port 9 (discard) is not an HTTP server on test machines.
        let client = OllamaClient::new("http://127.0.0.1:9", "m", 2);
        let err = client.submit("hello").unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn dropped_connection_is_transport_error() {
        use std::io::Read;
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
        });

        let client = OllamaClient::new(&format!("http://{addr}"), "m", 5);
        let err = client.submit("hi").unwrap_err();
        server.join().unwrap();

        assert!(matches!(err, InferenceError::Connection { .. }), "{err:?}");
        assert!(err.is_transport());
    }

    #[test]
    fn generate_request_serializes_without_streaming() {
        let body = GenerateRequest {
            model: "m",
            prompt: "p",
            stream: false,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "m");
        assert_eq!(json["prompt"], "p");
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn generate_response_ignores_extra_fields() {
        let parsed: GenerateResponse =
            serde_json::from_str(r#"{"response":"hi","done":true,"model":"m"}"#).unwrap();
        assert_eq!(parsed.response.as_deref(), Some("hi"));

        let missing: GenerateResponse = serde_json::from_str(r#"{"done":true}"#).unwrap();
        assert!(missing.response.is_none());
    }
}
