/// Base URL of the `wcp-api` instance to talk to (SPEC_FULL "Ambient
/// stack"). No kubeconfig/cluster awareness here — the CLI only ever
/// talks to the HTTP surface, never to Kubernetes directly.
pub struct Config {
    pub api_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        let api_url = std::env::var("WCP_API_URL").unwrap_or_else(|_| "http://localhost:8081".to_string());
        Config { api_url }
    }
}
