use std::net::SocketAddr;

/// Environment-driven startup configuration (SPEC_FULL "Ambient stack" —
/// the teacher's `utils` scatters these as bare `std::env::var` calls at
/// each call site; gathered here into one struct read once at startup).
pub struct Config {
    pub database_url: String,
    pub rabbitmq_url: String,
    pub bind_addr: SocketAddr,
    pub health_window_seconds: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let rabbitmq_url = std::env::var("RABBITMQ_URL")?;
        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8081".to_string())
            .parse()?;
        let health_window_seconds = std::env::var("HEALTH_WINDOW_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(120);

        Ok(Config { database_url, rabbitmq_url, bind_addr, health_window_seconds })
    }
}
