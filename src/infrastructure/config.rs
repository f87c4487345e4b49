use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub server: ServerSettings,
    pub datastore: DatastoreSettings,
    pub query: QuerySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatastoreSettings {
    pub host: String,
    pub port: u16,
    pub timeout_secs: u64,
}

impl DatastoreSettings {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct QuerySettings {
    /// Radius in degrees used to turn a position query into an area
    pub position_buffer_degrees: f64,
    /// Observation window when a request carries no datetime
    pub default_window_hours: i64,
    pub drop_missing_ranges: bool,
}

/// Defaults, then `config/service.toml`, then `EDR__SECTION__KEY` variables,
/// then the legacy `DSHOST` / `DSPORT` variables.
pub fn load_service_config() -> anyhow::Result<ServiceConfig> {
    let settings = config::Config::builder()
        .set_default("server.bind_addr", "0.0.0.0:8080")?
        .set_default("datastore.host", "localhost")?
        .set_default("datastore.port", 50050)?
        .set_default("datastore.timeout_secs", 10)?
        .set_default("query.position_buffer_degrees", 0.0001)?
        .set_default("query.default_window_hours", 24)?
        .set_default("query.drop_missing_ranges", false)?
        .add_source(config::File::with_name("config/service").required(false))
        .add_source(
            config::Environment::with_prefix("EDR")
                .prefix_separator("__")
                .separator("__"),
        )
        .set_override_option("datastore.host", std::env::var("DSHOST").ok())?
        .set_override_option("datastore.port", std::env::var("DSPORT").ok())?
        .build()?;

    let config: ServiceConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

impl ServiceConfig {
    /// Reject settings that would make every request of some kind fail.
    pub fn validate(&self) -> anyhow::Result<()> {
        let buffer = self.query.position_buffer_degrees;
        anyhow::ensure!(
            buffer.is_finite() && buffer > 0.0 && buffer < 90.0,
            "query.position_buffer_degrees must be in (0, 90), got {}",
            buffer
        );
        anyhow::ensure!(
            self.query.default_window_hours > 0,
            "query.default_window_hours must be positive, got {}",
            self.query.default_window_hours
        );
        anyhow::ensure!(
            self.datastore.timeout_secs > 0,
            "datastore.timeout_secs must be positive"
        );
        Ok(())
    }
}
