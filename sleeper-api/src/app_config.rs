use serde::Deserialize;
use sleeper_domain::{CoachLayout, ReservationRules};
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub coach: CoachLayout,
    pub rules: ReservationRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file; optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `SLEEPER__SERVER__PORT=9000` overrides the port
            .add_source(config::Environment::with_prefix("SLEEPER").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
