//! Runtime settings.
//!
//! Defaults, then `storefinder.toml` (or the file passed with `--config`),
//! then `STOREFINDER_*` environment variables.

use std::{path::Path, time::Duration};

use anyhow::{ensure, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_FILE: &str = "storefinder.toml";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub nominatim_url: String,
    pub overpass_url: String,
    pub user_agent: String,
    /// Sent to Nominatim so the operators can reach out about heavy use.
    pub contact_email: Option<String>,
    pub timeout_secs: u64,
    /// Server-side limit passed in the Overpass query header.
    pub overpass_timeout_secs: u64,
    pub default_radius_km: f64,
    pub max_radius_km: f64,
    pub notice_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nominatim_url: "https://nominatim.openstreetmap.org".to_string(),
            overpass_url: "https://overpass-api.de/api/interpreter".to_string(),
            user_agent: concat!("storefinder/", env!("CARGO_PKG_VERSION")).to_string(),
            contact_email: None,
            timeout_secs: 30,
            overpass_timeout_secs: 25,
            default_radius_km: 2.0,
            max_radius_km: 10.0,
            notice_secs: 5,
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = path.unwrap_or(Path::new(DEFAULT_FILE));
        if path.is_some() {
            ensure!(file.exists(), "config file {} does not exist", file.display());
        }

        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed("STOREFINDER_"))
            .extract()
            .context("failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        ensure!(self.timeout_secs > 0, "timeout_secs must be positive");
        ensure!(
            self.overpass_timeout_secs > 0,
            "overpass_timeout_secs must be positive"
        );
        ensure!(self.max_radius_km >= 1.0, "max_radius_km must be at least 1");
        ensure!(
            (1.0..=self.max_radius_km).contains(&self.default_radius_km),
            "default_radius_km must be between 1 and {}",
            self.max_radius_km
        );
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn notice_duration(&self) -> Duration {
        Duration::from_secs(self.notice_secs)
    }

    /// Keeps a slider value inside `1..=max_radius_km`.
    pub fn clamp_radius(&self, km: f64) -> f64 {
        if km.is_nan() {
            return self.default_radius_km;
        }
        km.clamp(1.0, self.max_radius_km)
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn defaults() {
        Jail::expect_with(|_| {
            assert_eq!(Config::load(None).unwrap(), Config::default());
            Ok(())
        });
    }

    #[test]
    fn file_and_env_overrides() {
        Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_FILE,
                r#"
                    max_radius_km = 20.0
                    default_radius_km = 5.0
                    contact_email = "ops@example.com"
                "#,
            )?;
            jail.set_env("STOREFINDER_DEFAULT_RADIUS_KM", "7.5");

            let config = Config::load(None).unwrap();
            assert_eq!(config.max_radius_km, 20.0);
            assert_eq!(config.default_radius_km, 7.5);
            assert_eq!(config.contact_email.as_deref(), Some("ops@example.com"));
            assert_eq!(config.timeout_secs, 30);
            Ok(())
        });
    }

    #[test]
    fn rejects_bad_radius() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "default_radius_km = 50.0")?;
            assert!(Config::load(Some(Path::new("custom.toml"))).is_err());
            assert!(Config::load(Some(Path::new("missing.toml"))).is_err());
            Ok(())
        });
    }

    #[test]
    fn clamp_radius() {
        let config = Config::default();
        assert_eq!(config.clamp_radius(0.2), 1.0);
        assert_eq!(config.clamp_radius(4.0), 4.0);
        assert_eq!(config.clamp_radius(99.0), 10.0);
        assert_eq!(config.clamp_radius(f64::NAN), 2.0);
    }
}
