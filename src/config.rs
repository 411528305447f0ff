//! Server configuration from environment variables
//!
//! | variable             | default         |
//! |----------------------|-----------------|
//! | `MODEL_PATH`         | `model.json`    |
//! | `MODEL_FORMAT`       | `gbdt`          |
//! | `MODEL_OBJECTIVE`    | `multi:softmax` |
//! | `MODEL_NUM_CLASSES`  | `19`            |
//! | `HOST`               | `0.0.0.0`       |
//! | `PORT`               | `5000`          |
//! | `PREDICT_TIMEOUT_MS` | unset           |
//!
//! `MODEL_FORMAT=xgboost` reads an XGBoost JSON dump; the objective and class
//! count only apply to that format.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::fertilizer::FERTILIZER_COUNT;
use crate::model::ModelFormat;

pub const DEFAULT_MODEL_PATH: &str = "model.json";
pub const DEFAULT_OBJECTIVE: &str = "multi:softmax";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub model_path: PathBuf,
    pub model_format: ModelFormat,
    pub host: IpAddr,
    pub port: u16,
    /// Upper bound on a single model call; `None` waits indefinitely
    pub predict_timeout: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            model_format: ModelFormat::Gbdt,
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            predict_timeout: None,
        }
    }
}

/// Parse `raw`, falling back to `default` (with a warning) when it is malformed
fn parse_or<T: FromStr>(name: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}, using default", name, value);
            default
        }),
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let model_path = lookup("MODEL_PATH")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.model_path);

        let model_format = match lookup("MODEL_FORMAT").as_deref().map(str::trim) {
            None | Some("") | Some("gbdt") => ModelFormat::Gbdt,
            Some("xgboost") => ModelFormat::XgboostDump {
                objective: lookup("MODEL_OBJECTIVE")
                    .filter(|o| !o.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_OBJECTIVE.to_string()),
                num_classes: parse_or("MODEL_NUM_CLASSES", lookup("MODEL_NUM_CLASSES"), FERTILIZER_COUNT),
            },
            Some(other) => {
                tracing::warn!("Ignoring invalid MODEL_FORMAT={:?}, using gbdt", other);
                ModelFormat::Gbdt
            }
        };

        let host = parse_or("HOST", lookup("HOST"), defaults.host);
        let port = parse_or("PORT", lookup("PORT"), defaults.port);

        let predict_timeout = parse_or::<u64>("PREDICT_TIMEOUT_MS", lookup("PREDICT_TIMEOUT_MS"), 0);
        let predict_timeout = (predict_timeout > 0).then(|| Duration::from_millis(predict_timeout));

        Self { model_path, model_format, host, port, predict_timeout }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg, ServerConfig::default());
        assert_eq!(cfg.bind_addr().to_string(), "0.0.0.0:5000");
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("MODEL_PATH", "/opt/fertilizer/model.json"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("PREDICT_TIMEOUT_MS", "1500"),
        ]);
        assert_eq!(cfg.model_path, PathBuf::from("/opt/fertilizer/model.json"));
        assert_eq!(cfg.bind_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(cfg.predict_timeout, Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_xgboost_dump_format() {
        let cfg = config(&[("MODEL_FORMAT", "xgboost"), ("MODEL_PATH", "dump.json")]);
        assert_eq!(
            cfg.model_format,
            ModelFormat::XgboostDump { objective: "multi:softmax".to_string(), num_classes: 19 }
        );

        let cfg = config(&[
            ("MODEL_FORMAT", "xgboost"),
            ("MODEL_OBJECTIVE", "multi:softprob"),
            ("MODEL_NUM_CLASSES", "7"),
        ]);
        assert_eq!(
            cfg.model_format,
            ModelFormat::XgboostDump { objective: "multi:softprob".to_string(), num_classes: 7 }
        );
    }

    #[test]
    fn test_unknown_model_format_falls_back() {
        assert_eq!(config(&[("MODEL_FORMAT", "pickle")]).model_format, ModelFormat::Gbdt);
        assert_eq!(config(&[("MODEL_OBJECTIVE", "multi:softprob")]).model_format, ModelFormat::Gbdt);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let cfg = config(&[("PORT", "eighty"), ("HOST", "localhost"), ("PREDICT_TIMEOUT_MS", "-5")]);
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.host, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(cfg.predict_timeout, None);
    }

    #[test]
    fn test_zero_timeout_disables() {
        assert_eq!(config(&[("PREDICT_TIMEOUT_MS", "0")]).predict_timeout, None);
    }

    #[test]
    fn test_empty_model_path_uses_default() {
        assert_eq!(config(&[("MODEL_PATH", "")]).model_path, PathBuf::from(DEFAULT_MODEL_PATH));
    }
}
