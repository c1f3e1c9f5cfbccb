//! Configuration loading for the pricing services.
//!
//! Resolution order:
//! 1. explicit path, from `--config <path>` / `DPRICE_CONFIG` (must exist)
//! 2. `./dprice.toml` (if present)
//! 3. built-in defaults
//!
//! Environment overrides are applied afterwards: `MODEL_DIR`, `MODEL_PATH`,
//! `MODEL_VARIANT`, `PORT`.

use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::encoding::{Attribute, ColumnOrder, EncodingTable, OneHotTable, OrdinalTable};
use crate::error::{PricingError, Result};
use crate::input::InputBounds;
use crate::variant::ModelVariant;

const LOCAL_CONFIG: &str = "dprice.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    /// Custom variant; takes precedence over `model.variant` presets.
    #[serde(default)]
    pub variant: Option<VariantConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:8000).
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_address() -> String {
    "0.0.0.0:8000".to_string()
}

/// Replace the port of `address`, keeping its host. A bare host gains the port.
fn with_port(address: &str, port: u16) -> String {
    if let Ok(mut addr) = address.parse::<SocketAddr>() {
        addr.set_port(port);
        return addr.to_string();
    }
    if let Ok(ip) = address.parse::<IpAddr>() {
        return SocketAddr::new(ip, port).to_string();
    }
    let host = match address.rsplit_once(':') {
        Some((host, tail)) if tail.chars().all(|c| c.is_ascii_digit()) => host,
        _ => address,
    };
    let host = if host.is_empty() { "0.0.0.0" } else { host };
    format!("{host}:{port}")
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// ONNX artifact (default: `models/<variant>.onnx`).
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Preset name, see [`crate::variant::PRESETS`].
    #[serde(default = "default_variant")]
    pub variant: String,
    /// Inference threads for backends that support it (default: all cores).
    #[serde(default)]
    pub intra_threads: Option<usize>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: None,
            variant: default_variant(),
            intra_threads: None,
        }
    }
}

fn default_variant() -> String {
    "xgboost".to_string()
}

/// Fully described variant for models trained outside the presets.
#[derive(Debug, Clone, Deserialize)]
pub struct VariantConfig {
    pub name: String,
    #[serde(flatten)]
    pub table: TableConfig,
    #[serde(default)]
    pub bounds: InputBounds,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TableConfig {
    Ordinal {
        cut: Vec<(String, u32)>,
        color: Vec<(String, u32)>,
        clarity: Vec<(String, u32)>,
        #[serde(default = "yes")]
        derived_features: bool,
    },
    OneHot {
        cut: Vec<String>,
        color: Vec<String>,
        clarity: Vec<String>,
        #[serde(default)]
        derived_features: bool,
        #[serde(default)]
        column_order: ColumnOrder,
    },
}

fn yes() -> bool {
    true
}

impl TableConfig {
    pub fn build(&self) -> Result<EncodingTable> {
        match self {
            Self::Ordinal {
                cut,
                color,
                clarity,
                derived_features,
            } => Ok(EncodingTable::ordinal(
                OrdinalTable::new(Attribute::Cut, cut.iter().cloned())?,
                OrdinalTable::new(Attribute::Color, color.iter().cloned())?,
                OrdinalTable::new(Attribute::Clarity, clarity.iter().cloned())?,
            )
            .with_derived_features(*derived_features)),
            Self::OneHot {
                cut,
                color,
                clarity,
                derived_features,
                column_order,
            } => Ok(EncodingTable::one_hot(
                OneHotTable::new(Attribute::Cut, cut.iter().cloned())?,
                OneHotTable::new(Attribute::Color, color.iter().cloned())?,
                OneHotTable::new(Attribute::Clarity, clarity.iter().cloned())?,
            )
            .with_derived_features(*derived_features)
            .with_column_order(*column_order)),
        }
    }
}

impl Config {
    /// Load from an explicit path, `./dprice.toml`, or defaults, then apply env overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(LOCAL_CONFIG).exists() => Self::from_file(Path::new(LOCAL_CONFIG))?,
            None => Self::default(),
        };
        Ok(config.with_env(|key| std::env::var(key).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        info!(path = %path.display(), "loading config");
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `MODEL_DIR`, `MODEL_PATH`, `MODEL_VARIANT` and `PORT` overrides.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(variant) = lookup("MODEL_VARIANT") {
            self.model.variant = variant;
        }
        if let Some(path) = lookup("MODEL_PATH") {
            self.model.path = Some(PathBuf::from(path));
        } else if let Some(dir) = lookup("MODEL_DIR") {
            self.model.path = Some(Path::new(&dir).join(format!("{}.onnx", self.variant_name())));
        }
        if let Some(port) = lookup("PORT").and_then(|s| s.parse::<u16>().ok()) {
            self.server.address = with_port(&self.server.address, port);
        }
        self
    }

    fn variant_name(&self) -> &str {
        self.variant
            .as_ref()
            .map(|v| v.name.as_str())
            .unwrap_or(self.model.variant.as_str())
    }

    pub fn model_path(&self) -> PathBuf {
        self.model
            .path
            .clone()
            .unwrap_or_else(|| Path::new("models").join(format!("{}.onnx", self.variant_name())))
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.server.address.parse().map_err(|e| {
            PricingError::Configuration(format!("invalid server address '{}': {e}", self.server.address))
        })
    }

    /// Resolve the variant the model artifact was trained against.
    pub fn variant(&self) -> Result<ModelVariant> {
        match &self.variant {
            Some(custom) => Ok(ModelVariant {
                name: custom.name.clone(),
                table: custom.table.build()?,
                bounds: custom.bounds.clone(),
            }),
            None => ModelVariant::by_name(&self.model.variant),
        }
    }
}
