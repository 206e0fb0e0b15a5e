use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;

use crate::core::{BuildingFinancials, BuildingRecord, default_grid, finite_or_zero};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MAX_AXIS_LEN: usize = 200;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid port {0}: must be between 1 and 65535")]
    InvalidPort(u16),

    #[error("invalid listen address {host}:{port}")]
    InvalidAddress { host: String, port: u16 },

    #[error("--max-axis-len must be > 0")]
    ZeroAxisCap,

    #[error("cannot read building file {path}: {source}")]
    BuildingFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("building file {path} is not valid JSON: {source}")]
    BuildingJson {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode scenario matrix: {0}")]
    Encode(serde_json::Error),
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "estates",
    version,
    about = "Financing scenario calculator for rental buildings (rate x loan-to-value grids)"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        value_enum,
        env = "ESTATES_LOG_LEVEL",
        default_value_t = LogLevel::Info,
        help = "Log level; RUST_LOG takes precedence when set"
    )]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP calculator service
    Serve(ServeArgs),
    /// Compute one scenario matrix and print it as JSON
    Matrix(MatrixArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, env = "ESTATES_HOST", default_value = "0.0.0.0")]
    pub host: String,
    #[arg(short, long, env = "ESTATES_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
    #[arg(
        long,
        env = "ESTATES_MAX_AXIS_LEN",
        default_value_t = DEFAULT_MAX_AXIS_LEN,
        help = "Largest accepted number of values on either grid axis"
    )]
    pub max_axis_len: usize,
}

#[derive(Args, Debug, Clone, Default)]
pub struct MatrixArgs {
    #[arg(long, value_name = "FILE", help = "Building record as JSON")]
    pub building: Option<PathBuf>,
    #[arg(long, allow_negative_numbers = true)]
    pub acquisition_cost: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub rental_income: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub total_operating_cost: Option<f64>,
    #[arg(
        long = "interest-rate",
        value_name = "PERCENT",
        help = "Interest rate axis value in percent; repeat for more rows"
    )]
    pub interest_rates: Vec<f64>,
    #[arg(
        long = "loan-to-value",
        value_name = "PERCENT",
        help = "Loan-to-value axis value in percent; repeat for more columns"
    )]
    pub loan_to_value_ratios: Vec<f64>,
    #[arg(long, help = "Print single-line JSON")]
    pub compact: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_axis_len: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            max_axis_len: DEFAULT_MAX_AXIS_LEN,
        }
    }
}

impl ServerConfig {
    pub fn from_args(args: &ServeArgs) -> Result<Self, ConfigError> {
        if args.port == 0 {
            return Err(ConfigError::InvalidPort(args.port));
        }
        if args.max_axis_len == 0 {
            return Err(ConfigError::ZeroAxisCap);
        }
        let config = Self {
            host: args.host.clone(),
            port: args.port,
            max_axis_len: args.max_axis_len,
        };
        config.socket_addr()?;
        Ok(config)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidAddress {
                host: self.host.clone(),
                port: self.port,
            })
    }
}

impl MatrixArgs {
    /// Financials from the optional building file, with explicit flags winning.
    pub fn financials(&self) -> Result<BuildingFinancials, ConfigError> {
        let mut financials = match &self.building {
            Some(path) => load_building(path)?.financials(),
            None => BuildingFinancials::default(),
        };
        if let Some(v) = self.acquisition_cost {
            financials.acquisition_cost = finite_or_zero(v);
        }
        if let Some(v) = self.rental_income {
            financials.rental_income = finite_or_zero(v);
        }
        if let Some(v) = self.total_operating_cost {
            financials.total_operating_cost = finite_or_zero(v);
        }
        Ok(financials)
    }

    /// Requested axes, defaulting each empty one. `nan`/`inf` flag values read as zero.
    pub fn axes(&self) -> (Vec<f64>, Vec<f64>) {
        let defaults = default_grid();
        let pick = |requested: &[f64], fallback: Vec<f64>| {
            if requested.is_empty() {
                fallback
            } else {
                requested.iter().copied().map(finite_or_zero).collect()
            }
        };
        (
            pick(self.interest_rates.as_slice(), defaults.interest_rates),
            pick(self.loan_to_value_ratios.as_slice(), defaults.loan_to_value_ratios),
        )
    }
}

fn load_building(path: &Path) -> Result<BuildingRecord, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::BuildingFile {
        path: path.to_path_buf(),
        source,
    })?;
    let value = serde_json::from_str::<serde_json::Value>(&raw).map_err(|source| {
        ConfigError::BuildingJson {
            path: path.to_path_buf(),
            source,
        }
    })?;
    Ok(BuildingRecord::from_json(&value))
}
