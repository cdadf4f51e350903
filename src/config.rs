use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub leaderboard_path: PathBuf,
    pub upload_dir: PathBuf,
    pub expiry_horizon_days: i32,
    pub leaderboard_limit: usize,
    pub max_upload_mb: usize,
    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            leaderboard_path: PathBuf::from("data/leaderboard.json"),
            upload_dir: PathBuf::from("data/uploads"),
            expiry_horizon_days: 3,
            leaderboard_limit: 10,
            max_upload_mb: 20,
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            leaderboard_path: std::env::var("LEADERBOARD_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.leaderboard_path),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            expiry_horizon_days: std::env::var("EXPIRY_HORIZON_DAYS")
                .ok()
                .and_then(|v| v.parse::<i32>().ok())
                .unwrap_or(defaults.expiry_horizon_days),
            leaderboard_limit: std::env::var("LEADERBOARD_LIMIT")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(defaults.leaderboard_limit),
            max_upload_mb: std::env::var("MAX_UPLOAD_MB")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(defaults.max_upload_mb),
            host: std::env::var("APP_HOST").unwrap_or(defaults.host),
            port: std::env::var("APP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(defaults.port),
        })
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }

    pub fn with_data_dir(dir: &std::path::Path) -> Self {
        Self {
            leaderboard_path: dir.join("leaderboard.json"),
            upload_dir: dir.join("uploads"),
            ..Self::default()
        }
    }
}
