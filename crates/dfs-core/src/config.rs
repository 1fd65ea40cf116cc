//! Configuration — environment variables with hard-coded defaults.
//!
//! None of the three services read a config file; every setting is an
//! environment variable, resolved once at startup, falling back to the
//! defaults below (which match the reference deployment's hard-coded
//! addresses: storage node on :50051, metadata service on :50052,
//! coordinator on :50053).

use std::path::PathBuf;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_port(key: &str, default: u16) -> u16 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Default replication factor — compile-time constant per spec, but kept
/// overridable via `DFS_REPLICATION_FACTOR` for test convenience.
pub const DEFAULT_REPLICATION_FACTOR: usize = 3;

#[derive(Debug, Clone)]
pub struct StorageNodeConfig {
    pub storage_dir: PathBuf,
    pub port: u16,
}

impl StorageNodeConfig {
    pub fn from_env() -> Self {
        Self {
            storage_dir: PathBuf::from(env_or("DFS_STORAGE_DIR", "/tmp/dfs-storage")),
            port: env_port("DFS_STORAGE_PORT", 50051),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetadataServiceConfig {
    pub metadata_dir: PathBuf,
    pub port: u16,
}

impl MetadataServiceConfig {
    pub fn from_env() -> Self {
        Self {
            metadata_dir: PathBuf::from(env_or("DFS_METADATA_DIR", "/tmp/dfs-metadata")),
            port: env_port("DFS_METADATA_PORT", 50052),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub metadata_addr: String,
    pub storage_addrs: Vec<String>,
    pub port: u16,
    pub replication_factor: usize,
}

impl CoordinatorConfig {
    pub fn from_env() -> Self {
        let storage_addrs = env_or("DFS_STORAGE_ADDRS", "127.0.0.1:50051")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let replication_factor = std::env::var("DFS_REPLICATION_FACTOR")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_REPLICATION_FACTOR);

        Self {
            metadata_addr: env_or("DFS_METADATA_ADDR", "127.0.0.1:50052"),
            storage_addrs,
            port: env_port("DFS_COORDINATOR_PORT", 50053),
            replication_factor,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CtlConfig {
    pub coordinator_addr: String,
}

impl CtlConfig {
    pub fn from_env() -> Self {
        Self {
            coordinator_addr: env_or("DFS_COORDINATOR_ADDR", "127.0.0.1:50053"),
        }
    }
}
