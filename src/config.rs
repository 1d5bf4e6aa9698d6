//! Process Configuration
//!
//! Runtime settings for the two process roles. The `*Args` structs are the
//! command-line/environment surface parsed by `clap`; they convert into the
//! plain `*Config` structs that the services take, so tests can build a
//! config without going through argument parsing.

use clap::Args;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::chunking::DEFAULT_CHUNK_SIZE;

pub const DEFAULT_REPLICATION_FACTOR: usize = 2;
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_NODE_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 1024 * 1024 * 1024;
pub const DEFAULT_REGISTER_ATTEMPTS: u32 = 5;
pub const DEFAULT_REGISTER_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub bind_addr: SocketAddr,
    pub metadata_path: PathBuf,
    /// Number of nodes each chunk is placed on.
    pub replication_factor: usize,
    pub chunk_size: usize,
    /// Upper bound for a single liveness probe.
    pub probe_timeout: Duration,
    /// Upper bound for a single store/fetch/delete call to a node.
    pub node_timeout: Duration,
    pub max_upload_bytes: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            metadata_path: PathBuf::from("metadata.json"),
            replication_factor: DEFAULT_REPLICATION_FACTOR,
            chunk_size: DEFAULT_CHUNK_SIZE,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            node_timeout: DEFAULT_NODE_TIMEOUT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_addr: SocketAddr,
    /// Base URL other processes use to reach this node.
    pub advertise_url: String,
    pub coordinator_url: String,
    pub storage_dir: PathBuf,
    pub register_attempts: u32,
    pub register_delay: Duration,
}

impl Default for NodeConfig {
    fn default() -> Self {
        let bind_addr = SocketAddr::from(([0, 0, 0, 0], 9001));
        Self {
            advertise_url: default_advertise_url(&bind_addr),
            bind_addr,
            coordinator_url: "http://localhost:8000".to_string(),
            storage_dir: PathBuf::from("storage"),
            register_attempts: DEFAULT_REGISTER_ATTEMPTS,
            register_delay: DEFAULT_REGISTER_DELAY,
        }
    }
}

/// `http://{HOSTNAME}:{port}`, falling back to `localhost` when the
/// environment does not name the host (container setups set it).
pub fn default_advertise_url(bind_addr: &SocketAddr) -> String {
    let host = std::env::var("HOSTNAME")
        .ok()
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "localhost".to_string());
    format!("http://{}:{}", host, bind_addr.port())
}

#[derive(Debug, Args)]
pub struct CoordinatorArgs {
    /// Address the coordinator HTTP API listens on
    #[arg(long, env = "COORDINATOR_BIND", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// JSON document holding file placement metadata
    #[arg(long, env = "METADATA_PATH", default_value = "metadata.json")]
    pub metadata_path: PathBuf,

    /// Number of nodes each chunk is stored on
    #[arg(long, env = "REPLICATION_FACTOR", default_value_t = DEFAULT_REPLICATION_FACTOR)]
    pub replication_factor: usize,

    /// Chunk size in bytes
    #[arg(long, env = "CHUNK_SIZE", default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Timeout for a single node health probe, in milliseconds
    #[arg(long, env = "PROBE_TIMEOUT_MS", default_value_t = 1000)]
    pub probe_timeout_ms: u64,

    /// Timeout for a single chunk store/fetch/delete call, in milliseconds
    #[arg(long, env = "NODE_TIMEOUT_MS", default_value_t = 30_000)]
    pub node_timeout_ms: u64,

    /// Largest accepted upload body, in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,
}

impl From<CoordinatorArgs> for CoordinatorConfig {
    fn from(args: CoordinatorArgs) -> Self {
        Self {
            bind_addr: args.bind,
            metadata_path: args.metadata_path,
            replication_factor: args.replication_factor,
            chunk_size: args.chunk_size,
            probe_timeout: Duration::from_millis(args.probe_timeout_ms),
            node_timeout: Duration::from_millis(args.node_timeout_ms),
            max_upload_bytes: args.max_upload_bytes,
        }
    }
}

#[derive(Debug, Args)]
pub struct NodeArgs {
    /// Address the node HTTP API listens on
    #[arg(long, env = "NODE_BIND", default_value = "0.0.0.0:9001")]
    pub bind: SocketAddr,

    /// URL the coordinator should use to reach this node
    #[arg(long, env = "NODE_URL")]
    pub advertise_url: Option<String>,

    /// Base URL of the coordinator to register with
    #[arg(long, env = "CONTROLLER_URL", default_value = "http://localhost:8000")]
    pub coordinator_url: String,

    /// Directory chunks are stored in
    #[arg(long, env = "STORAGE_PATH", default_value = "storage")]
    pub storage_dir: PathBuf,

    /// How many times to try registering before giving up
    #[arg(long, default_value_t = DEFAULT_REGISTER_ATTEMPTS)]
    pub register_attempts: u32,

    /// Delay between registration attempts, in milliseconds
    #[arg(long, default_value_t = 2000)]
    pub register_delay_ms: u64,
}

impl From<NodeArgs> for NodeConfig {
    fn from(args: NodeArgs) -> Self {
        Self {
            advertise_url: args
                .advertise_url
                .unwrap_or_else(|| default_advertise_url(&args.bind)),
            bind_addr: args.bind,
            coordinator_url: args.coordinator_url,
            storage_dir: args.storage_dir,
            register_attempts: args.register_attempts,
            register_delay: Duration::from_millis(args.register_delay_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinator_args_convert_durations() {
        let args = CoordinatorArgs {
            bind: "127.0.0.1:8100".parse().unwrap(),
            metadata_path: PathBuf::from("/tmp/meta.json"),
            replication_factor: 3,
            chunk_size: 4096,
            probe_timeout_ms: 250,
            node_timeout_ms: 5000,
            max_upload_bytes: 1024,
        };

        let config = CoordinatorConfig::from(args);
        assert_eq!(config.replication_factor, 3);
        assert_eq!(config.chunk_size, 4096);
        assert_eq!(config.probe_timeout, Duration::from_millis(250));
        assert_eq!(config.node_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_node_args_keep_explicit_advertise_url() {
        let args = NodeArgs {
            bind: "0.0.0.0:9003".parse().unwrap(),
            advertise_url: Some("http://node3:9003".to_string()),
            coordinator_url: "http://controller:8000".to_string(),
            storage_dir: PathBuf::from("storage"),
            register_attempts: 2,
            register_delay_ms: 10,
        };

        let config = NodeConfig::from(args);
        assert_eq!(config.advertise_url, "http://node3:9003");
        assert_eq!(config.register_delay, Duration::from_millis(10));
    }

    #[test]
    fn test_default_advertise_url_uses_bind_port() {
        let url = default_advertise_url(&"0.0.0.0:9042".parse().unwrap());
        assert!(url.starts_with("http://"));
        assert!(url.ends_with(":9042"));
    }

    #[test]
    fn test_defaults() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.replication_factor, 2);
        assert_eq!(config.chunk_size, 1024 * 1024);
        assert_eq!(config.probe_timeout, Duration::from_secs(1));
    }
}
