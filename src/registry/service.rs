use dashmap::DashSet;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;

use crate::node::client::NodeClient;

pub struct NodeRegistry {
    nodes: DashSet<String>,
    client: NodeClient,
    probe_timeout: Duration,
}

impl NodeRegistry {
    pub fn new(client: NodeClient, probe_timeout: Duration) -> Arc<Self> {
        Arc::new(Self {
            nodes: DashSet::new(),
            client,
            probe_timeout,
        })
    }

    /// Adds `address` to the registry and returns the number of known nodes.
    pub fn register(&self, address: &str) -> usize {
        let address = normalize_address(address);
        if self.nodes.insert(address.clone()) {
            tracing::info!("Node registered: {}", address);
        } else {
            tracing::debug!("Node re-registered: {}", address);
        }
        self.nodes.len()
    }

    /// All registered addresses, sorted.
    pub fn addresses(&self) -> Vec<String> {
        let mut addresses: Vec<String> =
            self.nodes.iter().map(|entry| entry.key().clone()).collect();
        addresses.sort();
        addresses
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Probes every registered node concurrently and returns those that
    /// answered within the probe timeout.
    pub async fn list_healthy(&self) -> Vec<String> {
        let addresses = self.addresses();

        let probes = addresses.into_iter().map(|address| async move {
            match self.client.health(&address, self.probe_timeout).await {
                Ok(()) => Some(address),
                Err(e) => {
                    tracing::warn!("Node {} is DOWN: {}", address, e);
                    None
                }
            }
        });

        join_all(probes).await.into_iter().flatten().collect()
    }
}

/// Node identity is the address string, minus any trailing slash.
pub fn normalize_address(address: &str) -> String {
    address.trim().trim_end_matches('/').to_string()
}
