//! Registry Module Tests
//!
//! ## Test Scopes
//! - **Registration**: idempotence and address normalization.
//! - **Health filtering**: live nodes are returned, dead ones are skipped
//!   but stay registered.

#[cfg(test)]
mod tests {
    use crate::node::client::NodeClient;
    use crate::node::service::{NodeService, router};
    use crate::node::store::ChunkStore;
    use crate::registry::NodeRegistry;
    use crate::registry::service::normalize_address;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    fn registry() -> Arc<NodeRegistry> {
        let client = NodeClient::new(Duration::from_secs(5)).unwrap();
        NodeRegistry::new(client, Duration::from_millis(500))
    }

    async fn spawn_node() -> (String, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = ChunkStore::open(dir.path()).await.unwrap();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(NodeService::new(store));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), dir)
    }

    async fn dead_address() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    // ============================================================
    // REGISTRATION
    // ============================================================

    #[test]
    fn test_register_is_idempotent() {
        let registry = registry();

        assert_eq!(registry.register("http://node1:9001"), 1);
        assert_eq!(registry.register("http://node1:9001"), 1);
        assert_eq!(registry.register("http://node1:9001/"), 1, "trailing slash is the same node");
        assert_eq!(registry.register("http://node2:9002"), 2);

        assert_eq!(
            registry.addresses(),
            vec!["http://node1:9001".to_string(), "http://node2:9002".to_string()]
        );
    }

    #[test]
    fn test_empty_registry() {
        let registry = registry();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.addresses().is_empty());
    }

    #[test]
    fn test_normalize_address() {
        assert_eq!(normalize_address(" http://n1:9001/ "), "http://n1:9001");
        assert_eq!(normalize_address("http://n1:9001"), "http://n1:9001");
    }

    // ============================================================
    // HEALTH FILTERING
    // ============================================================

    #[tokio::test]
    async fn test_list_healthy_skips_dead_nodes() {
        let registry = registry();
        let (live, _dir) = spawn_node().await;
        let dead = dead_address().await;

        registry.register(&live);
        registry.register(&dead);

        let healthy = registry.list_healthy().await;
        assert_eq!(healthy, vec![live]);
        assert_eq!(registry.len(), 2, "dead nodes are never evicted");
    }

    #[tokio::test]
    async fn test_list_healthy_on_empty_registry() {
        assert!(registry().list_healthy().await.is_empty());
    }

    #[tokio::test]
    async fn test_list_healthy_returns_all_live_nodes() {
        let registry = registry();
        let (a, _dir_a) = spawn_node().await;
        let (b, _dir_b) = spawn_node().await;
        registry.register(&a);
        registry.register(&b);

        let mut healthy = registry.list_healthy().await;
        healthy.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(healthy, expected);
    }
}
