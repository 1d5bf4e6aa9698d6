//! Metadata Module Tests
//!
//! ## Test Scopes
//! - **Record helpers**: grouping placements per chunk and counting replicas.
//! - **Store**: empty/missing documents, wholesale overwrite, removal,
//!   concurrent writers and the on-disk format.

#[cfg(test)]
mod tests {
    use crate::metadata::{FileRecord, MetadataStore, PlacementEntry};
    use std::sync::Arc;

    fn entry(chunk: &str, index: u32, node: &str) -> PlacementEntry {
        PlacementEntry {
            chunk: chunk.to_string(),
            index,
            node: node.to_string(),
        }
    }

    fn two_chunk_record() -> FileRecord {
        FileRecord {
            size: 1500,
            chunk_count: 2,
            placements: vec![
                entry("a_chunk0000.txt", 0, "http://n1:9001"),
                entry("a_chunk0001.txt", 1, "http://n2:9002"),
                entry("a_chunk0000.txt", 0, "http://n2:9002"),
            ],
        }
    }

    // ============================================================
    // RECORD HELPERS
    // ============================================================

    #[test]
    fn test_replicas_by_chunk_keeps_recorded_order() {
        let grouped = two_chunk_record().replicas_by_chunk();

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[&0].chunk, "a_chunk0000.txt");
        assert_eq!(grouped[&0].nodes, vec!["http://n1:9001", "http://n2:9002"]);
        assert_eq!(grouped[&1].nodes, vec!["http://n2:9002"]);
    }

    #[test]
    fn test_replica_counts_include_unplaced_chunks() {
        let mut record = two_chunk_record();
        record.chunk_count = 3;

        assert_eq!(record.replica_counts(), vec![2, 1, 0]);
        assert_eq!(record.nodes().len(), 2);
    }

    // ============================================================
    // STORE
    // ============================================================

    #[tokio::test]
    async fn test_missing_document_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = MetadataStore::new(dir.path().join("metadata.json"));

        assert!(store.load().await.unwrap().is_empty());
        assert!(store.list_files().await.unwrap().is_empty());
        assert!(store.get("nothing.txt").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_blank_document_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        std::fs::write(&path, "  \n").unwrap();

        let store = MetadataStore::new(path);
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = MetadataStore::new(path);
        assert!(store.list_files().await.is_err());
    }

    #[tokio::test]
    async fn test_put_overwrites_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let store = MetadataStore::new(dir.path().join("metadata.json"));

        store.put("a.txt", two_chunk_record()).await.unwrap();

        let replacement = FileRecord {
            size: 10,
            chunk_count: 1,
            placements: vec![entry("a_chunk0000.txt", 0, "http://n3:9003")],
        };
        store.put("a.txt", replacement.clone()).await.unwrap();

        assert_eq!(store.get("a.txt").await.unwrap(), Some(replacement));
    }

    #[tokio::test]
    async fn test_remove_returns_record_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = MetadataStore::new(dir.path().join("metadata.json"));

        store.put("a.txt", two_chunk_record()).await.unwrap();
        store.put("b.txt", FileRecord::default()).await.unwrap();

        assert_eq!(store.remove("a.txt").await.unwrap(), Some(two_chunk_record()));
        assert_eq!(store.remove("a.txt").await.unwrap(), None);
        assert_eq!(store.list_files().await.unwrap(), vec!["b.txt"]);
    }

    #[tokio::test]
    async fn test_document_survives_reopen_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("metadata.json");

        {
            let store = MetadataStore::new(&path);
            store.put("a.txt", two_chunk_record()).await.unwrap();
        }

        let reopened = MetadataStore::new(&path);
        assert_eq!(reopened.get("a.txt").await.unwrap(), Some(two_chunk_record()));

        let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("metadata.json")]);
    }

    #[tokio::test]
    async fn test_on_disk_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        let store = MetadataStore::new(&path);
        store.put("a.txt", two_chunk_record()).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["a.txt"]["chunk_count"], 2);
        assert_eq!(raw["a.txt"]["placements"][0]["chunk"], "a_chunk0000.txt");
        assert_eq!(raw["a.txt"]["placements"][0]["index"], 0);
        assert_eq!(raw["a.txt"]["placements"][0]["node"], "http://n1:9001");
    }

    #[tokio::test]
    async fn test_concurrent_puts_do_not_lose_updates() {
        let dir = tempfile::tempdir().unwrap();
        let store = MetadataStore::new(dir.path().join("metadata.json"));

        let mut handles = Vec::new();
        for i in 0..20 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .put(&format!("file-{:02}.bin", i), FileRecord::default())
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.list_files().await.unwrap().len(), 20);
    }
}
