//! Replica placement.
//!
//! The orchestrator asks a `PlacementStrategy` where each chunk should go.
//! Uniform random sampling is the default; hashing or capacity-aware
//! policies plug in through the same trait.

use rand::seq::SliceRandom;

pub trait PlacementStrategy: Send + Sync {
    /// Chooses `replicas` distinct nodes out of `healthy` for the chunk named
    /// `chunk`. Callers guarantee `healthy.len() >= replicas`.
    fn select(&self, chunk: &str, healthy: &[String], replicas: usize) -> Vec<String>;

    fn name(&self) -> &'static str;
}

/// Every chunk draws its replicas independently and uniformly at random.
/// Chunks of one file may land on disjoint node sets, and re-uploading a
/// file places its chunks anew.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformRandomPlacement;

impl PlacementStrategy for UniformRandomPlacement {
    fn select(&self, _chunk: &str, healthy: &[String], replicas: usize) -> Vec<String> {
        let mut rng = rand::thread_rng();
        healthy
            .choose_multiple(&mut rng, replicas)
            .cloned()
            .collect()
    }

    fn name(&self) -> &'static str {
        "uniform-random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    fn nodes(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("http://node{}:9001", i)).collect()
    }

    #[test]
    fn test_uniform_selects_distinct_nodes() {
        let healthy = nodes(5);
        for _ in 0..200 {
            let picked = UniformRandomPlacement.select("f_chunk0000", &healthy, 3);
            let distinct: HashSet<_> = picked.iter().collect();
            assert_eq!(picked.len(), 3);
            assert_eq!(distinct.len(), 3);
            assert!(picked.iter().all(|n| healthy.contains(n)));
        }
    }

    #[test]
    fn test_uniform_uses_every_node_when_replicas_equal_nodes() {
        let healthy = nodes(2);
        let mut picked = UniformRandomPlacement.select("f_chunk0000", &healthy, 2);
        picked.sort();
        assert_eq!(picked, healthy);
    }

    #[test]
    fn test_uniform_spreads_load() {
        let healthy = nodes(4);
        let mut counts: HashMap<String, usize> = HashMap::new();

        for _ in 0..2000 {
            for node in UniformRandomPlacement.select("f_chunk0000", &healthy, 1) {
                *counts.entry(node).or_insert(0) += 1;
            }
        }

        // Expected ~500 each; anything this lopsided means the draw is broken.
        assert_eq!(counts.len(), 4);
        assert!(counts.values().all(|&c| c > 300), "counts: {:?}", counts);
    }
}
