//! Mutable anchor registry keyed by anchor identifier
//!
//! Anchor coordinates are external configuration: the host edits the registry,
//! the fusion core only reads it. Updates overwrite by key.

use std::collections::HashMap;

use crate::core::types::{Anchor, RangeReading, RangedAnchor};

/// Keyed store of known anchor coordinates
#[derive(Debug, Clone, Default)]
pub struct AnchorRegistry {
    anchors: HashMap<String, Anchor>,
}

impl AnchorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the anchor with the same id. Returns the previous
    /// entry if one existed.
    pub fn insert(&mut self, anchor: Anchor) -> Option<Anchor> {
        self.anchors.insert(anchor.id.clone(), anchor)
    }

    pub fn remove(&mut self, id: &str) -> Option<Anchor> {
        self.anchors.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Anchor> {
        self.anchors.get(id)
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Anchor> {
        self.anchors.values()
    }

    /// Join a ranging batch against the registry.
    ///
    /// Readings whose anchor id is unknown are skipped; the solver only
    /// consumes anchors present in both the registry and the current batch.
    /// Output order follows the batch, so a fixed reading order gives a
    /// reproducible solve.
    pub fn resolve(&self, readings: &[RangeReading]) -> Vec<RangedAnchor> {
        readings
            .iter()
            .filter_map(|reading| match self.anchors.get(&reading.anchor_id) {
                Some(anchor) => Some(RangedAnchor {
                    id: anchor.id.clone(),
                    x: anchor.x,
                    y: anchor.y,
                    distance_m: reading.distance_m,
                    stddev_m: reading.stddev_m,
                }),
                None => {
                    log::debug!("dropping range to unknown anchor {}", reading.anchor_id);
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_overwrites_by_id() {
        let mut registry = AnchorRegistry::new();
        registry.insert(Anchor::new("a1", 0.0, 0.0));
        let previous = registry.insert(Anchor::new("a1", 3.0, 4.0));

        assert_eq!(registry.len(), 1);
        assert_eq!(previous.unwrap().x, 0.0);
        assert_eq!(registry.get("a1").unwrap().x, 3.0);
    }

    #[test]
    fn resolve_skips_unknown_anchors_and_keeps_batch_order() {
        let mut registry = AnchorRegistry::new();
        registry.insert(Anchor::new("a1", 0.0, 0.0));
        registry.insert(Anchor::new("a2", 10.0, 0.0));

        let readings = vec![
            RangeReading::new("a2", 6.0, 0.4),
            RangeReading::new("ghost", 1.0, 0.4),
            RangeReading::new("a1", 5.0, 0.3),
        ];

        let resolved = registry.resolve(&readings);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].id, "a2");
        assert_eq!(resolved[1].id, "a1");
        assert_eq!(resolved[1].distance_m, 5.0);
    }
}
