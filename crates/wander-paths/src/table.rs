//! Dense per-(tile, layer) node storage and path extraction.

use std::sync::Mutex;

use wander_core::{Layer, MapSize, Pos};

use crate::node::{Accessibility, NodeAction, NodeId, PathNode, NO_NODE};

/// The single-actor search result: one [`PathNode`] per (tile, layer) cell,
/// stored in a flat arena so predecessor links are plain indices.
#[derive(Debug)]
pub struct PathTable {
    size: MapSize,
    nodes: Vec<PathNode>,
}

impl PathTable {
    pub fn new(size: MapSize) -> Self {
        Self {
            size,
            nodes: vec![PathNode::default(); size.tile_count() * Layer::COUNT],
        }
    }

    #[inline]
    pub fn size(&self) -> MapSize {
        self.size
    }

    /// Arena index of a cell, or `None` when off-map.
    #[inline]
    pub fn id_of(&self, pos: Pos, layer: Layer) -> Option<NodeId> {
        if self.size.contains(pos) {
            Some(self.size.index_of(pos) * Layer::COUNT + layer.index())
        } else {
            None
        }
    }

    #[inline]
    pub fn by_id(&self, id: NodeId) -> &PathNode {
        &self.nodes[id]
    }

    #[inline]
    pub fn by_id_mut(&mut self, id: NodeId) -> &mut PathNode {
        &mut self.nodes[id]
    }

    pub fn node(&self, pos: Pos, layer: Layer) -> Option<&PathNode> {
        self.id_of(pos, layer).map(|id| &self.nodes[id])
    }

    pub fn node_mut(&mut self, pos: Pos, layer: Layer) -> Option<&mut PathNode> {
        self.id_of(pos, layer).map(move |id| &mut self.nodes[id])
    }

    /// Reinstall a cell for a fresh search pass.
    pub fn reset_cell(&mut self, pos: Pos, layer: Layer, accessible: Accessibility) {
        if let Some(id) = self.id_of(pos, layer) {
            self.nodes[id].reset(pos, layer, accessible);
        }
    }

    /// The node a caller asking "how do I get to this tile" means: the land
    /// node when reached, otherwise the sail node.
    pub fn result_node(&self, pos: Pos) -> Option<&PathNode> {
        let land = self.node(pos, Layer::Land)?;
        if land.base.reachable() {
            Some(land)
        } else {
            self.node(pos, Layer::Sail)
        }
    }

    pub fn is_reachable(&self, pos: Pos) -> bool {
        self.result_node(pos)
            .is_some_and(|node| node.base.reachable())
    }

    /// Turn of arrival at the tile, if reached.
    pub fn turns_to(&self, pos: Pos) -> Option<u8> {
        self.result_node(pos)
            .filter(|node| node.base.reachable())
            .map(|node| node.base.turns)
    }

    /// Reconstructs the chronological path to `pos` by walking predecessor
    /// links, or `None` when the tile was never reached.
    pub fn path_to(&self, pos: Pos) -> Option<Path> {
        let node = self.result_node(pos)?;
        if !node.base.reachable() {
            return None;
        }

        let mut steps = Vec::new();
        let mut cursor = node;
        loop {
            steps.push(PathStep {
                pos: cursor.base.pos,
                layer: cursor.base.layer,
                action: cursor.base.action,
                turns: cursor.base.turns,
                move_remains: cursor.base.move_remains,
            });
            if cursor.prev == NO_NODE {
                break;
            }
            cursor = &self.nodes[cursor.prev];
        }
        steps.reverse();
        Some(Path { steps })
    }

    /// Number of steps to the tile, excluding the start.
    pub fn distance_to(&self, pos: Pos) -> Option<usize> {
        self.path_to(pos).map(|path| path.steps.len() - 1)
    }
}

/// One hop of an extracted path.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathStep {
    pub pos: Pos,
    pub layer: Layer,
    pub action: NodeAction,
    pub turns: u8,
    pub move_remains: u32,
}

/// A chronological path: `steps[0]` is the start tile, the last step the
/// destination.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    pub steps: Vec<PathStep>,
}

impl Path {
    pub fn start(&self) -> &PathStep {
        &self.steps[0]
    }

    pub fn end(&self) -> &PathStep {
        &self.steps[self.steps.len() - 1]
    }

    /// Turn on which the destination is reached.
    pub fn turns(&self) -> u8 {
        self.end().turns
    }
}

/// Shared-read wrapper for a finished [`PathTable`]. Queries take the lock
/// and hand back owned values, so readers on other threads never hold a
/// reference into the table while a recalculation swaps it out.
#[derive(Debug)]
pub struct SyncPaths {
    inner: Mutex<PathTable>,
}

impl SyncPaths {
    pub fn new(table: PathTable) -> Self {
        Self {
            inner: Mutex::new(table),
        }
    }

    fn locked(&self) -> std::sync::MutexGuard<'_, PathTable> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_reachable(&self, pos: Pos) -> bool {
        self.locked().is_reachable(pos)
    }

    pub fn turns_to(&self, pos: Pos) -> Option<u8> {
        self.locked().turns_to(pos)
    }

    pub fn distance_to(&self, pos: Pos) -> Option<usize> {
        self.locked().distance_to(pos)
    }

    pub fn path_to(&self, pos: Pos) -> Option<Path> {
        self.locked().path_to(pos)
    }

    /// Runs a recalculation against the table under the lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut PathTable) -> R) -> R {
        f(&mut self.locked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PathTable {
        let size = MapSize::new(6, 6, 1);
        let mut table = PathTable::new(size);
        for idx in 0..size.tile_count() {
            let pos = size.pos_at(idx);
            table.reset_cell(pos, Layer::Land, Accessibility::Accessible);
        }
        table
    }

    fn commit(table: &mut PathTable, pos: Pos, prev: Option<Pos>, turns: u8, remains: u32) {
        let prev_id = prev.and_then(|p| table.id_of(p, Layer::Land));
        let node = table.node_mut(pos, Layer::Land).unwrap();
        node.base.turns = turns;
        node.base.move_remains = remains;
        node.base.action = NodeAction::Normal;
        node.prev = prev_id.unwrap_or(NO_NODE);
    }

    #[test]
    fn path_extraction_is_chronological() {
        let mut table = table();
        let a = Pos::new(0, 0, 0);
        let b = Pos::new(1, 0, 0);
        let c = Pos::new(2, 1, 0);
        commit(&mut table, a, None, 0, 1000);
        commit(&mut table, b, Some(a), 0, 900);
        commit(&mut table, c, Some(b), 0, 759);

        let path = table.path_to(c).unwrap();
        assert_eq!(
            path.steps.iter().map(|s| s.pos).collect::<Vec<_>>(),
            vec![a, b, c]
        );
        assert_eq!(path.turns(), 0);
        assert_eq!(table.distance_to(c), Some(2));
    }

    #[test]
    fn unreached_tiles_have_no_path() {
        let table = table();
        let far = Pos::new(5, 5, 0);
        assert!(!table.is_reachable(far));
        assert_eq!(table.path_to(far), None);
        assert_eq!(table.turns_to(far), None);
    }

    #[test]
    fn sail_node_answers_when_land_unreached() {
        let size = MapSize::new(4, 4, 1);
        let mut table = PathTable::new(size);
        let pos = Pos::new(2, 2, 0);
        table.reset_cell(pos, Layer::Sail, Accessibility::Accessible);
        let node = table.node_mut(pos, Layer::Sail).unwrap();
        node.base.turns = 1;
        node.base.move_remains = 300;
        assert_eq!(table.turns_to(pos), Some(1));
        assert_eq!(table.result_node(pos).unwrap().base.layer, Layer::Sail);
    }

    #[test]
    fn sync_wrapper_round_trips() {
        let mut inner = table();
        let a = Pos::new(0, 0, 0);
        let b = Pos::new(0, 1, 0);
        commit(&mut inner, a, None, 0, 1000);
        commit(&mut inner, b, Some(a), 0, 900);

        let shared = SyncPaths::new(inner);
        assert!(shared.is_reachable(b));
        assert_eq!(shared.path_to(b).unwrap().steps.len(), 2);
        shared.update(|t| {
            t.reset_cell(b, Layer::Land, Accessibility::Accessible);
        });
        assert!(!shared.is_reachable(b));
    }
}
