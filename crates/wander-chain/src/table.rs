//! Dense chain-node storage: a bounded bundle of slots per (tile, layer).

use std::sync::Mutex;

use wander_core::{Layer, MapSize, Pos};
use wander_paths::{Accessibility, BaseNode, NO_NODE, NodeId};

use crate::actor::ChainActors;
use crate::info::{routes_to, ChainRoute};
use crate::mask::{ChainMask, CHAIN_LIMIT};

/// One slot in a chain cell. A slot is claimed by a unique (mask, actor)
/// combination for the lifetime of a search and never freed.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChainNode {
    pub base: BaseNode,
    /// Link to the previous significant node of the chain, or [`NO_NODE`].
    #[cfg_attr(feature = "serde", serde(skip, default = "no_node"))]
    pub prev: NodeId,
    pub mask: ChainMask,
    pub actor: usize,
    /// Fighting strength still carried at this node.
    pub army_value: u64,
    /// Strength already paid to battles along the chain.
    pub army_loss: u64,
    /// Worst danger passed through on the way here.
    pub danger: u64,
}

#[cfg(feature = "serde")]
fn no_node() -> NodeId {
    NO_NODE
}

impl ChainNode {
    fn unreached(pos: Pos, layer: Layer, accessible: Accessibility) -> Self {
        Self {
            base: BaseNode::unreached(pos, layer, accessible),
            prev: NO_NODE,
            mask: ChainMask::default(),
            actor: 0,
            army_value: 0,
            army_loss: 0,
            danger: 0,
        }
    }

    /// A slot is in use once a (mask, actor) pair has claimed it.
    pub fn in_use(&self) -> bool {
        !self.mask.is_empty()
    }
}

/// Chain-node arena: `CHAIN_LIMIT` slots for every (tile, layer) cell of the
/// map. Node ids index straight into the arena.
#[derive(Debug)]
pub struct ChainTable {
    size: MapSize,
    nodes: Vec<ChainNode>,
}

impl ChainTable {
    pub fn new(size: MapSize) -> Self {
        let count = size.tile_count() * Layer::COUNT * CHAIN_LIMIT;
        let filler = ChainNode::unreached(Pos::new(0, 0, 0), Layer::Land, Accessibility::NotSet);
        Self { size, nodes: vec![filler; count] }
    }

    pub fn size(&self) -> MapSize {
        self.size
    }

    fn cell_start(&self, pos: Pos, layer: Layer) -> Option<usize> {
        if !self.size.contains(pos) {
            return None;
        }
        Some((self.size.index_of(pos) * Layer::COUNT + layer.index()) * CHAIN_LIMIT)
    }

    pub fn by_id(&self, id: NodeId) -> &ChainNode {
        &self.nodes[id]
    }

    pub fn by_id_mut(&mut self, id: NodeId) -> &mut ChainNode {
        &mut self.nodes[id]
    }

    /// Re-seeds every slot of a cell for a fresh search.
    pub fn reset_cell(&mut self, pos: Pos, layer: Layer, accessible: Accessibility) {
        if let Some(start) = self.cell_start(pos, layer) {
            for node in &mut self.nodes[start..start + CHAIN_LIMIT] {
                *node = ChainNode::unreached(pos, layer, accessible);
            }
        }
    }

    /// Finds the slot owned by (mask, actor) in the cell, claiming a free one
    /// if the combination is new. Returns `None` when the cell is off-map,
    /// inaccessible, or already saturated by other chains.
    pub fn allocate(
        &mut self,
        pos: Pos,
        layer: Layer,
        mask: ChainMask,
        actor: usize,
    ) -> Option<NodeId> {
        let start = self.cell_start(pos, layer)?;
        for id in start..start + CHAIN_LIMIT {
            let node = &mut self.nodes[id];
            if !node.in_use() {
                if node.base.accessible == Accessibility::NotSet {
                    return None;
                }
                node.mask = mask;
                node.actor = actor;
                return Some(id);
            }
            if node.mask == mask && node.actor == actor {
                return Some(id);
            }
        }
        None
    }

    /// All slots of a cell, paired with their node ids.
    pub fn slots(&self, pos: Pos, layer: Layer) -> &[ChainNode] {
        match self.cell_start(pos, layer) {
            Some(start) => &self.nodes[start..start + CHAIN_LIMIT],
            None => &[],
        }
    }

    pub fn slot_ids(&self, pos: Pos, layer: Layer) -> std::ops::Range<NodeId> {
        match self.cell_start(pos, layer) {
            Some(start) => start..start + CHAIN_LIMIT,
            None => 0..0,
        }
    }

    /// Whether any committed chain reaches the tile, on land or by sea.
    pub fn is_reachable(&self, pos: Pos) -> bool {
        [Layer::Land, Layer::Sail].into_iter().any(|layer| {
            self.slots(pos, layer)
                .iter()
                .any(|node| node.in_use() && node.base.reachable())
        })
    }

    /// Extracts every distinct route reaching `pos` on the land layer.
    pub fn routes(&self, actors: &ChainActors, pos: Pos) -> Vec<ChainRoute> {
        routes_to(self, actors, pos, Layer::Land)
    }
}

/// Shared handle over a [`ChainTable`] for concurrent readers.
#[derive(Debug)]
pub struct SyncChains {
    inner: Mutex<ChainTable>,
}

impl SyncChains {
    pub fn new(table: ChainTable) -> Self {
        Self { inner: Mutex::new(table) }
    }

    fn locked(&self) -> std::sync::MutexGuard<'_, ChainTable> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_reachable(&self, pos: Pos) -> bool {
        self.locked().is_reachable(pos)
    }

    pub fn routes(&self, actors: &ChainActors, pos: Pos) -> Vec<ChainRoute> {
        self.locked().routes(actors, pos)
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut ChainTable) -> R) -> R {
        f(&mut self.locked())
    }
}
