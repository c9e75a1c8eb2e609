//! Search-node types shared by both search variants.

use wander_core::{Layer, Pos};

/// Sentinel turn value meaning "never reached". Outside the valid turn
/// range, so it is always distinguishable from "reached on turn 0".
pub const TURN_UNREACHED: u8 = u8::MAX;

/// Arena index of a node inside its table. `NO_NODE` marks a missing
/// predecessor.
pub type NodeId = usize;

/// Absent predecessor link.
pub const NO_NODE: NodeId = usize::MAX;

/// Precomputed static accessibility of a node.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Accessibility {
    /// The node does not exist on this layer (never initialized).
    #[default]
    NotSet,
    /// Can be entered and passed through.
    Accessible,
    /// Can be entered only as the last tile of a path.
    Visitable,
    /// Visitable from a neighbouring tile but not passable.
    BlockVis,
    /// Only reachable on the air layer.
    Flyable,
    /// Cannot be entered or visited at all.
    Blocked,
}

/// What the mover does upon arriving at a node.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeAction {
    #[default]
    None,
    Embark,
    Disembark,
    Normal,
    Battle,
    Visit,
    BlockingVisit,
    TeleportNormal,
    TeleportBlockingVisit,
    TeleportBattle,
}

/// Why a relaxation cannot proceed unassisted. Handed to the strategy's
/// bypass hook, which may still accept the destination.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Blocker {
    /// Leaving a guarded tile that is not the mover's true start.
    SourceGuarded,
    /// The destination is covered by a hostile guard.
    DestinationGuarded,
    /// The destination object forces a stop-and-interact.
    DestinationBlockVis,
    /// The destination is a plain visitable object.
    DestinationVisit,
}

/// The unit of search state: one (position, layer) cell in a node table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseNode {
    pub pos: Pos,
    pub layer: Layer,
    pub accessible: Accessibility,
    pub action: NodeAction,
    /// Movement points remaining after arriving here.
    pub move_remains: u32,
    /// Turn of arrival; 0 is the current turn.
    pub turns: u8,
}

impl BaseNode {
    /// A fresh node for the given cell.
    pub const fn unreached(pos: Pos, layer: Layer, accessible: Accessibility) -> Self {
        Self {
            pos,
            layer,
            accessible,
            action: NodeAction::None,
            move_remains: 0,
            turns: TURN_UNREACHED,
        }
    }

    /// Whether any search pass has committed a way to reach this node.
    #[inline]
    pub const fn reachable(&self) -> bool {
        self.turns < TURN_UNREACHED
    }
}

impl Default for BaseNode {
    fn default() -> Self {
        Self::unreached(Pos::new(-1, -1, -1), Layer::Land, Accessibility::NotSet)
    }
}

/// Single-actor path node: base state plus the settlement lock and the
/// predecessor arena index.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathNode {
    pub base: BaseNode,
    /// Set once the node is popped; locked nodes are never relaxed again.
    pub locked: bool,
    #[cfg_attr(feature = "serde", serde(skip, default = "no_node"))]
    pub prev: NodeId,
}

#[cfg(feature = "serde")]
fn no_node() -> NodeId {
    NO_NODE
}

impl PathNode {
    /// Reinstall defaults for a cell, keeping its identity.
    pub fn reset(&mut self, pos: Pos, layer: Layer, accessible: Accessibility) {
        self.base = BaseNode::unreached(pos, layer, accessible);
        self.locked = false;
        self.prev = NO_NODE;
    }
}

impl Default for PathNode {
    fn default() -> Self {
        Self {
            base: BaseNode::default(),
            locked: false,
            prev: NO_NODE,
        }
    }
}
