//! Search configuration flags.

/// Feature switches for a search pass. Read once at setup and treated as
/// immutable for the whole pass.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchOptions {
    pub use_flying: bool,
    pub use_water_walking: bool,
    pub use_embark: bool,
    /// Two-way teleport channels.
    pub use_teleport_two_way: bool,
    /// One-way channels with exactly one known exit.
    pub use_teleport_one_way: bool,
    /// One-way channels with several known exits.
    pub use_teleport_one_way_random: bool,
    /// Water vortices; forced off unless the mover carries protection.
    pub use_teleport_vortex: bool,
    /// Friendly castle-gate network.
    pub use_castle_gate: bool,
    /// Only allow the land-to-air transition at the mover's initial
    /// position. Cuts search cost sharply at the price of slightly less
    /// movement-point-efficient flight paths.
    pub lightweight_flying: bool,
    /// Flying and water walking may not span a turn boundary.
    pub one_turn_special_layers: bool,
    /// Compatibility mode reproducing the older engine's movement quirks
    /// (landing rules, guard-evasion by air, battle on guarded visits).
    pub original_movement_rules: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            use_flying: true,
            use_water_walking: true,
            use_embark: true,
            use_teleport_two_way: true,
            use_teleport_one_way: true,
            use_teleport_one_way_random: false,
            use_teleport_vortex: false,
            use_castle_gate: false,
            lightweight_flying: false,
            one_turn_special_layers: true,
            original_movement_rules: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_rules() {
        let opts = SearchOptions::default();
        assert!(opts.use_embark);
        assert!(opts.one_turn_special_layers);
        assert!(opts.original_movement_rules);
        assert!(!opts.use_castle_gate);
    }
}
