//! The [`Layer`] movement-mode dimension.

/// Vertical/movement-mode partition of the grid. A cell may be reachable on
/// several layers at once, each with its own cost and accessibility.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Layer {
    /// Normal ground movement.
    Land = 0,
    /// Moving over water in a boat.
    Sail = 1,
    /// Flying.
    Air = 2,
    /// Walking on the water surface without a boat.
    Water = 3,
}

impl Layer {
    /// Number of layers.
    pub const COUNT: usize = 4;

    /// All layers, in expansion order (land first).
    pub const ALL: [Layer; Layer::COUNT] = [Layer::Land, Layer::Sail, Layer::Air, Layer::Water];

    /// Index into per-layer tables.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_dense() {
        for (i, layer) in Layer::ALL.iter().enumerate() {
            assert_eq!(layer.index(), i);
        }
    }
}
