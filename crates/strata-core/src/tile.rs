use std::fmt;

use serde::{Deserialize, Serialize};

/// Biome classification of a single world tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    /// Open grassland.
    Grass,
    /// Desert or beach sand.
    Sand,
    /// Bare earth.
    Dirt,
    /// Woodland.
    Forest,
    /// Shallow water.
    Water,
    /// Open sea.
    DeepWater,
    /// Rocky highland.
    Mountain,
    /// Snowfield or glacier.
    Snow,
    /// Cooled or molten volcanic rock.
    Lava,
}

impl TileKind {
    /// Every tile kind, in glyph-table order.
    pub const ALL: [TileKind; 9] = [
        Self::Grass,
        Self::Sand,
        Self::Dirt,
        Self::Forest,
        Self::Water,
        Self::DeepWater,
        Self::Mountain,
        Self::Snow,
        Self::Lava,
    ];

    /// Single-character map glyph.
    pub fn glyph(self) -> char {
        match self {
            Self::Grass => '.',
            Self::Sand => ':',
            Self::Dirt => ',',
            Self::Forest => 'f',
            Self::Water => '~',
            Self::DeepWater => 'w',
            Self::Mountain => '^',
            Self::Snow => '*',
            Self::Lava => 'x',
        }
    }

    /// Inverse of [`TileKind::glyph`].
    pub fn from_glyph(glyph: char) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.glyph() == glyph)
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Grass => "grass",
            Self::Sand => "sand",
            Self::Dirt => "dirt",
            Self::Forest => "forest",
            Self::Water => "water",
            Self::DeepWater => "deep_water",
            Self::Mountain => "mountain",
            Self::Snow => "snow",
            Self::Lava => "lava",
        };
        write!(f, "{name}")
    }
}
