//! A small seeded demo world for `strata simulate`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strata_core::{ComponentValue, EntityTable, GridMap, TileKind};

/// Smallest map the banded layout fits on.
pub const MIN_SIDE: u32 = 8;

const NAMES: [&str; 12] = [
    "Asha", "Borin", "Cael", "Dagny", "Eamon", "Fenna", "Garrick", "Hild", "Ivo", "Juna", "Kestrel",
    "Lio",
];

/// Build a banded map (snow, mountains with lava vents, forest, grassland
/// cut by a river, desert) and a table of creatures.
pub fn generate(
    width: u32,
    height: u32,
    creatures: usize,
    seed: u64,
) -> Result<(GridMap, EntityTable), String> {
    if width < MIN_SIDE || height < MIN_SIDE {
        return Err(format!(
            "map must be at least {MIN_SIDE}x{MIN_SIDE} tiles (got {width}x{height})"
        ));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut map = GridMap::filled(width, height, TileKind::Grass);

    for y in 0..height {
        let band = f64::from(y) / f64::from(height);
        for x in 0..width {
            let kind = match band {
                b if b < 0.12 => TileKind::Snow,
                b if b < 0.25 => {
                    if rng.random_bool(0.08) {
                        TileKind::Lava
                    } else {
                        TileKind::Mountain
                    }
                }
                b if b < 0.45 => {
                    if rng.random_bool(0.4) {
                        TileKind::Forest
                    } else {
                        TileKind::Grass
                    }
                }
                b if b < 0.7 => {
                    if rng.random_bool(0.25) {
                        TileKind::Dirt
                    } else {
                        TileKind::Grass
                    }
                }
                _ => TileKind::Sand,
            };
            map.set(x as i32, y as i32, kind).map_err(|e| e.to_string())?;
        }
    }

    // A river meanders from the mountains down into the desert.
    let mut river = (width / 3) as i32;
    for y in (height / 4)..height {
        map.set(river, y as i32, TileKind::Water)
            .map_err(|e| e.to_string())?;
        river = (river + rng.random_range(-1..=1)).clamp(1, width as i32 - 2);
    }

    let mut table = EntityTable::new();
    for i in 0..creatures {
        let name = format!("{} {}", NAMES[i % NAMES.len()], i / NAMES.len() + 1);
        let mut components = vec![
            ("creature", ComponentValue::Flag),
            ("name", ComponentValue::Text(name)),
            ("age", ComponentValue::Number(rng.random_range(4.0..70.0_f64).floor())),
        ];
        if rng.random_bool(0.5) {
            components.push(("speech", ComponentValue::Flag));
        }
        table.spawn(components);
    }

    Ok((map, table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{EntityQuery, TileMap};

    #[test]
    fn generate_is_deterministic() {
        let (a, _) = generate(32, 16, 4, 9).unwrap();
        let (b, _) = generate(32, 16, 4, 9).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn generate_has_every_band() {
        let (map, table) = generate(48, 24, 12, 42).unwrap();
        assert_eq!(map.width(), 48);
        for kind in [
            TileKind::Snow,
            TileKind::Mountain,
            TileKind::Grass,
            TileKind::Water,
            TileKind::Sand,
        ] {
            assert!(map.count(kind) > 0, "no {kind} tiles");
        }
        assert_eq!(table.with_tag("creature").len(), 12);
    }

    #[test]
    fn generate_rejects_tiny_maps() {
        assert!(generate(4, 20, 1, 1).is_err());
    }
}
