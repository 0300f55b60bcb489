use crate::error::{CoreError, CoreResult};
use crate::tile::TileKind;

/// Read-only access to a rectangular map of classified tiles.
///
/// Out-of-bounds lookups return `None` rather than failing; callers treat
/// that the same as a tile that does not match what they are looking for.
pub trait TileMap {
    /// Number of columns.
    fn width(&self) -> u32;

    /// Number of rows.
    fn height(&self) -> u32;

    /// Classification of the tile at `(x, y)`, or `None` when out of bounds.
    fn tile(&self, x: i32, y: i32) -> Option<TileKind>;

    /// Whether any tile in the square ring of `radius` around `(x, y)`
    /// (excluding the centre) satisfies `pred`.
    fn any_within(&self, x: i32, y: i32, radius: u32, pred: &dyn Fn(TileKind) -> bool) -> bool {
        let r = radius as i32;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx == 0 && dy == 0 {
                    continue;
                }
                if self.tile(x + dx, y + dy).is_some_and(pred) {
                    return true;
                }
            }
        }
        false
    }
}

/// A dense, row-major grid of tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMap {
    width: u32,
    height: u32,
    tiles: Vec<TileKind>,
}

impl GridMap {
    /// Create a grid where every tile has the same kind.
    pub fn filled(width: u32, height: u32, kind: TileKind) -> Self {
        Self {
            width,
            height,
            tiles: vec![kind; width as usize * height as usize],
        }
    }

    /// Build a grid from rows of tile glyphs (see [`TileKind::glyph`]).
    pub fn from_rows(rows: &[&str]) -> CoreResult<Self> {
        let expected = rows.first().map_or(0, |r| r.chars().count());
        let mut tiles = Vec::with_capacity(expected * rows.len());

        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != expected {
                return Err(CoreError::RaggedRow {
                    row,
                    found,
                    expected,
                });
            }
            for (column, glyph) in line.chars().enumerate() {
                let kind = TileKind::from_glyph(glyph).ok_or(CoreError::UnknownGlyph {
                    glyph,
                    row,
                    column,
                })?;
                tiles.push(kind);
            }
        }

        Ok(Self {
            width: expected as u32,
            height: rows.len() as u32,
            tiles,
        })
    }

    /// Overwrite a single tile.
    pub fn set(&mut self, x: i32, y: i32, kind: TileKind) -> CoreResult<()> {
        let idx = self.index(x, y).ok_or(CoreError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })?;
        self.tiles[idx] = kind;
        Ok(())
    }

    /// Count tiles of the given kind.
    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|t| **t == kind).count()
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

impl TileMap for GridMap {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn tile(&self, x: i32, y: i32) -> Option<TileKind> {
        self.index(x, y).map(|i| self.tiles[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn from_rows_reads_glyphs() {
        let map = GridMap::from_rows(&["..^", "~:."]).unwrap();
        assert_eq!(map.width(), 3);
        assert_eq!(map.height(), 2);
        assert_eq!(map.tile(2, 0), Some(TileKind::Mountain));
        assert_eq!(map.tile(0, 1), Some(TileKind::Water));
        assert_eq!(map.tile(1, 1), Some(TileKind::Sand));
    }

    #[test]
    fn out_of_bounds_is_none() {
        let map = GridMap::filled(4, 4, TileKind::Grass);
        assert_eq!(map.tile(-1, 0), None);
        assert_eq!(map.tile(0, 4), None);
        assert_eq!(map.tile(4, 0), None);
        assert_eq!(map.tile(3, 3), Some(TileKind::Grass));
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = GridMap::from_rows(&["...", ".."]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::RaggedRow {
                row: 1,
                found: 2,
                expected: 3
            }
        ));
    }

    #[test]
    fn unknown_glyph_rejected() {
        let err = GridMap::from_rows(&["..?"]).unwrap_err();
        assert!(matches!(err, CoreError::UnknownGlyph { glyph: '?', .. }));
    }

    #[test]
    fn set_and_count() {
        let mut map = GridMap::filled(3, 3, TileKind::Grass);
        map.set(1, 1, TileKind::Lava).unwrap();
        assert_eq!(map.count(TileKind::Lava), 1);
        assert_eq!(map.count(TileKind::Grass), 8);
        assert!(map.set(3, 0, TileKind::Lava).is_err());
    }

    #[test]
    fn any_within_ring() {
        let map = GridMap::from_rows(&[".....", ".....", ".....", ".....", "....^"]).unwrap();
        let is_mountain = |k: TileKind| k == TileKind::Mountain;
        assert!(!map.any_within(2, 2, 1, &is_mountain));
        assert!(map.any_within(2, 2, 2, &is_mountain));
        // Centre tile is excluded.
        assert!(!map.any_within(4, 4, 0, &is_mountain));
    }

    fn glyph_rows() -> impl Strategy<Value = Vec<String>> {
        let glyph = prop::sample::select(TileKind::ALL.map(TileKind::glyph).to_vec());
        (1usize..8, 1usize..8).prop_flat_map(move |(w, h)| {
            prop::collection::vec(
                prop::collection::vec(glyph.clone(), w).prop_map(|g: Vec<char>| g.into_iter().collect::<String>()),
                h,
            )
        })
    }

    proptest! {
        #[test]
        fn any_within_matches_full_scan(
            rows in glyph_rows(),
            x in -2i32..10,
            y in -2i32..10,
            radius in 0u32..3,
            target in prop::sample::select(TileKind::ALL.to_vec()),
        ) {
            let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
            let map = GridMap::from_rows(&refs).unwrap();
            let r = radius as i32;
            let mut expected = false;
            for ty in 0..map.height() as i32 {
                for tx in 0..map.width() as i32 {
                    let ring = (tx - x).abs().max((ty - y).abs());
                    if (1..=r).contains(&ring) && map.tile(tx, ty) == Some(target) {
                        expected = true;
                    }
                }
            }
            prop_assert_eq!(map.any_within(x, y, radius, &|k| k == target), expected);
        }

        #[test]
        fn from_rows_reads_every_glyph(rows in glyph_rows()) {
            let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
            let map = GridMap::from_rows(&refs).unwrap();
            prop_assert_eq!(map.height() as usize, rows.len());
            for (y, row) in rows.iter().enumerate() {
                for (x, glyph) in row.chars().enumerate() {
                    prop_assert_eq!(map.tile(x as i32, y as i32), TileKind::from_glyph(glyph));
                }
            }
        }
    }
}
