//! Admission of new records.
//!
//! Each evaluation makes a fixed number of admission attempts. An attempt
//! that fails the capacity check, loses the chance draw, or finds no site
//! is simply lost; nothing is retried beyond the attempt budget.

use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};
use strata_core::{EntityId, EntityQuery, TileKind, TileMap};

use crate::attributes::Attributes;
use crate::context::EvalContext;
use crate::evolution::{tier, walk_bounds};
use crate::registry::{RecordId, Registry, Site};
use crate::spec::{Choice, ComponentFilter, PopulationSpec, SiteRule};

/// Outcome of one admission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// A record was created.
    Admitted {
        /// Its id.
        id: RecordId,
        /// Where it was admitted.
        site: Site,
    },
    /// The population was already at its ceiling.
    AtCapacity,
    /// The chance draw failed.
    Declined,
    /// No acceptable site was found.
    NoSite,
}

/// Gated, probabilistic admission of new records.
#[derive(Debug, Clone)]
pub struct SpawnGate {
    chance: f64,
    ceiling: usize,
    attempts: u8,
}

impl SpawnGate {
    /// Build the gate for a validated spec.
    pub fn from_spec(spec: &PopulationSpec) -> Self {
        Self {
            chance: spec.schedule.spawn_chance,
            ceiling: spec.admission_ceiling(),
            attempts: spec.schedule.attempts,
        }
    }

    /// Attempts made per evaluation.
    pub fn attempts(&self) -> u8 {
        self.attempts
    }

    /// Run one admission attempt.
    pub fn attempt(
        &self,
        spec: &PopulationSpec,
        registry: &mut Registry<Attributes>,
        ctx: &mut EvalContext<'_>,
    ) -> Admission {
        if registry.len() >= self.ceiling {
            return Admission::AtCapacity;
        }
        if !ctx.rng.random_bool(self.chance) {
            return Admission::Declined;
        }
        let Some(site) = resolve_site(&spec.site, ctx.tiles, ctx.entities, registry, ctx.rng)
        else {
            return Admission::NoSite;
        };
        let data = build_attributes(spec, ctx.rng);
        let id = registry.append(ctx.tick, site, data);
        Admission::Admitted { id, site }
    }
}

/// Pick a site for a new record, or `None` if this attempt finds nothing.
pub fn resolve_site(
    rule: &SiteRule,
    tiles: Option<&dyn TileMap>,
    entities: Option<&dyn EntityQuery>,
    registry: &Registry<Attributes>,
    rng: &mut dyn RngCore,
) -> Option<Site> {
    match rule {
        SiteRule::Tile { accepts, margin } => {
            let map = tiles?;
            let (x, y) = sample_coordinate(map, *margin, rng)?;
            let kind = map.tile(x, y)?;
            accepts.contains(&kind).then_some(Site::Tile { x, y })
        }
        SiteRule::Near {
            on,
            near,
            radius,
            margin,
        } => {
            let map = tiles?;
            let (x, y) = sample_coordinate(map, *margin, rng)?;
            let kind = map.tile(x, y)?;
            if !on.is_empty() && !on.contains(&kind) {
                return None;
            }
            let is_near = |k: TileKind| near.contains(&k);
            map.any_within(x, y, *radius, &is_near)
                .then_some(Site::Tile { x, y })
        }
        SiteRule::Creature {
            tags,
            requires,
            exclusive,
        } => {
            let store = entities?;
            let tag_refs: Vec<&str> = tags.iter().map(String::as_str).collect();
            let mut candidates = store.with_tags(&tag_refs);
            // Stores return ids in no particular order; sort so a seeded
            // RNG picks the same creature every run.
            candidates.sort();
            let id = *candidates.choose(rng)?;
            if !requires.iter().all(|f| passes(store, id, f)) {
                return None;
            }
            if *exclusive && registry.is_owned_by(id) {
                return None;
            }
            Some(Site::Creature(id))
        }
    }
}

fn sample_coordinate(map: &dyn TileMap, margin: u32, rng: &mut dyn RngCore) -> Option<(i32, i32)> {
    let (w, h) = (map.width(), map.height());
    let border = margin.checked_mul(2)?;
    if w <= border || h <= border {
        return None;
    }
    let x = rng.random_range(margin..w - margin);
    let y = rng.random_range(margin..h - margin);
    Some((x as i32, y as i32))
}

fn passes(store: &dyn EntityQuery, id: EntityId, filter: &ComponentFilter) -> bool {
    match (store.component(id, &filter.tag), filter.at_least) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(value), Some(min)) => value.as_number().is_some_and(|n| n >= min),
    }
}

/// Draw the initial attributes of a new record.
///
/// Numbers are `base + random() * spread`, clamped into the walk range
/// when the attribute walks. Categories are uniform or skill-tiered.
pub fn build_attributes(spec: &PopulationSpec, rng: &mut dyn RngCore) -> Attributes {
    let mut attrs = Attributes::new();
    for attr in &spec.attributes {
        let mut value = attr.base + rng.random::<f64>() * attr.spread;
        if let Some((low, high)) = walk_bounds(&attr.evolution) {
            value = value.clamp(low, high);
        }
        attrs.set(attr.name.as_str(), value);
    }
    for cat in &spec.categories {
        let label = match &cat.choice {
            Choice::Uniform { options } => options.choose(rng),
            Choice::Tiered {
                by, step, options, ..
            } => {
                let value = attrs.get(by).unwrap_or(0.0);
                options.get(tier(value, *step, options.len()))
            }
        };
        if let Some(label) = label {
            attrs.set_label(cat.name.as_str(), label.as_str());
        }
    }
    attrs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventLog;
    use crate::spec::{AttributeSpec, Evolution, Retention, Schedule};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use strata_core::{ComponentValue, EntityTable, GridMap};

    fn tile_spec(accepts: Vec<TileKind>, chance: f64, max: usize) -> PopulationSpec {
        PopulationSpec::new(
            "dune",
            Schedule::new(1, chance, max),
            SiteRule::Tile { accepts, margin: 0 },
            Retention::window(100),
        )
    }

    fn creature_rule(requires: Vec<ComponentFilter>) -> SiteRule {
        SiteRule::Creature {
            tags: vec!["creature".into()],
            requires,
            exclusive: true,
        }
    }

    #[test]
    fn capacity_checked_before_draw() {
        let map = GridMap::filled(8, 8, TileKind::Sand);
        let spec = tile_spec(vec![TileKind::Sand], 1.0, 1);
        let gate = SpawnGate::from_spec(&spec);
        let mut reg = Registry::new();
        let mut rng = StdRng::seed_from_u64(1);
        let mut events = EventLog::new(0);
        let mut ctx = EvalContext {
            tick: 0,
            dt: 1.0,
            tiles: Some(&map),
            entities: None,
            rng: &mut rng,
            events: &mut events,
        };

        assert!(matches!(
            gate.attempt(&spec, &mut reg, &mut ctx),
            Admission::Admitted { .. }
        ));
        assert_eq!(gate.attempt(&spec, &mut reg, &mut ctx), Admission::AtCapacity);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn zero_chance_never_admits() {
        let map = GridMap::filled(8, 8, TileKind::Sand);
        let spec = tile_spec(vec![TileKind::Sand], 0.0, 10);
        let gate = SpawnGate::from_spec(&spec);
        let mut reg = Registry::new();
        let mut rng = StdRng::seed_from_u64(2);
        let mut events = EventLog::new(0);
        let mut ctx = EvalContext {
            tick: 0,
            dt: 1.0,
            tiles: Some(&map),
            entities: None,
            rng: &mut rng,
            events: &mut events,
        };
        for _ in 0..50 {
            assert_eq!(gate.attempt(&spec, &mut reg, &mut ctx), Admission::Declined);
        }
        assert!(reg.is_empty());
    }

    #[test]
    fn mismatched_tiles_yield_no_site() {
        let map = GridMap::filled(8, 8, TileKind::Water);
        let rule = SiteRule::Tile {
            accepts: vec![TileKind::Sand, TileKind::Grass],
            margin: 1,
        };
        let reg = Registry::new();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            assert_eq!(resolve_site(&rule, Some(&map), None, &reg, &mut rng), None);
        }
    }

    #[test]
    fn missing_collaborators_yield_no_site() {
        let reg = Registry::new();
        let mut rng = StdRng::seed_from_u64(4);
        let tile_rule = SiteRule::Tile {
            accepts: vec![TileKind::Sand],
            margin: 0,
        };
        assert_eq!(resolve_site(&tile_rule, None, None, &reg, &mut rng), None);
        assert_eq!(
            resolve_site(&creature_rule(vec![]), None, None, &reg, &mut rng),
            None
        );
    }

    #[test]
    fn margin_keeps_sites_off_the_edge() {
        let map = GridMap::filled(10, 6, TileKind::Sand);
        let rule = SiteRule::Tile {
            accepts: vec![TileKind::Sand],
            margin: 2,
        };
        let reg = Registry::new();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let Some(Site::Tile { x, y }) = resolve_site(&rule, Some(&map), None, &reg, &mut rng)
            else {
                panic!("expected a tile site");
            };
            assert!((2..8).contains(&x), "x = {x}");
            assert!((2..4).contains(&y), "y = {y}");
        }
    }

    #[test]
    fn margin_larger_than_map_yields_no_site() {
        let map = GridMap::filled(4, 4, TileKind::Sand);
        let rule = SiteRule::Tile {
            accepts: vec![TileKind::Sand],
            margin: 2,
        };
        let reg = Registry::new();
        let mut rng = StdRng::seed_from_u64(6);
        assert_eq!(resolve_site(&rule, Some(&map), None, &reg, &mut rng), None);
    }

    #[test]
    fn overflowing_margin_yields_no_site() {
        let json = r#"{ "kind": "tile", "accepts": ["sand"], "margin": 3000000000 }"#;
        let rule: SiteRule = serde_json::from_str(json).unwrap();
        let near = SiteRule::Near {
            on: vec![],
            near: vec![TileKind::Sand],
            radius: 1,
            margin: u32::MAX,
        };
        let map = GridMap::filled(16, 16, TileKind::Sand);
        let reg = Registry::new();
        let mut rng = StdRng::seed_from_u64(6);
        assert_eq!(resolve_site(&rule, Some(&map), None, &reg, &mut rng), None);
        assert_eq!(resolve_site(&near, Some(&map), None, &reg, &mut rng), None);
    }

    #[test]
    fn near_rule_requires_neighbour() {
        // Only the centre tile has a mountain within one ring.
        let map = GridMap::from_rows(&[".....", ".....", "..^..", ".....", "....."]).unwrap();
        let rule = SiteRule::Near {
            on: vec![TileKind::Grass],
            near: vec![TileKind::Mountain],
            radius: 1,
            margin: 0,
        };
        let reg = Registry::new();
        let mut rng = StdRng::seed_from_u64(7);
        let mut found = 0;
        for _ in 0..500 {
            if let Some(Site::Tile { x, y }) = resolve_site(&rule, Some(&map), None, &reg, &mut rng)
            {
                assert!((x - 2).abs() <= 1 && (y - 2).abs() <= 1);
                assert!(!(x == 2 && y == 2), "the mountain itself is not grass");
                found += 1;
            }
        }
        assert!(found > 0);
    }

    #[test]
    fn creature_filters_apply() {
        let mut table = EntityTable::new();
        let young = table.spawn([
            ("creature", ComponentValue::Flag),
            ("age", ComponentValue::Number(3.0)),
        ]);
        let adult = table.spawn([
            ("creature", ComponentValue::Flag),
            ("age", ComponentValue::Number(30.0)),
        ]);
        let rule = creature_rule(vec![ComponentFilter::at_least("age", 16.0)]);
        let reg = Registry::new();
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..100 {
            match resolve_site(&rule, None, Some(&table), &reg, &mut rng) {
                Some(Site::Creature(id)) => assert_eq!(id, adult),
                Some(other) => panic!("unexpected site {other}"),
                None => {}
            }
        }
        assert!(young < adult);
    }

    #[test]
    fn exclusive_rule_skips_owners() {
        let mut table = EntityTable::new();
        let only = table.spawn([("creature", ComponentValue::Flag)]);
        let mut reg = Registry::new();
        reg.append(0, Site::Creature(only), Attributes::new());
        let mut rng = StdRng::seed_from_u64(9);
        assert_eq!(
            resolve_site(&creature_rule(vec![]), None, Some(&table), &reg, &mut rng),
            None
        );

        let shared = SiteRule::Creature {
            tags: vec!["creature".into()],
            requires: vec![],
            exclusive: false,
        };
        assert_eq!(
            resolve_site(&shared, None, Some(&table), &reg, &mut rng),
            Some(Site::Creature(only))
        );
    }

    #[test]
    fn attributes_drawn_within_spread() {
        let spec = tile_spec(vec![TileKind::Sand], 1.0, 1)
            .with_attribute(AttributeSpec::new("height", 10.0, 5.0))
            .with_attribute(
                AttributeSpec::new("flow", -5.0, 20.0).evolving(Evolution::walk(0.0, 10.0, 0.5, 1.0)),
            );
        let mut rng = StdRng::seed_from_u64(10);
        for _ in 0..200 {
            let attrs = build_attributes(&spec, &mut rng);
            let h = attrs.get("height").unwrap();
            assert!((10.0..15.0).contains(&h), "height = {h}");
            let f = attrs.get("flow").unwrap();
            assert!((0.0..=10.0).contains(&f), "flow = {f}");
        }
    }

    #[test]
    fn tiered_category_follows_skill() {
        let options: Vec<String> = ["clay", "stoneware", "porcelain", "celadon"]
            .into_iter()
            .map(String::from)
            .collect();
        let spec = tile_spec(vec![TileKind::Sand], 1.0, 1)
            .with_attribute(AttributeSpec::new("skill", 60.0, 0.0))
            .with_category(
                "glaze",
                Choice::Tiered {
                    by: "skill".into(),
                    step: 25.0,
                    options,
                    rederive: false,
                },
            );
        let mut rng = StdRng::seed_from_u64(11);
        let attrs = build_attributes(&spec, &mut rng);
        assert_eq!(attrs.label("glaze"), Some("porcelain"));
    }

    #[test]
    fn uniform_category_draws_from_options() {
        let options = vec!["mild".to_string(), "severe".to_string()];
        let spec = tile_spec(vec![TileKind::Sand], 1.0, 1).with_category(
            "severity",
            Choice::Uniform {
                options: options.clone(),
            },
        );
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..20 {
            let attrs = build_attributes(&spec, &mut rng);
            let label = attrs.label("severity").unwrap();
            assert!(options.iter().any(|o| o == label));
        }
    }
}
