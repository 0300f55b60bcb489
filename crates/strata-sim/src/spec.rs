//! Population specs: every concrete population is a value of these types.
//!
//! A [`PopulationSpec`] names the throttle, admission, attribute, and
//! retention rules of one population. Specs deserialize from JSON (see
//! [`crate::catalog`]) and offer `with_*` builders for programmatic use.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strata_core::TileKind;

use crate::error::{SimError, SimResult};

/// Largest ring radius a [`SiteRule::Near`] may scan.
pub const MAX_RADIUS: u32 = 2;

/// Complete description of one population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationSpec {
    /// Unique name, used in events and lookups.
    pub name: String,
    /// Free-form description for listings.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Evaluation throttle and admission budget.
    pub schedule: Schedule,
    /// Where new records may be admitted.
    pub site: SiteRule,
    /// Numeric attributes, evolved in declaration order.
    #[serde(default)]
    pub attributes: Vec<AttributeSpec>,
    /// Categorical attributes.
    #[serde(default)]
    pub categories: Vec<CategorySpec>,
    /// Removal rules.
    pub retention: Retention,
}

/// Evaluation throttle and admission budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Minimum ticks between evaluations.
    pub check_interval: u64,
    /// Per-attempt admission probability.
    pub spawn_chance: f64,
    /// Soft ceiling on live records, checked before each admission.
    pub max_population: usize,
    /// Admission attempts per evaluation (1..=3).
    #[serde(default = "default_attempts")]
    pub attempts: u8,
}

fn default_attempts() -> u8 {
    1
}

/// How a site is found for a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SiteRule {
    /// A random tile whose kind is in `accepts`.
    Tile {
        /// Tile kinds that admit a record.
        accepts: Vec<TileKind>,
        /// Tiles to keep clear of the map edge.
        #[serde(default)]
        margin: u32,
    },
    /// A random tile with a `near` kind somewhere in the ring of `radius`.
    Near {
        /// Kinds the sampled tile itself must have. Empty accepts any kind.
        #[serde(default)]
        on: Vec<TileKind>,
        /// Kinds that must appear within the ring.
        near: Vec<TileKind>,
        /// Ring radius in tiles, `1..=MAX_RADIUS`.
        radius: u32,
        /// Tiles to keep clear of the map edge.
        #[serde(default)]
        margin: u32,
    },
    /// A random entity carrying every tag in `tags`.
    Creature {
        /// Tags the entity must carry to be drawn at all.
        tags: Vec<String>,
        /// Further component checks on the drawn entity.
        #[serde(default)]
        requires: Vec<ComponentFilter>,
        /// Refuse entities that already own a live record here.
        #[serde(default = "default_true")]
        exclusive: bool,
    },
}

fn default_true() -> bool {
    true
}

/// A component check on a drawn entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentFilter {
    /// Tag that must be present.
    pub tag: String,
    /// If set, the tag must hold a number at least this large.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at_least: Option<f64>,
}

impl ComponentFilter {
    /// Require the tag to be present.
    pub fn present(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            at_least: None,
        }
    }

    /// Require the tag to hold a number `>= min` (e.g. a minimum age).
    pub fn at_least(tag: impl Into<String>, min: f64) -> Self {
        Self {
            tag: tag.into(),
            at_least: Some(min),
        }
    }
}

/// A numeric attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeSpec {
    /// Attribute name, unique within the spec.
    pub name: String,
    /// Lowest initial value.
    pub base: f64,
    /// Initial values are drawn uniformly from `base..base + spread`.
    #[serde(default)]
    pub spread: f64,
    /// Per-evaluation update rule.
    #[serde(default)]
    pub evolution: Evolution,
}

impl AttributeSpec {
    /// A fixed attribute drawn from `base + random() * spread`.
    pub fn new(name: impl Into<String>, base: f64, spread: f64) -> Self {
        Self {
            name: name.into(),
            base,
            spread,
            evolution: Evolution::Fixed,
        }
    }

    /// Set the update rule.
    pub fn evolving(mut self, evolution: Evolution) -> Self {
        self.evolution = evolution;
        self
    }
}

/// Per-evaluation update rule of a numeric attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Evolution {
    /// Never changes after creation.
    #[default]
    Fixed,
    /// `min(ceiling, value + step)`.
    Approach {
        /// Increment per evaluation.
        step: f64,
        /// Upper bound.
        ceiling: f64,
    },
    /// `clamp(low, high, value + (random() - bias) * magnitude)`.
    Walk {
        /// Lower bound.
        low: f64,
        /// Upper bound.
        high: f64,
        /// Centre of the draw; below 0.5 drifts up, above drifts down.
        #[serde(default = "default_bias")]
        bias: f64,
        /// Step scale.
        magnitude: f64,
    },
    /// `min(ceiling, value + source * rate)`.
    Coupled {
        /// Attribute driving the growth.
        source: String,
        /// Growth per unit of `source`.
        rate: f64,
        /// Upper bound.
        ceiling: f64,
    },
    /// `scale * product(factors)`, recomputed every evaluation.
    Product {
        /// Attributes multiplied together.
        factors: Vec<String>,
        /// Constant multiplier.
        #[serde(default = "default_scale")]
        scale: f64,
    },
}

fn default_bias() -> f64 {
    0.5
}

fn default_scale() -> f64 {
    1.0
}

impl Evolution {
    /// Shorthand for [`Evolution::Approach`].
    pub fn approach(step: f64, ceiling: f64) -> Self {
        Self::Approach { step, ceiling }
    }

    /// Shorthand for [`Evolution::Walk`].
    pub fn walk(low: f64, high: f64, bias: f64, magnitude: f64) -> Self {
        Self::Walk {
            low,
            high,
            bias,
            magnitude,
        }
    }

    /// Numeric parameters of the rule.
    fn constants(&self) -> Vec<f64> {
        match *self {
            Self::Fixed => Vec::new(),
            Self::Approach { step, ceiling } => vec![step, ceiling],
            Self::Walk {
                low,
                high,
                bias,
                magnitude,
            } => vec![low, high, bias, magnitude],
            Self::Coupled { rate, ceiling, .. } => vec![rate, ceiling],
            Self::Product { scale, .. } => vec![scale],
        }
    }

    /// Attributes this rule reads besides its own.
    fn inputs(&self) -> Vec<&str> {
        match self {
            Self::Coupled { source, .. } => vec![source.as_str()],
            Self::Product { factors, .. } => factors.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

/// A categorical attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpec {
    /// Category name, unique within the spec.
    pub name: String,
    /// How the value is chosen.
    pub choice: Choice,
}

/// How a categorical value is chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Choice {
    /// Uniformly at creation, then fixed.
    Uniform {
        /// The enumeration.
        options: Vec<String>,
    },
    /// `options[floor(by / step)]`, capped at the last option.
    Tiered {
        /// Numeric attribute selecting the tier.
        by: String,
        /// Width of each tier.
        #[serde(default = "default_tier_step")]
        step: f64,
        /// The enumeration, worst to best.
        options: Vec<String>,
        /// Re-derive after each evaluation. Tiers only ever go up.
        #[serde(default)]
        rederive: bool,
    },
}

fn default_tier_step() -> f64 {
    25.0
}

impl Choice {
    /// The enumeration this choice draws from.
    pub fn options(&self) -> &[String] {
        match self {
            Self::Uniform { options } | Self::Tiered { options, .. } => options,
        }
    }
}

/// Removal rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Retention {
    /// Records older than this many ticks are removed.
    pub window: u64,
    /// Optional terminal bound on one attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vitality: Option<Vitality>,
    /// Optional top-K retention by fitness.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eviction: Option<Eviction>,
}

impl Retention {
    /// Age cutoff only.
    pub fn window(window: u64) -> Self {
        Self {
            window,
            vitality: None,
            eviction: None,
        }
    }

    /// Remove records whose `attribute` reaches `bound`.
    pub fn with_vitality(mut self, attribute: impl Into<String>, bound: Bound) -> Self {
        self.vitality = Some(Vitality {
            attribute: attribute.into(),
            bound,
        });
        self
    }

    /// Keep only the fittest `max_population` records, ranked by `fitness`.
    pub fn with_eviction(mut self, fitness: impl Into<String>, headroom: usize) -> Self {
        self.eviction = Some(Eviction {
            fitness: fitness.into(),
            headroom,
        });
        self
    }
}

/// Terminal bound on a designated attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vitality {
    /// The vitality attribute.
    pub attribute: String,
    /// Values satisfying this bound are terminal.
    pub bound: Bound,
}

/// A terminal region of a numeric attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Bound {
    /// `value <= limit`.
    AtMost {
        /// Inclusive limit.
        limit: f64,
    },
    /// `value < limit`.
    Below {
        /// Exclusive limit.
        limit: f64,
    },
    /// `value >= limit`.
    AtLeast {
        /// Inclusive limit.
        limit: f64,
    },
    /// `value > limit`.
    Above {
        /// Exclusive limit.
        limit: f64,
    },
    /// `value <= low || value >= high`.
    Outside {
        /// Inclusive lower limit.
        low: f64,
        /// Inclusive upper limit.
        high: f64,
    },
}

impl Bound {
    /// Whether `value` lies in the terminal region.
    pub fn is_terminal(self, value: f64) -> bool {
        match self {
            Self::AtMost { limit } => value <= limit,
            Self::Below { limit } => value < limit,
            Self::AtLeast { limit } => value >= limit,
            Self::Above { limit } => value > limit,
            Self::Outside { low, high } => value <= low || value >= high,
        }
    }

    fn limits(self) -> [f64; 2] {
        match self {
            Self::AtMost { limit }
            | Self::Below { limit }
            | Self::AtLeast { limit }
            | Self::Above { limit } => [limit, limit],
            Self::Outside { low, high } => [low, high],
        }
    }
}

/// Top-K retention by a fitness attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eviction {
    /// Attribute ranked descending.
    pub fitness: String,
    /// Extra admissions allowed above `max_population` before trimming.
    #[serde(default)]
    pub headroom: usize,
}

impl Schedule {
    /// One admission attempt per evaluation.
    pub fn new(check_interval: u64, spawn_chance: f64, max_population: usize) -> Self {
        Self {
            check_interval,
            spawn_chance,
            max_population,
            attempts: 1,
        }
    }

    /// Set the number of admission attempts per evaluation.
    pub fn with_attempts(mut self, attempts: u8) -> Self {
        self.attempts = attempts;
        self
    }
}

impl PopulationSpec {
    /// Create a spec with no attributes or categories.
    pub fn new(
        name: impl Into<String>,
        schedule: Schedule,
        site: SiteRule,
        retention: Retention,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            schedule,
            site,
            attributes: Vec::new(),
            categories: Vec::new(),
            retention,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a numeric attribute.
    pub fn with_attribute(mut self, attribute: AttributeSpec) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Append a categorical attribute.
    pub fn with_category(mut self, name: impl Into<String>, choice: Choice) -> Self {
        self.categories.push(CategorySpec {
            name: name.into(),
            choice,
        });
        self
    }

    /// Find a numeric attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeSpec> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Most records admission may leave live: `max_population` plus any
    /// eviction headroom, saturating at `usize::MAX`.
    pub fn admission_ceiling(&self) -> usize {
        let headroom = self.retention.eviction.as_ref().map_or(0, |e| e.headroom);
        self.schedule.max_population.saturating_add(headroom)
    }

    /// Check the spec for internal consistency.
    pub fn validate(&self) -> SimResult<()> {
        let name = self.name.as_str();
        if name.trim().is_empty() {
            return Err(SimError::invalid(name, "name must not be empty"));
        }

        let s = &self.schedule;
        if s.check_interval == 0 {
            return Err(SimError::invalid(name, "check_interval must be at least 1"));
        }
        if !(0.0..=1.0).contains(&s.spawn_chance) {
            return Err(SimError::invalid(
                name,
                format!("spawn_chance {} is outside [0, 1]", s.spawn_chance),
            ));
        }
        if s.max_population == 0 {
            return Err(SimError::invalid(name, "max_population must be at least 1"));
        }
        if !(1..=3).contains(&s.attempts) {
            return Err(SimError::invalid(
                name,
                format!("attempts {} is outside 1..=3", s.attempts),
            ));
        }

        self.validate_site()?;

        let mut seen = HashSet::new();
        for attr in &self.attributes {
            if !seen.insert(attr.name.as_str()) {
                return Err(SimError::invalid(
                    name,
                    format!("duplicate attribute '{}'", attr.name),
                ));
            }
            if !attr.base.is_finite() || !attr.spread.is_finite() || attr.spread < 0.0 {
                return Err(SimError::invalid(
                    name,
                    format!("attribute '{}' needs a finite base and non-negative spread", attr.name),
                ));
            }
            if attr.evolution.constants().iter().any(|c| !c.is_finite()) {
                return Err(SimError::invalid(
                    name,
                    format!("attribute '{}' has a non-finite evolution parameter", attr.name),
                ));
            }
            if let Evolution::Walk { low, high, .. } = attr.evolution
                && low > high
            {
                return Err(SimError::invalid(
                    name,
                    format!("attribute '{}' walks over an empty range", attr.name),
                ));
            }
        }
        for attr in &self.attributes {
            for input in attr.evolution.inputs() {
                self.require_attribute(input)?;
            }
        }

        let mut seen = HashSet::new();
        for cat in &self.categories {
            if !seen.insert(cat.name.as_str()) {
                return Err(SimError::invalid(
                    name,
                    format!("duplicate category '{}'", cat.name),
                ));
            }
            if cat.choice.options().is_empty() {
                return Err(SimError::invalid(
                    name,
                    format!("category '{}' has no options", cat.name),
                ));
            }
            if let Choice::Tiered { by, step, .. } = &cat.choice {
                self.require_attribute(by)?;
                if !step.is_finite() || *step <= 0.0 {
                    return Err(SimError::invalid(
                        name,
                        format!("category '{}' needs a finite positive tier step", cat.name),
                    ));
                }
            }
        }

        if let Some(v) = &self.retention.vitality {
            self.require_attribute(&v.attribute)?;
            if v.bound.limits().iter().any(|l| !l.is_finite()) {
                return Err(SimError::invalid(name, "vitality bound must be finite"));
            }
        }
        if let Some(e) = &self.retention.eviction {
            self.require_attribute(&e.fitness)?;
        }
        Ok(())
    }

    fn validate_site(&self) -> SimResult<()> {
        let name = self.name.as_str();
        match &self.site {
            SiteRule::Tile { accepts, .. } if accepts.is_empty() => {
                Err(SimError::invalid(name, "tile rule accepts no tile kinds"))
            }
            SiteRule::Near { near, .. } if near.is_empty() => {
                Err(SimError::invalid(name, "near rule needs at least one kind"))
            }
            SiteRule::Near { radius, .. } if !(1..=MAX_RADIUS).contains(radius) => Err(
                SimError::invalid(name, format!("radius {radius} is outside 1..={MAX_RADIUS}")),
            ),
            SiteRule::Creature { tags, .. } if tags.is_empty() => {
                Err(SimError::invalid(name, "creature rule needs at least one tag"))
            }
            SiteRule::Creature { requires, .. }
                if requires.iter().any(|f| f.at_least.is_some_and(|m| !m.is_finite())) =>
            {
                Err(SimError::invalid(name, "creature requirement must be finite"))
            }
            _ => Ok(()),
        }
    }

    fn require_attribute(&self, attribute: &str) -> SimResult<()> {
        if self.attribute(attribute).is_some() {
            Ok(())
        } else {
            Err(SimError::UnknownAttribute {
                population: self.name.clone(),
                attribute: attribute.to_string(),
            })
        }
    }
}
