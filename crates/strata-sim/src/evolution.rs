//! Per-evaluation attribute updates.
//!
//! Every attribute is either exogenous (approach or walk) or a deterministic
//! function of other attributes of the same record. Records never read
//! each other.

use rand::{Rng, RngCore};

use crate::attributes::Attributes;
use crate::spec::{Choice, Evolution, PopulationSpec};

/// Monotonic approach to a ceiling: `min(ceiling, value + step)`.
pub fn approach(value: f64, step: f64, ceiling: f64) -> f64 {
    (value + step).min(ceiling)
}

/// Bounded random walk: `clamp(low, high, value + (draw - bias) * magnitude)`,
/// with `draw` uniform in `[0, 1)`.
pub fn walk(value: f64, draw: f64, low: f64, high: f64, bias: f64, magnitude: f64) -> f64 {
    (value + (draw - bias) * magnitude).clamp(low, high)
}

/// Index into an enumeration of `len` tiers: `floor(value / step)`,
/// capped to the last tier and floored at zero.
pub fn tier(value: f64, step: f64, len: usize) -> usize {
    if len == 0 || value.is_nan() || value <= 0.0 {
        return 0;
    }
    ((value / step).floor() as usize).min(len - 1)
}

/// The `[low, high]` range of a walking attribute.
pub(crate) fn walk_bounds(evolution: &Evolution) -> Option<(f64, f64)> {
    match evolution {
        Evolution::Walk { low, high, .. } => Some((*low, *high)),
        _ => None,
    }
}

/// Advance every attribute of one record by one evaluation.
///
/// Attributes update in declaration order, so a coupled or product rule
/// sees the already-updated values of attributes declared before it.
pub fn evolve(spec: &PopulationSpec, attrs: &mut Attributes, rng: &mut dyn RngCore) {
    for attr in &spec.attributes {
        let current = attrs.get(&attr.name).unwrap_or(attr.base);
        let next = match &attr.evolution {
            Evolution::Fixed => continue,
            Evolution::Approach { step, ceiling } => approach(current, *step, *ceiling),
            Evolution::Walk {
                low,
                high,
                bias,
                magnitude,
            } => walk(current, rng.random(), *low, *high, *bias, *magnitude),
            Evolution::Coupled {
                source,
                rate,
                ceiling,
            } => {
                let driver = attrs.get(source).unwrap_or(0.0);
                approach(current, driver * rate, *ceiling)
            }
            Evolution::Product { factors, scale } => factors
                .iter()
                .map(|f| attrs.get(f).unwrap_or(0.0))
                .fold(*scale, |acc, v| acc * v),
        };
        attrs.set(attr.name.as_str(), next);
    }

    for cat in &spec.categories {
        let Choice::Tiered {
            by,
            step,
            options,
            rederive: true,
        } = &cat.choice
        else {
            continue;
        };
        let earned = tier(attrs.get(by).unwrap_or(0.0), *step, options.len());
        let held = attrs
            .label(&cat.name)
            .and_then(|l| options.iter().position(|o| o == l))
            .unwrap_or(0);
        // Tiers are only ever unlocked, never lost.
        if earned > held {
            attrs.set_label(cat.name.as_str(), options[earned].as_str());
        }
    }
}
