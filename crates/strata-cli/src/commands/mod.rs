pub mod presets;
pub mod show;
pub mod simulate;
pub mod world;

use std::path::Path;

use strata_sim::{Catalog, SiteRule};

/// Load a catalog file, or the built-in catalog when no path is given.
fn load_catalog(path: Option<&Path>) -> Result<Catalog, String> {
    let catalog = match path {
        Some(path) => Catalog::from_file(path),
        None => Catalog::builtin(),
    };
    catalog.map_err(|e| e.to_string())
}

/// One-line summary of a site rule for tables.
fn describe_site(rule: &SiteRule) -> String {
    let kinds = |kinds: &[strata_core::TileKind]| {
        kinds
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("/")
    };
    match rule {
        SiteRule::Tile { accepts, .. } => format!("on {}", kinds(accepts)),
        SiteRule::Near {
            on, near, radius, ..
        } => {
            let on = if on.is_empty() {
                "any".to_string()
            } else {
                kinds(on)
            };
            format!("on {on}, {} within {radius}", kinds(near))
        }
        SiteRule::Creature { tags, requires, .. } => {
            let mut parts = vec![tags.join("+")];
            for filter in requires {
                match filter.at_least {
                    Some(min) => parts.push(format!("{}>={min}", filter.tag)),
                    None => parts.push(filter.tag.clone()),
                }
            }
            parts.join(", ")
        }
    }
}
