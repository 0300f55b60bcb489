use std::collections::BTreeMap;
use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use strata_core::{EntityQuery, EntityTable};
use strata_sim::{PopulationEventKind, SimConfig, Simulation, Site};
use tracing::{debug, info};

/// Ticks per year of creature age in the demo world.
const TICKS_PER_YEAR: u64 = 50;

/// Creatures older than this leave the demo world.
const LIFESPAN: f64 = 80.0;

/// Options for `strata simulate`.
pub struct SimulateArgs {
    pub ticks: u64,
    pub seed: u64,
    pub width: u32,
    pub height: u32,
    pub creatures: usize,
    pub catalog: Option<PathBuf>,
    pub populations: Vec<String>,
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    spawned: usize,
    expired: usize,
    depleted: usize,
    evicted: usize,
}

pub fn run(args: &SimulateArgs) -> Result<(), String> {
    let mut catalog = super::load_catalog(args.catalog.as_deref())?;
    if !args.populations.is_empty() {
        catalog = catalog
            .select(&args.populations)
            .map_err(|e| e.to_string())?;
    }

    let (map, table) = super::world::generate(args.width, args.height, args.creatures, args.seed)?;
    let config = SimConfig::default()
        .with_seed(args.seed)
        .with_max_events(5_000);
    let mut sim = Simulation::new(map, table, config);
    sim.add_catalog(&catalog).map_err(|e| e.to_string())?;
    info!(
        target: "strata::cli",
        populations = catalog.len(),
        ticks = args.ticks,
        seed = args.seed,
        "starting simulation"
    );

    let mut totals: BTreeMap<String, Totals> = BTreeMap::new();
    let mut died = 0;
    for _ in 0..args.ticks {
        let evaluations = sim.tick();
        for (population, eval) in sim.populations().iter().zip(&evaluations) {
            let t = totals.entry(population.name().to_string()).or_default();
            t.spawned += eval.spawned.len();
            t.expired += eval.expired();
            t.depleted += eval.depleted();
            t.evicted += eval.evicted();
        }
        if sim.current_tick() % TICKS_PER_YEAR == 0 {
            died += age_creatures(sim.entities_mut())?;
        }
    }

    // Header
    println!(
        "  {} {}",
        "Simulation".bold(),
        format!(
            "({} ticks, seed={}, {}x{} map, {} creatures)",
            args.ticks, args.seed, args.width, args.height, args.creatures
        )
        .dimmed()
    );
    println!(
        "  {} populations, {} events logged",
        sim.populations().len(),
        sim.events().len()
    );
    println!(
        "  {} creatures alive, {} died of old age",
        sim.entities().with_tag("creature").len(),
        died
    );
    println!();

    if args.verbose {
        println!("  {}", "Event Log".bold().underline());
        println!();
        for event in sim.events().events() {
            let tick_label = format!("[tick {:>5}]", event.tick).dimmed();
            let desc = colorize_event(&event.kind, &event.description);
            println!("  {tick_label} {desc}");
        }
        if sim.events().is_empty() {
            println!("  {}", "(no events)".dimmed());
        }
        println!();
    }

    // Population summary
    println!("  {}", "Populations".bold().underline());
    println!();
    let mut summary = Table::new();
    summary.set_content_arrangement(ContentArrangement::Dynamic);
    summary.set_header(vec![
        "Population",
        "Live",
        "Max",
        "Spawned",
        "Expired",
        "Depleted",
        "Evicted",
    ]);
    for population in sim.populations() {
        let t = totals.get(population.name()).copied().unwrap_or_default();
        summary.add_row(vec![
            population.name().to_string(),
            population.len().to_string(),
            population.spec().schedule.max_population.to_string(),
            t.spawned.to_string(),
            t.expired.to_string(),
            t.depleted.to_string(),
            t.evicted.to_string(),
        ]);
    }
    println!("{summary}");
    println!();

    // Live records
    let live: usize = sim.populations().iter().map(|p| p.len()).sum();
    if live == 0 {
        println!("  {}", "No live records.".dimmed());
        return Ok(());
    }
    println!("  {}", "Live Records".bold().underline());
    println!();
    let mut records = Table::new();
    records.set_content_arrangement(ContentArrangement::Dynamic);
    records.set_header(vec!["Population", "Id", "Site", "Age", "Attributes"]);
    let now = sim.current_tick();
    for population in sim.populations() {
        for record in population.records() {
            let site = match record.site {
                Site::Creature(id) if !sim.entities().contains(id) => {
                    format!("{} (gone)", record.site)
                }
                Site::Creature(id) => sim
                    .entities()
                    .component(id, "name")
                    .and_then(|v| v.as_text())
                    .map_or_else(|| record.site.to_string(), str::to_string),
                Site::Tile { .. } => record.site.to_string(),
            };
            records.add_row(vec![
                population.name().to_string(),
                record.id.to_string(),
                site,
                record.age(now).to_string(),
                record.data.to_string(),
            ]);
        }
    }
    println!("{records}");
    println!();

    Ok(())
}

/// Age every creature by one year and remove those past [`LIFESPAN`].
///
/// Records sited on a removed creature stay live; they only hold its id.
fn age_creatures(table: &mut EntityTable) -> Result<usize, String> {
    table.bump_all("age", 1.0);
    let old: Vec<_> = table
        .with_tag("creature")
        .into_iter()
        .filter(|id| {
            table
                .component(*id, "age")
                .and_then(|v| v.as_number())
                .is_some_and(|age| age > LIFESPAN)
        })
        .collect();
    for id in &old {
        table.despawn(*id).map_err(|e| e.to_string())?;
        debug!(target: "strata::cli", creature = %id, "died of old age");
    }
    Ok(old.len())
}

fn colorize_event(kind: &PopulationEventKind, description: &str) -> colored::ColoredString {
    match kind {
        PopulationEventKind::Spawned { .. } => description.green(),
        PopulationEventKind::Expired { .. } => description.dimmed(),
        PopulationEventKind::Depleted { .. } => description.yellow(),
        PopulationEventKind::Evicted { .. } => description.red(),
    }
}
