use std::path::Path;

use comfy_table::{ContentArrangement, Table};

pub fn run(catalog: Option<&Path>) -> Result<(), String> {
    let catalog = super::load_catalog(catalog)?;

    if catalog.is_empty() {
        println!("  No populations found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Name",
        "Site",
        "Every",
        "Chance",
        "Max",
        "Window",
        "Description",
    ]);

    for spec in catalog.iter() {
        let desc = if spec.description.chars().count() > 60 {
            let short: String = spec.description.chars().take(57).collect();
            format!("{short}...")
        } else if spec.description.is_empty() {
            "-".to_string()
        } else {
            spec.description.clone()
        };
        table.add_row(vec![
            spec.name.clone(),
            super::describe_site(&spec.site),
            spec.schedule.check_interval.to_string(),
            format!("{:.2}", spec.schedule.spawn_chance),
            spec.schedule.max_population.to_string(),
            spec.retention.window.to_string(),
            desc,
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} populations", catalog.len());

    Ok(())
}
