use std::path::Path;

pub fn run(catalog: Option<&Path>, name: &str) -> Result<(), String> {
    let catalog = super::load_catalog(catalog)?;

    let spec = catalog
        .get(name)
        .ok_or_else(|| format!("population not found: \"{name}\""))?;

    let json = serde_json::to_string_pretty(spec).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}
