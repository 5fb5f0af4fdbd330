use comfy_table::{ContentArrangement, Table};
use tj_calendar::solar_time::MINUTES_PER_DEGREE;

use super::Session;

pub fn run(session: &Session) -> Result<(), String> {
    let cities = &session.config.cities;
    if session.json {
        let value = serde_json::to_value(cities).map_err(|e| e.to_string())?;
        return super::print_json(&value);
    }
    if cities.is_empty() {
        println!("  No cities configured.");
        return Ok(());
    }

    let reference = session.config.reference_meridian;
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["City", "Alias", "Longitude", "Offset (min)"]);
    for city in cities.iter() {
        table.add_row(vec![
            city.name.clone(),
            city.alias.clone().unwrap_or_else(|| "—".to_string()),
            format!("{:.2}", city.longitude),
            format!("{:+.1}", (city.longitude - reference) * MINUTES_PER_DEGREE),
        ]);
    }
    println!("{table}");
    println!();
    println!("  {} cities", cities.len());
    Ok(())
}
