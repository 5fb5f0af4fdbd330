use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::Session;

pub fn run(session: &Session) -> Result<(), String> {
    let moment = session.moment()?;
    if session.json {
        return super::print_json(&super::moment_json(&moment));
    }

    let ctx = &moment.context;
    super::print_moment(&moment);
    println!();

    let pillars = [ctx.year, ctx.month, ctx.day, ctx.hour];
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["", "年 Year", "月 Month", "日 Day", "时 Hour"]);
    table.add_row(
        std::iter::once("Pillar".to_string())
            .chain(pillars.iter().map(ToString::to_string))
            .collect::<Vec<_>>(),
    );
    table.add_row(
        std::iter::once("Stem".to_string())
            .chain(pillars.iter().map(|p| {
                let s = p.stem();
                format!("{} {}{} {}", s, s.polarity().glyph(), s.element(), s.pinyin())
            }))
            .collect::<Vec<_>>(),
    );
    table.add_row(
        std::iter::once("Branch".to_string())
            .chain(pillars.iter().map(|p| {
                let b = p.branch();
                format!("{} {} {}", b, b.element(), b.animal())
            }))
            .collect::<Vec<_>>(),
    );
    println!("{table}");
    println!();

    println!("  {} {}", "Lunar date:".bold(), ctx.lunar_label());
    match &ctx.preceding_solar_term {
        Some(event) => println!("  {} {event}", "Solar term:".bold()),
        None => println!("  {} none", "Solar term:".bold()),
    }
    Ok(())
}
