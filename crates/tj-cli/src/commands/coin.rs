use colored::Colorize;
use tj_divination::{CoinHexagramCaster, DivinationConfig, Hexagram};

use super::Session;

pub fn run(session: &Session, seed: Option<u64>) -> Result<(), String> {
    let moment = session.moment()?;
    let config = match seed {
        Some(seed) => DivinationConfig::default().with_seed(seed),
        None => DivinationConfig::default(),
    };
    let hexagram = CoinHexagramCaster::new().cast(&mut config.rng());

    if session.json {
        return super::print_json(&serde_json::json!({
            "moment": super::moment_json(&moment),
            "hexagram": hexagram_json(&hexagram),
            "changed": hexagram.changed().map(|c| hexagram_json(&c)),
            "moving_lines": hexagram.moving_lines(),
        }));
    }

    super::print_moment(&moment);
    println!();
    print_hexagram("本卦", &hexagram);
    match hexagram.changed() {
        Some(changed) => {
            println!();
            print_hexagram("变卦", &changed);
            let moving: Vec<String> = hexagram
                .moving_lines()
                .iter()
                .map(ToString::to_string)
                .collect();
            println!();
            println!("  {} {}", "Moving lines:".bold(), moving.join(", "));
        }
        None => {
            println!();
            println!("  {}", "No moving lines.".dimmed());
        }
    }
    Ok(())
}

pub fn hexagram_json(hexagram: &Hexagram) -> serde_json::Value {
    serde_json::json!({
        "number": hexagram.number(),
        "name": hexagram.name(),
        "upper": hexagram.upper(),
        "lower": hexagram.lower(),
        "lines": hexagram.lines(),
    })
}

pub fn print_hexagram(label: &str, hexagram: &Hexagram) {
    println!(
        "  {} {} (#{})",
        label.bold(),
        hexagram.to_string().yellow(),
        hexagram.number()
    );
    for line in hexagram.render().lines() {
        println!("    {line}");
    }
}
