use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use tj_divination::{DivinationConfig, NumerologicalCaster, TrigramPair};

use super::Session;

pub fn run(
    session: &Session,
    n1: Option<u64>,
    n2: Option<u64>,
    seed: Option<u64>,
) -> Result<(), String> {
    let moment = session.moment()?;
    let config = match seed {
        Some(seed) => DivinationConfig::default().with_seed(seed),
        None => DivinationConfig::default(),
    };
    let mut rng = config.rng();
    let n1 = config.nonzero_or_random(n1.unwrap_or(0), &mut rng);
    let n2 = config.nonzero_or_random(n2.unwrap_or(0), &mut rng);
    let pair = NumerologicalCaster::new()
        .cast_at(n1, n2, &moment.context)
        .map_err(|e| e.to_string())?;

    if session.json {
        return super::print_json(&serde_json::json!({
            "moment": super::moment_json(&moment),
            "numbers": [n1, n2],
            "time_number": moment.context.hour_branch_index + 1,
            "upper": pair.upper,
            "lower": pair.lower,
            "moving_line": pair.moving_line,
            "main": super::coin::hexagram_json(&pair.main()),
            "mutual": super::coin::hexagram_json(&pair.mutual()),
            "changed": super::coin::hexagram_json(&pair.changed()),
            "body": pair.body(),
            "use": pair.use_(),
            "relation": pair.relation().label(),
        }));
    }

    super::print_moment(&moment);
    println!(
        "  {} {n1}, {n2} (hour {})",
        "Numbers:".bold(),
        moment.context.hour_branch_index + 1
    );
    println!();
    println!("{}", pair_table(&pair));
    println!();
    println!(
        "  {} 体{} 用{}，{}",
        "Body/use:".bold(),
        pair.body(),
        pair.use_(),
        pair.relation().label().yellow()
    );
    Ok(())
}

fn pair_table(pair: &TrigramPair) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["", "本 Main", "互 Mutual", "变 Changed"]);
    let hexagrams = [pair.main(), pair.mutual(), pair.changed()];
    table.add_row(
        std::iter::once("Hexagram".to_string())
            .chain(hexagrams.iter().map(|h| format!("{h} (#{})", h.number())))
            .collect::<Vec<_>>(),
    );
    table.add_row(
        std::iter::once("Upper".to_string())
            .chain(hexagrams.iter().map(|h| h.upper().to_string()))
            .collect::<Vec<_>>(),
    );
    table.add_row(
        std::iter::once("Lower".to_string())
            .chain(hexagrams.iter().map(|h| h.lower().to_string()))
            .collect::<Vec<_>>(),
    );
    table.add_row(vec![
        "Moving line".to_string(),
        pair.moving_line.to_string(),
        String::new(),
        String::new(),
    ]);
    table
}
