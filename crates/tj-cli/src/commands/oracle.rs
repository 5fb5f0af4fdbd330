use colored::Colorize;
use tj_divination::{OracleResult, OracleSequencer};

use super::Session;

pub fn run(session: &Session, numbers: &[u64]) -> Result<(), String> {
    let sequencer = OracleSequencer::new();
    let (result, moment) = match numbers {
        [] => {
            let moment = session.moment()?;
            let result = sequencer
                .from_context(&moment.context)
                .map_err(|e| e.to_string())?;
            (result, Some(moment))
        }
        [a, b, c] => (
            sequencer.by_numbers(*a, *b, *c).map_err(|e| e.to_string())?,
            None,
        ),
        other => {
            return Err(format!(
                "oracle takes zero or three numbers, got {}",
                other.len()
            ));
        }
    };

    if session.json {
        return super::print_json(&serde_json::json!({
            "moment": moment.as_ref().map(super::moment_json),
            "numbers": numbers,
            "sequence": result.sequence,
            "final_palace": result.final_palace,
            "final_name": result.final_palace.name(),
            "auspicious": result.final_palace.is_auspicious(),
        }));
    }

    if let Some(moment) = &moment {
        super::print_moment(moment);
        println!(
            "  {} {}",
            "Lunar date:".bold(),
            moment.context.lunar_label()
        );
        println!();
    }
    print_result(&result);
    Ok(())
}

fn print_result(result: &OracleResult) {
    println!("  {} {result}", "Path:".bold());
    let palace = result.final_palace;
    let name = if palace.is_auspicious() {
        palace.name().green()
    } else {
        palace.name().red()
    };
    println!("  {} {name}  {}", "Final:".bold(), palace.meaning());
}
