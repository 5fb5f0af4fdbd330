use colored::Colorize;
use tj_divination::{
    CoinHexagramCaster, DivinationConfig, Gender, Method, NumerologicalCaster, OracleSequencer,
    QuerentProfile, ReadingComposer,
};

use super::{Place, Session};

/// What the `prompt` subcommand was asked for.
pub struct PromptRequest<'a> {
    pub method: &'a str,
    pub question: &'a str,
    pub gender: Option<&'a str>,
    pub birth_year: Option<i32>,
    pub pillars: Option<&'a str>,
    pub numbers: Option<&'a [u64]>,
    pub seed: Option<u64>,
}

pub fn run(session: &Session, request: &PromptRequest<'_>) -> Result<(), String> {
    let method = Method::parse(request.method).ok_or_else(|| {
        let known: Vec<&str> = Method::ALL.iter().map(|m| m.key()).collect();
        format!(
            "unknown method '{}' (expected one of: {})",
            request.method,
            known.join(", ")
        )
    })?;
    let gender = match request.gender {
        Some(g) => Gender::parse(g).ok_or_else(|| format!("unknown gender '{g}'"))?,
        None => Gender::Unspecified,
    };
    let (n1, n2) = match request.numbers {
        None => (0, 0),
        Some(&[n1, n2]) if method == Method::Meihua => (n1, n2),
        Some(_) if method == Method::Meihua => {
            return Err("meihua takes exactly two numbers".to_string());
        }
        Some(_) => {
            return Err(format!(
                "--numbers only applies to meihua, not {}",
                method.key()
            ));
        }
    };

    let moment = session.moment()?;
    let mut profile = QuerentProfile::default().with_gender(gender);
    if let Some(year) = request.birth_year {
        profile = profile.with_birth_year(year);
    }
    if let Some(text) = request.pillars {
        let chart = QuerentProfile::parse_pillars(text).map_err(|e| e.to_string())?;
        profile = profile.with_pillars(chart);
    }
    if let Some(lon) = moment.longitude {
        profile = profile.with_longitude(lon);
    }
    let composer = ReadingComposer::new(profile);

    let config = match request.seed {
        Some(seed) => DivinationConfig::default().with_seed(seed),
        None => DivinationConfig::default(),
    };
    let mut rng = config.rng();
    let ctx = &moment.context;
    let user = match method {
        Method::Liuyao => {
            let hexagram = CoinHexagramCaster::new().cast(&mut rng);
            composer.coin_prompt(request.question, &hexagram)
        }
        Method::Meihua => {
            let n1 = config.nonzero_or_random(n1, &mut rng);
            let n2 = config.nonzero_or_random(n2, &mut rng);
            NumerologicalCaster::new()
                .cast_at(n1, n2, ctx)
                .and_then(|pair| composer.meihua_prompt(request.question, &pair))
        }
        Method::Xiaoliuren => OracleSequencer::new()
            .from_context(ctx)
            .and_then(|result| composer.oracle_prompt(request.question, &result)),
        Method::Qimen | Method::Liuren | Method::Taiyi => {
            composer.context_prompt(method, request.question, ctx)
        }
    }
    .map_err(|e| e.to_string())?;
    let system = composer.system_prompt(method, ctx);

    if session.json {
        return super::print_json(&serde_json::json!({
            "method": method,
            "system": system,
            "user": user,
        }));
    }

    if matches!(session.place, Place::Civil) {
        println!(
            "  {}",
            "No longitude given; pillars use the civil clock.".dimmed()
        );
        println!();
    }
    println!("{}", "── system ──".bold());
    println!("{system}");
    println!();
    println!("{}", "── user ──".bold());
    println!("{user}");
    Ok(())
}
