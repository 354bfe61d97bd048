use pokemon_arena::battle::ai::Chooser;
use pokemon_arena::prefab_parties::get_prefab_party;
use pokemon_arena::species::SpeciesCard;
use pokemon_arena::{
    play_series, run_match, BattleResult, GreedyChooser, RandomChooser, Ruleset, SeededRng, Side,
};
use tracing_subscriber::filter::LevelFilter;

const DEFAULT_SEED: u64 = 2024;
const SERIES_LENGTH: u32 = 20;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::INFO)
        .with_target(false)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> BattleResult<()> {
    let seed = std::env::var("ARENA_SEED")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_SEED);
    let ruleset = Ruleset::default();

    let (Some(home), Some(away)) = (get_prefab_party("meadow"), get_prefab_party("volcano")) else {
        eprintln!("Prefab parties are missing");
        return Ok(());
    };
    let p0 = home.definition.build(&ruleset)?;
    let p1 = away.definition.build(&ruleset)?;

    // Example 1: one fully logged match
    println!("=== {} (greedy) vs {} (random), seed {} ===", home.name, away.name, seed);
    for lead in [p0.active(), p1.active()] {
        println!("{}\n", SpeciesCard(lead.species));
    }
    let mut rng = SeededRng::new(seed);
    let mut greedy = GreedyChooser::new();
    let mut random = RandomChooser::new(seed.wrapping_add(1));
    let choosers: [&mut dyn Chooser; 2] = [&mut greedy, &mut random];
    let record = run_match(&p0, &p1, &ruleset, &mut rng, choosers)?;
    for line in record.events.formatted_lines() {
        println!("  {}", line);
    }
    println!(
        "Result: {} after {} turns ({}), {} decisions observed",
        record.report.winner,
        record.report.turn_count,
        record.report.reason,
        record.observations.len()
    );
    println!();

    // Example 2: a short series from the same canonical parties
    rng.reseed(seed);
    let mut greedy = GreedyChooser::new();
    let mut random = RandomChooser::new(seed.wrapping_add(1));
    let choosers: [&mut dyn Chooser; 2] = [&mut greedy, &mut random];
    let tally = play_series(&p0, &p1, &ruleset, &mut rng, choosers, SERIES_LENGTH)?;
    println!("=== Series of {} ===", tally.matches);
    println!(
        "  {}: {:.1}  {}: {:.1}  draws: {}  average turns: {:.1}",
        home.name,
        tally.score(Side::P0),
        away.name,
        tally.score(Side::P1),
        tally.draws,
        tally.average_turns()
    );
    Ok(())
}
