//! Universe CLI - inspect seeds, universes and the burn-once session flow
//!
//! Commands:
//!   universe generate   - derive the DNA of a seed
//!   universe draws      - print the raw draw stream of a seed
//!   universe fragments  - print the fragment layout of a seed
//!   universe session    - walk clients through issue / re-issue / burn
//!   universe race       - fire concurrent first requests at one client
//!   universe demo       - run the whole flow end to end

use std::collections::HashSet;
use std::env;
use std::sync::Arc;
use tokio::task::JoinSet;
use universe_core::dna::UniverseDna;
use universe_core::fragments::FragmentLayout;
use universe_core::seed::{Seed, SeededRng};
use universe_core::session::{ClientId, SessionError, SessionManager};
use universe_core::{EngineConfig, SessionResponse};

fn print_usage() {
    println!(
        r#"
╔══════════════════════════════════════════════════════════════╗
║        UNIVERSE v0.1 - one universe per visitor, once        ║
╚══════════════════════════════════════════════════════════════╝

Usage: universe <command> [options]

Commands:
  generate   <seed> [--json]           Derive the DNA of a seed
  draws      <seed> [n] [min max]      Print the first n draws (default 10)
  fragments  <seed>                    Print the fragment layout of a seed
  session    <user-agent>...           Issue, re-issue, burn, re-issue per client
  race       [tasks]                   Concurrent first requests for one client
  demo                                 Run the full flow

Environment:
  UNIVERSE_CONFIG        JSON config file
  UNIVERSE_BURN_POLICY   client | universe
  RUST_LOG               log filter (default: info)

Examples:
  universe generate test --json
  universe draws "" 5
  universe draws test 8 60 160
  UNIVERSE_BURN_POLICY=universe universe session "Mozilla/5.0" "curl/8.5.0"
  universe race 64
"#
    );
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "generate" => cmd_generate(&args[2..]),
        "draws" => cmd_draws(&args[2..]),
        "fragments" => cmd_fragments(&args[2..]),
        "session" => cmd_session(&args[2..]),
        "race" => cmd_race(&args[2..]).await,
        "demo" => cmd_demo().await,
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
        }
    }
}

/// Load config from the environment, falling back to defaults
fn load_config() -> EngineConfig {
    match EngineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("  Config error: {} (using defaults)", e);
            EngineConfig::default()
        }
    }
}

fn print_dna(dna: &UniverseDna) {
    println!("\n  {}", dna.summary());
    println!("  {}", "-".repeat(60));
    let c = &dna.colors;
    println!(
        "  colors     bg={} fg={} accent={} glow={}",
        c.background.to_hex(),
        c.foreground.to_hex(),
        c.accent.to_hex(),
        c.glow.to_hex()
    );
    for (name, value) in c.css_variables() {
        println!("             {}: {}", name, value);
    }
    let g = &dna.geometry;
    println!(
        "  geometry   layout={} shape={} count={} scale={:.3} rough={:.3} metal={:.3} wire={}",
        g.layout, g.shape, g.count, g.scale, g.roughness, g.metalness, g.wireframe
    );
    let p = &dna.physics;
    println!(
        "  physics    speed={:.3} flow={} gravity={:.3}",
        p.speed, p.flow_type, p.gravity
    );
    let fx = &dna.post_processing;
    println!(
        "  post       passes={:?} bloom={:.3} noise={:.3} vignette={:.3} focus={:.3}",
        fx.enabled_passes(),
        fx.bloom_intensity,
        fx.noise_opacity,
        fx.vignette_darkness,
        fx.focus_distance
    );
    let a = &dna.audio;
    println!(
        "  audio      {} @ {:.2}Hz tempo={:.3} detune={:.2}c",
        a.scale_type, a.base_freq, a.tempo, a.detune
    );
    let chord: Vec<String> = a.frequencies(4).iter().map(|f| format!("{:.1}", f)).collect();
    println!("  chord      [{}] Hz", chord.join(", "));
    println!("  digest     {}", dna.digest());
}

fn cmd_generate(args: &[String]) {
    let Some(seed) = args.first() else {
        eprintln!("Usage: universe generate <seed> [--json]");
        return;
    };
    let dna = UniverseDna::from_seed(seed);
    if args.iter().any(|a| a == "--json") {
        match serde_json::to_string_pretty(&dna) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("  Export error: {}", e),
        }
    } else {
        print_dna(&dna);
    }
}

fn cmd_draws(args: &[String]) {
    let Some(seed) = args.first() else {
        eprintln!("Usage: universe draws <seed> [n] [min max]");
        return;
    };
    let n: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(10);
    let bounds: Option<(f64, f64)> = match (args.get(2), args.get(3)) {
        (Some(min), Some(max)) => match (min.parse(), max.parse()) {
            (Ok(min), Ok(max)) => Some((min, max)),
            _ => {
                eprintln!("  Bounds must be numbers: {} {}", min, max);
                return;
            }
        },
        _ => None,
    };

    let mut rng = SeededRng::new(seed);
    println!("\n  Draw stream for {:?} (initial state {:#010x})", seed, rng.state());
    for i in 0..n {
        match bounds {
            Some((min, max)) => println!("  [{:>4}] {:.17}", i, rng.range(min, max)),
            None => {
                let raw = rng.next_u32();
                println!("  [{:>4}] {:>10}  {:.17}", i, raw, f64::from(raw) / 4_294_967_296.0);
            }
        }
    }
}

fn cmd_fragments(args: &[String]) {
    let Some(seed) = args.first() else {
        eprintln!("Usage: universe fragments <seed>");
        return;
    };
    let layout = FragmentLayout::generate(seed);
    println!("\n  {} fragments for {:?}", layout.len(), seed);
    for f in &layout.fragments {
        println!(
            "  [{:>2}] ({:5.1}%, {:5.1}%) rot={:+.2} skew={:+.2} {:.0}px after {:.0}ms  \"{}\"",
            f.id, f.x, f.y, f.rotation, f.skew, f.font_size, f.threshold, f.text
        );
    }
}

fn cmd_session(args: &[String]) {
    if args.is_empty() {
        eprintln!("Usage: universe session <user-agent>...");
        return;
    }
    let mgr = SessionManager::new(load_config());
    println!("\n  Burn policy: {}", mgr.policy().name());

    for ua in args {
        let client = mgr.client_id(ua, "");
        println!("\n  Client {} ({})", client, ua);
        if let Err(e) = walk_session(&mgr, &client) {
            eprintln!("  Session error: {}", e);
        }
    }

    let stats = mgr.stats();
    println!(
        "\n  Sessions: {} | live: {} | burned identifiers: {}",
        stats.sessions, stats.live, stats.burned_identifiers
    );
}

/// Issue, re-issue, burn and issue again for one client
fn walk_session(mgr: &SessionManager, client: &ClientId) -> Result<(), SessionError> {
    let first = mgr.issue(client)?;
    println!("    issue    -> {}", describe(&first));
    let again = mgr.issue(client)?;
    println!(
        "    re-issue -> {} (same seed: {})",
        describe(&again),
        again.seed == first.seed
    );
    mgr.burn(client);
    println!("    burn     -> {:?}", mgr.state(client));
    let after = mgr.issue(client)?;
    println!("    issue    -> {}", describe(&after));
    Ok(())
}

fn describe(resp: &SessionResponse) -> String {
    match (&resp.seed, resp.burned) {
        (_, true) => "burned (void)".to_string(),
        (Some(seed), false) => format!("seed {}", seed),
        (None, false) => "no seed".to_string(),
    }
}

async fn cmd_race(args: &[String]) {
    let tasks: usize = args.first().and_then(|s| s.parse().ok()).unwrap_or(32);
    let mgr = Arc::new(SessionManager::new(load_config()));
    let client = ClientId::from_user_agent("race-condition/1.0");

    let mut set = JoinSet::new();
    for _ in 0..tasks {
        let mgr = mgr.clone();
        let client = client.clone();
        set.spawn(async move { mgr.issue(&client) });
    }

    let mut seeds = HashSet::new();
    while let Some(result) = set.join_next().await {
        match result {
            Ok(Ok(resp)) => {
                if let Some(seed) = resp.seed {
                    seeds.insert(seed);
                }
            }
            Ok(Err(e)) => eprintln!("  Session error: {}", e),
            Err(e) => eprintln!("  Task failed: {}", e),
        }
    }
    println!(
        "\n  {} concurrent requests -> {} distinct seed(s), {} stored session(s)",
        tasks,
        seeds.len(),
        mgr.stats().sessions
    );
}

async fn cmd_demo() {
    println!("\n  === 1. A visitor arrives ===");
    let mgr = Arc::new(SessionManager::new(load_config()));
    let client = mgr.client_id("Mozilla/5.0 (Demo)", "en-US");
    let seed = match mgr.issue(&client) {
        Ok(SessionResponse { seed: Some(seed), .. }) => seed,
        Ok(_) => {
            println!("  Client already burned, nothing to show");
            return;
        }
        Err(e) => {
            eprintln!("  Session error: {}", e);
            return;
        }
    };
    println!("  Issued seed {} to {}", seed, client);

    println!("\n  === 2. Their universe unfolds ===");
    let dna = UniverseDna::from_seed(seed.as_str());
    print_dna(&dna);
    let again = UniverseDna::from_seed(seed.as_str());
    println!(
        "  Re-derived from the same seed: {}",
        if again.digest() == dna.digest() { "identical" } else { "DIVERGED" }
    );
    let layout = FragmentLayout::generate(seed.as_str());
    println!("  {} text fragments placed", layout.len());

    println!("\n  === 3. They leave ===");
    mgr.burn(&client);
    println!("  State after exit: {:?}", mgr.state(&client));

    println!("\n  === 4. They come back ===");
    match mgr.issue(&client) {
        Ok(resp) => println!("  {}", describe(&resp)),
        Err(e) => eprintln!("  Session error: {}", e),
    }

    println!("\n  === 5. The network is down ===");
    let local = Seed::local();
    println!("  Local fallback seed {} (local: {})", local, local.is_local());
    println!("  {}", UniverseDna::from_seed(local.as_str()).summary());

    println!("\n  === 6. Many handlers, one newcomer ===");
    cmd_race(&["16".to_string()]).await;
}
