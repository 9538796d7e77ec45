//! Position evaluation CLI
//!
//! Evaluates FEN positions with the configured UCI engine and prints the
//! ranked best moves, as text or JSON.

use tracing::info;

use engine_client::client::EngineClient;
use engine_client::config::EngineConfig;
use engine_client::report::PositionReport;

/// Parse CLI args: FENs plus optional `--json` and `--depth N`.
fn parse_args() -> (Vec<String>, bool, Option<u32>) {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut fens = Vec::new();
    let mut json = false;
    let mut depth = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--json" => json = true,
            "--depth" => {
                if let Some(value) = args.get(i + 1) {
                    depth = value.parse().ok();
                    i += 1;
                }
            }
            fen => fens.push(fen.to_string()),
        }
        i += 1;
    }
    (fens, json, depth)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Load .env file for local dev
    let _ = dotenvy::dotenv();

    let (fens, json, depth_override) = parse_args();
    if fens.is_empty() {
        eprintln!("usage: engine-eval [--json] [--depth N] <FEN> [<FEN>...]");
        std::process::exit(2);
    }

    let mut config = EngineConfig::load();
    if let Some(depth) = depth_override {
        config.depth = depth;
    }
    info!(
        engine_path = %config.engine_path,
        depth = config.depth,
        multi_pv = config.multi_pv,
        "Engine config loaded"
    );

    let (client, mut process) = EngineClient::spawn(&config).await?;

    for fen in &fens {
        let evaluated = client.evaluate_position(fen).await?;
        if json {
            println!(
                "{}",
                serde_json::to_string_pretty(&PositionReport::from(&evaluated))?
            );
        } else {
            println!("{fen}");
            if evaluated.best_moves.is_empty() {
                println!("  (no moves: position is decided)");
            }
            for (rank, entry) in evaluated.best_moves.iter().enumerate() {
                println!(
                    "  {}. {:6} {:>6}  depth {}",
                    rank + 1,
                    entry.mv.uci(),
                    entry.evaluation.display(),
                    entry.evaluation.depth
                );
            }
        }
    }

    client.quit();
    process.wait().await;

    Ok(())
}
