use anyhow::Result;
use std::env;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use wealth_tracker::{InvestmentKind, InvestmentTag, WealthConfig, WealthDirectory};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    // Optional: wealth-tracker --config path/to/config.json
    let config = match args.iter().position(|arg| arg == "--config") {
        Some(i) => {
            let path = args
                .get(i + 1)
                .ok_or_else(|| anyhow::anyhow!("--config needs a path"))?;
            WealthConfig::from_file(Path::new(path))?
        }
        None => WealthConfig::default(),
    };

    run_demo(config)
}

/// Scripted session showing the leaderboard react to each transaction
fn run_demo(config: WealthConfig) -> Result<()> {
    println!("Wealth Tracker v{}", wealth_tracker::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let mut directory = WealthDirectory::with_config(config);

    let alice = directory.register_user("Alice")?;
    let bob = directory.register_user("Bob")?;
    let carol = directory.register_user("Carol")?;

    directory.set_asset_value(alice, "gold", 100.0)?;
    directory.record_transaction(alice, "health", "checkup", 20.0, None)?;
    directory.record_transaction(bob, "salary", "monthly pay", 450.0, None)?;
    directory.record_transaction(
        carol,
        "investment",
        "10 shares",
        300.0,
        Some(InvestmentTag::holding(InvestmentKind::Stocks, "AAPL")),
    )?;
    directory.set_asset_value(carol, "AAPL", 360.0)?;
    directory.set_asset_rate(carol, "AAPL", 8.0)?;
    directory.record_transaction(bob, "travel", "flights", 200.0, None)?;

    println!("\nAll users (heap order):");
    for (i, user) in directory.all_users().iter().enumerate() {
        println!("  {}. {:<10} {:>12.2}", i + 1, user.name, user.net_worth);
    }

    if let Some(top) = directory.top_user() {
        println!("\nTop wealthiest: {} ({:.2})", top.name(), top.net_worth());
    }

    println!("\nAlice's tree:");
    for (depth, node) in directory.tree(alice)?.root().walk() {
        println!(
            "  {}{:<14} {:>10.2} ({})",
            "  ".repeat(depth),
            node.name(),
            node.value(),
            node.polarity().as_str()
        );
    }

    let report = directory.portfolio(carol)?;
    println!("\n{}", report.summary());
    for row in &report.rows {
        println!(
            "  {:<8} {:<12} cost {:>10.2}  market {:>10.2}",
            row.kind.as_str(),
            row.name,
            row.cost_basis,
            row.market_value
        );
    }
    println!(
        "Carol in 5 years: {:.2}",
        directory.projected_net_worth(carol, 5)?
    );

    let summary = directory.shutdown();
    println!(
        "\n✓ Freed {} users, {} tree nodes, {} ledger records",
        summary.users, summary.tree_nodes, summary.ledger_records
    );

    Ok(())
}
