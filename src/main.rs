use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use shardkey::{Router, Value, build_router};
use std::collections::HashMap;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "shardkey")]
#[command(about = "Compute shard ids and LIKE shard ranges for composite keys")]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct RouterArgs {
    /// Router name used in diagnostics
    #[arg(long, default_value = "cli")]
    name: String,
    /// Component hash: md5, xxhash64, or empty for identity
    #[arg(long, default_value = "")]
    hash: String,
    /// JSON array of component boundaries, e.g. "[2,4]"
    #[arg(long)]
    offsets: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the shard id of each complete key
    Map {
        #[command(flatten)]
        router: RouterArgs,
        keys: Vec<String>,
    },
    /// Print the shard range of each LIKE pattern
    Like {
        #[command(flatten)]
        router: RouterArgs,
        patterns: Vec<String>,
    },
    /// Check that KEY maps to the hex shard id ID
    Verify {
        #[command(flatten)]
        router: RouterArgs,
        key: String,
        id: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Command::Map { router, keys } => {
            let router = open_router(&router)?;
            let values: Vec<Value> = keys.iter().map(|k| Value::from(k.as_str())).collect();
            let destinations = router.map(&values).context("mapping keys")?;
            for (key, dest) in keys.iter().zip(destinations) {
                println!("{}\t{}", key, dest);
            }
        }
        Command::Like { router, patterns } => {
            let router = open_router(&router)?;
            let values: Vec<Value> = patterns.iter().map(|p| Value::from(p.as_str())).collect();
            let destinations = router
                .prefix_router()
                .map(&values)
                .context("mapping patterns")?;
            for (pattern, dest) in patterns.iter().zip(destinations) {
                println!("{}\t{}", pattern, dest);
            }
        }
        Command::Verify { router, key, id } => {
            let router = open_router(&router)?;
            let expected = hex::decode(id.strip_prefix("0x").unwrap_or(&id))
                .with_context(|| format!("invalid hex shard id '{}'", id))?;
            let matched = router
                .verify(&[Value::from(key.as_str())], &[expected])
                .context("verifying key")?;
            println!("{}", matched[0]);
        }
    }

    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let level: Level = level
        .parse()
        .map_err(|_| anyhow!("invalid log level '{}'", level))?;
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn open_router(args: &RouterArgs) -> Result<shardkey::ExactRouter> {
    let mut params = HashMap::new();
    params.insert("hash".to_string(), args.hash.clone());
    if let Some(offsets) = &args.offsets {
        params.insert("offsets".to_string(), offsets.clone());
    }
    build_router(&args.name, Some(&params))
        .with_context(|| format!("building router '{}'", args.name))
}
