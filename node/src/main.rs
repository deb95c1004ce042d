use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use commonware_utils::hex;
use lrps_execution::Memory;
use lrps_node::{driver::parse_log, Config, Driver};
use std::io::Read as _;
use tracing::info;

fn main() {
    if let Err(err) = main_result() {
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}

fn main_result() -> Result<()> {
    // Parse arguments
    let matches = Command::new("lrps-node")
        .about("Replay a limited rock/paper/scissor transaction log.")
        .arg(Arg::new("config").long("config").required(false))
        .arg(
            Arg::new("transactions")
                .long("transactions")
                .help("Transaction log, one per line (blank line ends a block, `-` reads stdin)"),
        )
        .arg(
            Arg::new("query")
                .long("query")
                .help("Member ID to look up after the replay")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("prove")
                .long("prove")
                .help("Request proofs for queries")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Validate config and exit without replaying")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    // Load config
    let config: Config = match matches.get_one::<String>("config") {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Could not read config file {path}"))?;
            serde_yaml::from_str(&contents).context("Could not parse config file")?
        }
        None => Config::default(),
    };
    if matches.get_flag("dry-run") {
        println!("{config:#?}");
        config.validate()?;
        println!("config ok");
        return Ok(());
    }
    let config = config.validate()?;

    // Configure logging
    let subscriber = tracing_subscriber::fmt().with_max_level(config.log_level);
    if config.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
    info!(?config, "loaded config");

    // Load transactions
    let path = matches
        .get_one::<String>("transactions")
        .context("missing --transactions")?;
    let log = if path == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("Could not read transactions from stdin")?;
        buf
    } else {
        std::fs::read(path).with_context(|| format!("Could not read transactions file {path}"))?
    };

    // Replay
    let mut driver = Driver::new(Memory::default(), &config)?;
    let summary = driver.run(parse_log(&log))?;
    let snapshot = driver.application().snapshot();
    println!(
        "height={} size={} app_hash={} accepted={} rejected={}",
        snapshot.height,
        snapshot.entry_count,
        hex(&snapshot.app_hash),
        summary.accepted,
        summary.rejected
    );

    // Answer queries
    let prove = matches.get_flag("prove");
    for key in matches.get_many::<String>("query").into_iter().flatten() {
        let response = driver.query(key.as_bytes(), prove)?;
        match response.value {
            Some(value) => println!("{key}: {} {}", response.log, hex(&value)),
            None => println!("{key}: {}", response.log),
        }
    }
    Ok(())
}
