use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::{
    feed::{self, Mode, OrderFeed},
    generate::Generator,
    market::{Market, Reports},
};

/// Single-market stock exchange simulator: matches a chronological stream of
/// buy/sell orders under price/time priority and reports trade activity.
#[derive(Parser)]
#[command(name = "market")]
#[command(version, about = "A price/time-priority order matching engine")]
struct Cli {
    /// Narrate every executed trade
    #[arg(short, long)]
    verbose: bool,

    /// Report the running median trade price per stock as time advances
    #[arg(short, long)]
    median: bool,

    /// Summarize every trader's activity at end of day
    #[arg(short = 'i', long)]
    trader_info: bool,

    /// Report the best hindsight trade per stock at end of day
    #[arg(short = 't', long)]
    time_travelers: bool,

    /// Read input from a file instead of stdin
    #[arg(short = 'f', long)]
    input: Option<PathBuf>,
}

fn run<R: BufRead, W: Write>(mut input: R, reports: Reports, out: &mut W) -> anyhow::Result<()> {
    let header = feed::read_header(&mut input)?;
    let mut market = Market::new(header.num_traders, header.num_stocks, reports);

    writeln!(out, "Processing orders...")?;
    match header.mode {
        Mode::TradeList => {
            let orders = OrderFeed::new(input, header.num_traders, header.num_stocks);
            market.process(orders, out)?;
        }
        Mode::PseudoRandom(params) => {
            let orders = Generator::new(params, header.num_traders, header.num_stocks).map(Ok);
            market.process(orders, out)?;
        }
    }
    Ok(())
}

pub fn run_cli() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let reports = Reports {
        verbose: cli.verbose,
        median: cli.median,
        trader_info: cli.trader_info,
        time_travelers: cli.time_travelers,
    };

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    match &cli.input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            run(BufReader::new(file), reports, &mut out)?;
        }
        None => run(io::stdin().lock(), reports, &mut out)?,
    }
    out.flush()?;
    Ok(())
}
