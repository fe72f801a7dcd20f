use clap::Parser;
use std::process;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use streamfund::{run, status, Cli};

fn main() {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("streamfund=debug,vaultsmith=debug,mockingbird=debug,warn")
  } else {
    EnvFilter::new("streamfund=info,vaultsmith=warn,mockingbird=warn,error")
  };
  tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

  match run(cli) {
    Ok(output) => {
      if !output.is_empty() {
        println!("{}", output.trim_end());
      }
    }
    Err(err) => {
      status::error(&format!("{err:#}"));
      process::exit(1);
    }
  }
}
