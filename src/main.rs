use std::process;

use clap::Parser;
use env_logger::Builder;
use log::{debug, LevelFilter};

use oposs_bgp_mon::cli::{run_check, Args};

fn main() {
    let args = Args::parse();

    let (crate_level, other_level) = match args.verbose {
        0 => (LevelFilter::Info, LevelFilter::Warn),
        1 => (LevelFilter::Debug, LevelFilter::Warn),
        2 => (LevelFilter::Trace, LevelFilter::Warn),
        _ => (LevelFilter::Trace, LevelFilter::Trace),
    };
    Builder::new()
        .filter(Some("oposs_bgp_mon"), crate_level)
        .filter(Some("bgp_mon"), crate_level)
        .filter(None, other_level)
        .init();
    debug!("Logging at levels {}/{}", crate_level, other_level);

    let state = run_check(&args);
    process::exit(state.code());
}
