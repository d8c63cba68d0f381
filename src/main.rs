use std::fs::File;
use std::io::{self, BufReader};

use env_logger::Env;
use structopt::StructOpt;

use promkafka::cliopt::CliOpt;
use promkafka::runner::Runner;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opt = CliOpt::from_args();

    env_logger::Builder::from_env(Env::default().default_filter_or(opt.log_level.as_str()))
        .format_timestamp_millis()
        .init();

    let runner = Runner::from_opt(&opt)?;

    let stdout = io::stdout();
    let count = match &opt.input {
        Some(path) => runner.run(BufReader::new(File::open(path)?), stdout.lock())?,
        None => runner.run(io::stdin().lock(), stdout.lock())?,
    };

    log::debug!("Wrote {} record(s)", count);
    Ok(())
}
