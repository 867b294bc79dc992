use anyhow::Result;
use clap::Parser;
use txt2ics::cli::{ConvertArgs, init_logging, run_convert};
use txt2ics::clock::SystemClock;
use txt2ics::config::Config;
use txt2ics::context::StandardContext;
use txt2ics::model::TaskParser;

fn main() -> Result<()> {
    let args = ConvertArgs::parse();

    let ctx = StandardContext::new(args.common.root.clone());
    let mut config = Config::load_or_default(&ctx)?;
    args.apply_to(&mut config);
    init_logging(config.log_level_filter())?;

    run_convert(&TaskParser::new(SystemClock), &config)?;
    Ok(())
}
