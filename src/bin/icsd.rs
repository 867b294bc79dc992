use anyhow::Result;
use clap::Parser;
use txt2ics::cli::{ServeArgs, init_logging};
use txt2ics::clock::SystemClock;
use txt2ics::config::Config;
use txt2ics::context::StandardContext;
use txt2ics::model::TaskParser;
use txt2ics::server;

#[tokio::main]
async fn main() -> Result<()> {
    let args = ServeArgs::parse();

    let ctx = StandardContext::new(args.common.root.clone());
    let mut config = Config::load_or_default(&ctx)?;
    args.apply_to(&mut config);
    init_logging(config.log_level_filter())?;

    if config.infile.is_none() {
        log::warn!("No input file given, serving an empty calendar");
    }

    server::serve(&config, TaskParser::new(SystemClock)).await
}
