mod app;
mod cli;
mod config;
mod effects;
mod render;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use clearpath_logging::cp_info;
use log::LevelFilter;

use crate::app::App;
use crate::cli::Cli;
use crate::config::FileConfig;
use crate::effects::EffectRunner;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = FileConfig::load(cli.config.as_deref())?;

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    clearpath_logging::initialize(config.log_destination(), level);
    cp_info!("clearpath {} starting", env!("CARGO_PKG_VERSION"));

    let settings = config.client_settings(cli.base_url);
    let runner = EffectRunner::new(settings).context("starting the client engine")?;
    let app = App::new(runner, cli.command.details());
    app.run(cli.command).context("writing results")
}
