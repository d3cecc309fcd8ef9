use clap::Parser;

mod cli;
mod command;
mod result;

use reqcheck::forge::config::Driver;

use crate::result::Result;

fn initialize_logger(filter: simplelog::LevelFilter) -> Result<()> {
    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("reqcheck")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli_args = cli::Args::parse();

    initialize_logger(cli_args.log_level()?)?;

    let cancel = cli_args.cancel_token();

    match &cli_args.command {
        cli::Command::Github(args) => {
            command::query::execute(args, Driver::Github, &cancel)
        }
        cli::Command::Gitlab(args) => {
            command::query::execute(args, Driver::Gitlab, &cancel)
        }
        cli::Command::Vcpkg(args) => command::vcpkg::execute(args, &cancel),
    }
}
