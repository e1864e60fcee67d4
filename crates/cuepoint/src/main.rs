mod app;
mod cli;
mod client;
mod commands;
mod config;
mod error;
mod events;
mod keymap;
mod logging;
mod modes;
mod session;
mod settings;
#[cfg(test)]
mod test_utils;

use clap::Parser;

use crate::cli::Cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    if cli.url || cli.bugreport {
        if cli.url {
            println!("{}", cli::project_url());
        }
        if cli.bugreport {
            println!("{}", cli::bug_report_address());
        }
        return Ok(());
    }

    app::run(cli)?;
    Ok(())
}
