mod argparse;
mod commands;
mod logger;

use argparse::parse_args;

fn main() -> anyhow::Result<()> {
    let cli = parse_args();
    logger::init_logger(cli.verbose);

    commands::handle_command(cli.command)
}
