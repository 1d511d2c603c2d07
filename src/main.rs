use anyhow::Result;
use clap::{CommandFactory, Parser};
use runtime_stats::cli::Cli;
use runtime_stats::{generate_report, Target};

fn main() -> Result<()> {
    if std::env::args_os().len() == 1 {
        Cli::command().print_help()?;
        return Ok(());
    }
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let target: Target = match cli.target_name.parse() {
        Ok(target) => target,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    generate_report(&cli.to_request(target.label()))?;
    eprintln!("Done");
    Ok(())
}
