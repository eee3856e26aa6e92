use clap::Parser;
use inktrap::cli::{Cli, Commands};
use inktrap::output::Printer;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inktrap=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let printer = Printer::new().quiet(cli.quiet);

    match cli.command {
        Commands::Trap(args) => {
            inktrap::cli::trap::run(args, &printer)?;
        }
        Commands::Palette(args) => {
            inktrap::cli::palette::run(args, &printer)?;
        }
        Commands::Choke(args) => {
            inktrap::cli::choke::run(args, &printer)?;
        }
        Commands::Completions(args) => inktrap::cli::completions::run(args)?,
    }

    Ok(())
}
