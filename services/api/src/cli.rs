use crate::preview::{run_preview, PreviewArgs};
use crate::server;
use car_ledger::error::AppError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Car Ledger",
    about = "Serve and preview public vehicle sale pages built from the maintenance ledger",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Work with sale profiles from the command line
    Sale {
        #[command(subcommand)]
        command: SaleCommand,
    },
}

#[derive(Subcommand, Debug)]
enum SaleCommand {
    /// Render a sale page from a dataset export, ignoring its visibility
    Preview(PreviewArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// JSON dataset to seed the in-memory garage (overrides APP_DATASET_PATH)
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Sale {
            command: SaleCommand::Preview(args),
        } => run_preview(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_arguments_parse() {
        let cli = Cli::try_parse_from([
            "car-ledger-api",
            "sale",
            "preview",
            "--dataset",
            "garage.json",
            "--slug",
            "nd-roadster-2019",
            "--now",
            "2025-06-30",
            "--json",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Sale {
                command: SaleCommand::Preview(args),
            }) => {
                assert_eq!(args.slug, "nd-roadster-2019");
                assert!(args.json);
                assert!(args.now.is_some());
                assert!(args.maintenance_csv.is_none());
            }
            other => panic!("expected sale preview, got {other:?}"),
        }
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["car-ledger-api"]).expect("no arguments parse");
        assert!(cli.command.is_none());
    }
}
