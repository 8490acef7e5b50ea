//! WXS CLI - Command line tool for hourly weather ingestion and statistics.

use clap::Parser;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "wxs-cli",
    version,
    about = "City weather statistics toolkit"
)]
struct Cli {
    #[command(flatten)]
    global: wxs_cmd::GlobalArgs,

    #[command(subcommand)]
    command: wxs_cmd::Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match wxs_cmd::run(&cli.global, &cli.command).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            let code = wxs_cmd::exit_code(&err);
            log::debug!("command failed with exit code {}: {:?}", code, err);
            eprintln!("{}", wxs_cmd::error_body(&err));
            ExitCode::from(code as u8)
        }
    }
}
