use expenses::app::run;
use expenses::cli::Cli;

use std::process::ExitCode;

use clap::Parser;
use log::error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(report) => {
            print!("{}", report.output);
            if report.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {}", e.message());
            ExitCode::FAILURE
        }
    }
}
