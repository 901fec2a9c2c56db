//! # Khata
//!
//! Entry point for the `khata` binary.
//!
//! ```bash
//! khata sale add --type refill --item "Tokyo 30ml" --amount 1500
//! khata sale add --type coil --item "Mesh 0.4" --quantity 2 --amount 900 \
//!     --credit --name Ali --phone 03001234567
//! khata creditor pay --phone 03001234567 --amount 400
//! khata report --password admin --from 2024-10-01
//! ```

use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use khata_cli::{init_tracing, run, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing();
    info!("Starting Khata POS");

    match run(cli).await {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => {
                println!("{}", text);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            match serde_json::to_string(&err) {
                Ok(text) => eprintln!("{}", text),
                Err(_) => eprintln!("{}", err),
            }
            ExitCode::FAILURE
        }
    }
}
