// src/main.rs

use rewatch::engine::RunStatus;
use rewatch::{cli, logging, run};

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(status) => std::process::exit(status.exit_code()),
        Err(err) => {
            eprintln!("rewatch error: {err:#}");
            std::process::exit(1);
        }
    }
}

async fn run_main() -> anyhow::Result<RunStatus> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    Ok(run(args).await?)
}
