// src/main.rs

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = langbench::cli::parse();
    langbench::logging::init_logging(args.log_level)?;
    langbench::run(args).await
}
