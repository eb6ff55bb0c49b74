use anyhow::Result;
use lawhub::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
