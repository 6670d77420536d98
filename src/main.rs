use anyhow::Result;
use woby::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
