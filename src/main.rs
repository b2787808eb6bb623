use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    hopwatch::cli::app::run().await
}
