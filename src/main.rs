#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = examly_api::run().await {
        eprintln!("examly-api fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
