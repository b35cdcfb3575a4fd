#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    server::init_tracing();

    #[cfg(feature = "seed")]
    {
        let nootropics = process::connect().await?;
        process::seed_nootropics(&nootropics).await?;
    }

    server::start_server().await?;

    Ok(())
}
