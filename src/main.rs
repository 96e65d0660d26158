#[tokio::main]
async fn main() -> anyhow::Result<()> {
    medi_search::run().await
}
