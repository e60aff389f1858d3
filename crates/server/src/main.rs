#[tokio::main]
async fn main() -> anyhow::Result<()> {
    learnmap_server::start().await
}
