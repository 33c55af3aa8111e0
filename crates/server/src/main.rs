#[tokio::main]
async fn main() -> anyhow::Result<()> {
    funr_server::start().await
}
