#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mealsnap_server::start().await
}
