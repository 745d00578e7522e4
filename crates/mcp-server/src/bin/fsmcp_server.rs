use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    fsmcp_server::main_entry().await
}
