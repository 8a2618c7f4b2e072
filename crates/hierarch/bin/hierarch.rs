use anyhow::Result;
use clap::Parser;
use hierarch::App;

#[tokio::main]
async fn main() -> Result<()> {
    let app = App::parse();
    app.init_tracing();
    app.run().await
}
