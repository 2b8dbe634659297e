use clap::Parser;
use kvcache::config::Config;
use kvcache::{server, Error};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::parse();

    server::run(config).await
}
