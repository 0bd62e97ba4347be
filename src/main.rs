//
//  sweb: serve a directory over HTTP, with optional uploads and WebDAV.
//
//  Listens on 0.0.0.0:8080 by default, plain http, no ssl.
//  Run `sweb --help` for the options.
//

use clap::Parser;
use log::error;

use sweb::{server, Cli, ServerConfig};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from(Cli::parse());
    config.log_features();

    if let Err(e) = server::prepare(&config) {
        error!("{}", e);
        std::process::exit(1);
    }
    if let Err(e) = server::serve(config).await {
        error!("{}", e);
        std::process::exit(1);
    }
}
