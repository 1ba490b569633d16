use std::net::{IpAddr, SocketAddr};

use clap::Parser;
use qrforge::service::{self, ServiceConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "qrforge", version, about = "QR code generator HTTP server")]
struct Args {
    /// Address to bind
    #[arg(long, env = "QRFORGE_HOST", default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "QRFORGE_PORT", default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args = Args::parse();
    let addr = SocketAddr::new(args.host, args.port);

    service::serve(addr, ServiceConfig::default()).await
}
