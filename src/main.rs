use clap::Parser;
use pktcrafter::config::{self, Config, Overrides, Settings};
use pktcrafter::sender::{shutdown_signal, Sender};
use pktcrafter::telemetry::{init_logging, LogFormat};
use pktcrafter::transport::{resolve_ipv4, RawSocket};
use pktcrafter::{Crafter, Result};
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "pktcrafter")]
#[command(about = "Send crafted TCP SYN packets to a host at a fixed interval")]
struct Cli {
    /// The host you want to send the packets to
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// The port to send the packets to
    #[arg(short, long)]
    port: Option<u16>,

    /// Interval in milliseconds between packets [default: 3000]
    #[arg(short, long, value_name = "MS")]
    interval: Option<u64>,

    /// Stop after this many packets
    #[arg(short = 'n', long)]
    count: Option<u64>,

    /// Optional TOML config file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<String>,

    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            port: self.port,
            interval_ms: self.interval,
            count: self.count,
            log_level: self.log_level.clone(),
            log_format: self.log_format,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(path) => match config::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                init_logging(None);
                error!("{}", e);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };
    cfg.apply(cli.overrides());

    // RUST_LOG env var still takes priority
    init_logging(Some(&cfg.logging));

    let settings = match config::resolve(&cfg) {
        Ok(settings) => settings,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(settings) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(settings: Settings) -> Result<()> {
    let rt = Runtime::new()?;

    rt.block_on(async move {
        let addr = resolve_ipv4(&settings.host).await?;
        info!("target {} resolved to {}", settings.host, addr);

        let socket = RawSocket::connect(addr)?;
        let shutdown = shutdown_signal()?;

        let mut sender = Sender::new(
            socket,
            Crafter::from_entropy(),
            settings.port,
            settings.interval,
        )
        .with_count(settings.count);

        let stats = sender.run(shutdown).await?;
        info!(
            "{} packets sent ({} bytes), {} send errors",
            stats.packets_sent, stats.bytes_sent, stats.send_errors
        );
        Ok(())
    })
}
