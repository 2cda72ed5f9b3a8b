use clap::Parser;
use linewire::logging::{self, LogLevel};
use linewire::net::{DEFAULT_PEER, TransportBuilder};
use linewire::session::Session;

use std::net::SocketAddrV4;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "linewire", version, about = "Remote command session client")]
struct Cli {
    /// Peer to connect to.
    #[arg(long, env = "LINEWIRE_PEER", default_value_t = DEFAULT_PEER)]
    peer: SocketAddrV4,

    /// Log verbosity; `LINEWIRE_LOG` takes precedence when set.
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = logging::init(cli.log_level) {
        eprintln!("linewire: {err}");
    }

    match run(cli.peer) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "session failed");
            eprintln!("linewire: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(peer: SocketAddrV4) -> linewire::Result<()> {
    let mut transport = TransportBuilder::new().peer(peer).build()?;
    transport.connect()?;

    Session::new(&mut transport).run()?;

    transport.disconnect()
}
