use std::{path::PathBuf, time::Duration};

use clap::Parser;

pub const DEFAULT_PORT: u16 = 40000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Accepts TCP clients and dumps whatever they send to a file.
#[derive(Parser, Debug)]
#[command(name = "tcp-dump-server", version)]
pub struct Cli {
    /// File to dump received bytes to (overwritten per connection)
    #[arg(short = 'f', long = "datafile", value_name = "FILE")]
    pub data_file: PathBuf,

    /// Accept one client connection then exit
    #[arg(short, long)]
    pub single: bool,

    /// TCP port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Seconds to wait for a client connection, 0 waits forever
    #[arg(short, long, value_name = "SECONDS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Seconds to sleep before each read (fractions ok)
    #[arg(short, long, value_name = "SECONDS", default_value = "0", value_parser = parse_delay)]
    pub delay: Duration,

    /// Echo the received bytes to stdout
    #[arg(short = 'o', long = "stdout")]
    pub stdout: bool,

    /// Keep reading until the client closes instead of a single read
    #[arg(long)]
    pub drain: bool,

    /// Send the received bytes back to the client before closing
    #[arg(long)]
    pub echo: bool,
}

fn parse_delay(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw.parse().map_err(|e: std::num::ParseFloatError| e.to_string())?;
    Duration::try_from_secs_f64(secs).map_err(|_| format!("invalid delay `{raw}`"))
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub data_file: PathBuf,
    pub single: bool,
    pub port: u16,
    pub timeout: Option<Duration>,
    pub delay: Duration,
    pub echo_stdout: bool,
    pub drain: bool,
    pub echo_back: bool,
}

impl ServerConfig {
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
            single: false,
            port: DEFAULT_PORT,
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            delay: Duration::ZERO,
            echo_stdout: false,
            drain: false,
            echo_back: false,
        }
    }
}

impl From<Cli> for ServerConfig {
    fn from(cli: Cli) -> Self {
        Self {
            data_file: cli.data_file,
            single: cli.single,
            port: cli.port,
            timeout: (cli.timeout != 0).then(|| Duration::from_secs(cli.timeout)),
            delay: cli.delay,
            echo_stdout: cli.stdout,
            drain: cli.drain,
            echo_back: cli.echo,
        }
    }
}
