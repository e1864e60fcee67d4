use std::path::PathBuf;

use clap::Parser;

/// cuepoint: a modal, vi-style client for a music player daemon
#[derive(Parser, Debug, Clone)]
#[command(name = "cuepoint")]
#[command(version)]
#[command(about = "Modal, vi-style terminal client for a music player daemon", long_about = None)]
pub struct Cli {
    /// Server to connect to. Connects in the startup file are skipped.
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Server port. Connects in the startup file are skipped.
    #[arg(short = 'p', long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Config file to read instead of the user config
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Startup command file to read instead of the configured one
    #[arg(long, value_name = "FILE")]
    pub rc: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print the project URL and exit
    #[arg(short = 'u', long)]
    pub url: bool,

    /// Print where to report bugs and exit
    #[arg(short = 'b', long)]
    pub bugreport: bool,
}

pub fn project_url() -> &'static str {
    let url = env!("CARGO_PKG_REPOSITORY");
    if url.is_empty() {
        env!("CARGO_PKG_NAME")
    } else {
        url
    }
}

pub fn bug_report_address() -> String {
    let url = env!("CARGO_PKG_REPOSITORY");
    if url.is_empty() {
        format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    } else {
        format!("{url}/issues")
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn defaults_leave_everything_to_config() {
        let cli = Cli::parse_from(["cuepoint"]);
        assert!(cli.host.is_none());
        assert!(cli.port.is_none());
        assert!(cli.config.is_none());
        assert!(cli.log_level.is_none());
        assert!(!cli.url);
        assert!(!cli.bugreport);
    }

    #[test]
    fn server_flags() {
        let cli = Cli::parse_from(["cuepoint", "--host", "music.local", "-p", "6601"]);
        assert_eq!(cli.host.as_deref(), Some("music.local"));
        assert_eq!(cli.port, Some(6601));
    }

    #[test]
    fn rejects_out_of_range_port() {
        assert!(Cli::try_parse_from(["cuepoint", "--port", "70000"]).is_err());
    }

    #[test]
    fn file_flags() {
        let cli = Cli::parse_from([
            "cuepoint",
            "-c",
            "/tmp/config.toml",
            "--rc",
            "/tmp/rc",
            "--log-file",
            "/tmp/cuepoint.log",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/config.toml")));
        assert_eq!(cli.rc, Some(PathBuf::from("/tmp/rc")));
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/cuepoint.log")));
    }

    #[test]
    fn info_flags() {
        let cli = Cli::parse_from(["cuepoint", "-u", "--bugreport"]);
        assert!(cli.url);
        assert!(cli.bugreport);
    }
}
