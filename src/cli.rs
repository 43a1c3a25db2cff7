use clap::Parser;
use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[command(author, version, about = "Check whether payloads get blocked by known web application firewalls", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// WAF vendors to test, comma separated (default: whole catalog)
    #[arg(long, global = true, value_delimiter = ',')]
    pub wafs: Vec<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 10_u64, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Do not verify TLS certificates
    #[arg(long, global = true, default_value_t = false)]
    pub no_verify_ssl: bool,

    /// Custom User-Agent
    #[arg(long, global = true)]
    pub user_agent: Option<String>,

    /// Vendor catalog JSON (default: built-in catalog)
    #[arg(long, global = true, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Also write results as JSON lines
    #[arg(long, global = true, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Also write results as CSV
    #[arg(long, global = true, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// Enable detailed debug logging (global)
    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,

    /// Enable verbose logging (global)
    #[arg(long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Self-check: send every vendor's known-blocked payload
    Verify,

    /// Test a payload URL (its host is replaced) or a path/query fragment
    Url {
        #[arg(allow_hyphen_values = true)]
        payload: String,
    },

    /// Replay a captured HTTP request (raw text, or .json with method/path/headers/body)
    File {
        path: PathBuf,
    },

    /// Build a request from a nuclei template id (e.g. CVE-2021-41773) and replay it
    Cve {
        id: String,

        /// nuclei binary (default: tools/nuclei_<os>, then nuclei on PATH)
        #[arg(long)]
        nuclei: Option<PathBuf>,

        /// nuclei templates directory
        #[arg(long, default_value = "tools/nuclei-templates")]
        templates: PathBuf,
    },

    /// List vendors in the catalog
    List,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
