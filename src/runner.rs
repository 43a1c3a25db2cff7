use std::sync::Arc;

use anyhow::Context;

use crate::cli::{Cli, Commands};
use waf_probe::catalog::Catalog;
use waf_probe::config::ProbeConfig;
use waf_probe::external::{NucleiConfig, NucleiGenerator};
use waf_probe::output::{print_report, write_csv, write_jsonl};
use waf_probe::probe::Dispatcher;
use waf_probe::request::load_request_file;
use waf_probe::session::{ProbeSession, SessionReport};

fn init_logging(cli: &Cli) {
    // Keep reqwest/hyper quiet; our own level follows the global flags.
    use tracing_subscriber::EnvFilter;
    let crate_level = if cli.debug { "debug" } else if cli.verbose { "info" } else { "warn" };
    let filter_str = format!("waf_probe={level},reqwest=info,hyper=info,h2=info", level = crate_level);
    let env_filter = EnvFilter::try_new(&filter_str).unwrap_or_else(|_| EnvFilter::new(crate_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(true)
        .with_target(false)
        .init();
}

fn load_catalog(cli: &Cli) -> anyhow::Result<Catalog> {
    match &cli.catalog {
        Some(path) => Catalog::from_path(path)
            .with_context(|| format!("failed to load catalog {}", path.display())),
        None => Catalog::builtin().context("built-in catalog is invalid"),
    }
}

pub async fn run_from_cli(cli: Cli) -> anyhow::Result<()> {
    init_logging(&cli);
    let catalog = load_catalog(&cli)?;

    if let Commands::List = cli.command {
        for vendor in catalog.vendors() {
            let payload = vendor.canonical_payload.as_deref().unwrap_or("-");
            println!("{:<16} {} (self-check: {})", vendor.name, vendor.sites.join(", "), payload);
        }
        return Ok(());
    }

    println!("[*] Available WAFs: {}", catalog.names().join(", "));

    let config = ProbeConfig {
        timeout_secs: cli.timeout,
        verify_tls: !cli.no_verify_ssl,
        user_agent: cli.user_agent.clone(),
    };
    tracing::info!(timeout = config.timeout_secs, verify_tls = config.verify_tls, "probe configuration");

    let dispatcher = Dispatcher::from_config(&config).context("failed to build HTTP client")?;
    let mut session = ProbeSession::new(Arc::new(catalog), dispatcher);
    if !cli.wafs.is_empty() {
        session = session.with_vendors(cli.wafs.clone());
    }

    let report = match &cli.command {
        Commands::Verify => session.verify_waf_status().await,
        Commands::Url { payload } => session.test_url_payload(payload).await,
        Commands::File { path } => {
            let raw = load_request_file(path)?;
            session.test_request_from_file(&raw).await
        }
        Commands::Cve { id, nuclei, templates } => {
            let generator = NucleiGenerator::new(NucleiConfig {
                binary: nuclei.clone(),
                templates: templates.clone(),
                ..NucleiConfig::default()
            });
            session
                .test_generated_payload(&generator, id)
                .await
                .with_context(|| format!("could not build a payload for {}", id))?
        }
        Commands::List => return Ok(()),
    };

    print_report(&report);
    export(&cli, &report)
}

fn export(cli: &Cli, report: &SessionReport) -> anyhow::Result<()> {
    if let Some(path) = &cli.json {
        waf_probe::utils::ensure_parent_dir(path)?;
        write_jsonl(path, &report.results)?;
        println!("[=] JSON results written to {}", path.display());
    }
    if let Some(path) = &cli.csv {
        waf_probe::utils::ensure_parent_dir(path)?;
        write_csv(path, &report.results)?;
        println!("[=] CSV results written to {}", path.display());
    }
    Ok(())
}
