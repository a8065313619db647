//! edge-provisioner command line
//!
//! Logs go to stderr; results (text or `--json`) go to stdout. The exit code
//! is non-zero when a workflow did not succeed overall.

mod cli;
mod output;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands, CreateArgs, UpdateArgs};
use edge_provisioner_app::{AppConfig, AppState};
use edge_provisioner_core::types::{CreateSiteRequest, ProvisioningResult, UpdateSiteRequest};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.log.level);

    match run(cli, &config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins over the configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();
}

async fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<ExitCode> {
    let state = AppState::from_config(config).await?;
    let json = cli.json;

    match cli.command {
        Commands::Create(args) => {
            let result = state.create_workflow.execute(&create_request(args)).await;
            report(&result, json)
        }
        Commands::Update(args) => {
            let result = state
                .update_workflow
                .execute(&update_request(args))
                .await
                .context("Update failed")?;
            report(&result, json)
        }
        Commands::CheckNs { site_id } => {
            let result = state
                .nameserver_guard
                .check(&site_id)
                .await
                .context("Nameserver check failed")?;
            report(&result, json)
        }
        Commands::List => {
            let sites = state.site_service.list_sites().await?;
            if json {
                output::print_json(&sites)?;
            } else {
                print!("{}", output::render_sites(&sites));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Show { site_id } => {
            let site = state.site_service.get_site(&site_id).await?;
            if json {
                output::print_json(&site)?;
            } else {
                print!("{}", output::render_site(&site));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Refresh { site_id } => {
            let site = state.site_service.refresh_status(&site_id).await?;
            if json {
                output::print_json(&site)?;
            } else {
                print!("{}", output::render_site(&site));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Zones { page, page_size } => {
            let zones = state
                .site_service
                .list_remote_zones(Some(page), Some(page_size))
                .await?;
            if json {
                output::print_json(&zones)?;
            } else {
                print!("{}", output::render_zones(&zones));
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn report(result: &ProvisioningResult, json: bool) -> anyhow::Result<ExitCode> {
    if json {
        output::print_json(result)?;
    } else {
        print!("{}", output::render_result(result));
    }
    Ok(if result.succeeded_overall {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn create_request(args: CreateArgs) -> CreateSiteRequest {
    let name = args.name.trim().trim_end_matches('.').to_lowercase();
    CreateSiteRequest {
        sub_target: args.sub_target.unwrap_or_else(|| args.root_target.clone()),
        pagerule_url: args.pagerule_url.unwrap_or_else(|| format!("{name}/*")),
        pagerule_full_url: args
            .pagerule_full_url
            .unwrap_or_else(|| format!("www.{name}/*")),
        root_target: args.root_target,
        forwarding_url: args.forwarding_url,
        name,
    }
}

fn update_request(args: UpdateArgs) -> UpdateSiteRequest {
    let sub_target = args.sub_target.unwrap_or_else(|| args.root_target.clone());
    let request = UpdateSiteRequest::new(args.site_id, args.root_target, sub_target);
    match args.forwarding_url {
        Some(url) => request.with_forwarding_url(url),
        None => request,
    }
}
