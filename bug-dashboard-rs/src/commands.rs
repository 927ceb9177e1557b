use anyhow::{anyhow, Context, Result};
use bug_sdk::config::{CompositeConfigProvider, EnvConfigProvider, MemoryConfigProvider, ENV_PREFIX};
use bug_sdk::{BugId, BugRecord, BugService, BugServiceClient, BugServiceConfig, ServiceError};
use log::debug;
use serde::Serialize;

use crate::args::{Cli, Commands, ListArgs, ReportArgs};
use crate::form::BugForm;
use crate::loader::{load_bugs, submit_report, LoadPolicy, SubmitError};
use crate::render::{render_bug_detail, render_dashboard, render_health, render_prediction};
use crate::state::{DashboardState, DataSource};
use crate::view_model::{BugStats, SortDirection, ViewParameters};

pub async fn run(cli: Cli) -> Result<()> {
    let client = build_client(&cli)?;

    match cli.command {
        Commands::List(args) => list(&client, args).await,
        Commands::Show { id } => show(&client, &id).await,
        Commands::Report(args) => report(&client, args).await,
        Commands::Health => health(&client).await,
    }
}

/// Command-line flags first, then `BUGTRIAGE_*` variables, then defaults
fn build_client(cli: &Cli) -> Result<BugServiceClient> {
    let mut overrides = MemoryConfigProvider::new();
    if let Some(url) = &cli.api_url {
        overrides.set("api_url", url);
    }
    if let Some(timeout) = &cli.timeout {
        overrides.set("timeout_seconds", timeout);
    }

    let provider = CompositeConfigProvider::new()
        .with_provider(overrides)
        .with_provider(EnvConfigProvider::new().with_prefix(ENV_PREFIX));

    let config = BugServiceConfig::from_provider(&provider).map_err(surface)?;
    debug!("Using bug service at {} ({}s timeout)", config.base_url, config.timeout_seconds);

    BugServiceClient::new_with_config(config).map_err(surface)
}

/// Report the service's message, keeping the full error in the debug log
fn surface(err: ServiceError) -> anyhow::Error {
    debug!("{:?}", err);
    anyhow!("{}", err.message())
}

#[derive(Serialize)]
struct ListOutput<'a> {
    source: DataSource,
    stats: BugStats,
    bugs: Vec<&'a BugRecord>,
}

async fn list<S: BugService + ?Sized>(service: &S, args: ListArgs) -> Result<()> {
    let policy = if args.demo_fallback {
        LoadPolicy::DemoOnUnreachable
    } else {
        LoadPolicy::Strict
    };

    let outcome = load_bugs(service, policy).await.map_err(surface)?;
    if let Some(notice) = outcome.notice {
        eprintln!("Note: {}", notice);
    }

    let mut state = DashboardState::from_outcome(outcome);
    let mut params = ViewParameters::new()
        .with_search(args.search)
        .with_priority(args.priority);
    if let Some(field) = args.sort {
        let direction = if args.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        params = params.sorted_by(field, direction);
    }
    state.set_params(params);

    let view = state.view();
    if args.json {
        let output = ListOutput {
            source: state.source(),
            stats: view.stats,
            bugs: view.rows,
        };
        println!("{}", serde_json::to_string_pretty(&output).context("Failed to encode bug list")?);
    } else {
        println!("{}", render_dashboard(&view, state.params()));
    }

    Ok(())
}

async fn show<S: BugService + ?Sized>(service: &S, id: &str) -> Result<()> {
    let bug = service.get_bug(&BugId::from(id)).await.map_err(surface)?;
    println!("{}", render_bug_detail(&bug));
    Ok(())
}

async fn report<S: BugService + ?Sized>(service: &S, args: ReportArgs) -> Result<()> {
    let form = BugForm {
        title: args.title,
        description: args.description,
        module: args.module,
        frequency: args.frequency,
        user_type: args.user_type,
        logs: args.logs,
    };

    match submit_report(service, &form).await {
        Ok(outcome) => {
            println!("{}", render_prediction(&outcome));
            Ok(())
        }
        Err(SubmitError::Validation(e)) => {
            for (field, message) in e.fields().iter() {
                eprintln!("  --{}: {}", flag_name(field.label()), message);
            }
            Err(anyhow!("Bug report is incomplete"))
        }
        Err(SubmitError::Service(e)) => Err(surface(e)),
    }
}

fn flag_name(label: &str) -> String {
    label.to_lowercase().replace(' ', "-")
}

async fn health<S: BugService + ?Sized>(service: &S) -> Result<()> {
    let status = service.health_check().await.map_err(surface)?;
    println!("{}", render_health(&status));
    Ok(())
}
