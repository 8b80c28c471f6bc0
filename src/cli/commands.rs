//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use tracing::{debug, info, instrument};

use crate::application::{PlanRequest, SubnetSize, VnetSize};
use crate::cli::args::{Cli, Commands, ConfigCommands, PlanArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let project_dir = resolve_project_dir(cli.project_dir.as_deref())?;
    debug!("project_dir: {}", project_dir.display());

    match &cli.command {
        Some(Commands::Plan(args)) => cmd_plan(&project_dir, args),
        Some(Commands::Config { command }) => execute_config(command, &project_dir),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "ipplan", &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given; try 'ipplan --help'".into(),
        )),
    }
}

fn resolve_project_dir(project_dir: Option<&Path>) -> CliResult<PathBuf> {
    match project_dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => std::env::current_dir()
            .map_err(|e| CliError::Infra(InfraError::io("get current directory", e))),
    }
}

#[instrument(skip(args))]
fn cmd_plan(project_dir: &Path, args: &PlanArgs) -> CliResult<()> {
    let settings = Settings::load(Some(project_dir))?;
    let container = ServiceContainer::new(settings);
    let rendered = run_plan(&container, args)?;
    output::info(&rendered);
    Ok(())
}

/// Fetch used ranges, plan, and render the result.
pub fn run_plan(container: &ServiceContainer, args: &PlanArgs) -> CliResult<String> {
    let settings = &container.settings;
    let request = build_request(settings, args);
    debug!("request: {:?}", request);

    let existing = args
        .existing
        .as_deref()
        .or(settings.inventory_file.as_deref());
    let subscription = args
        .subscription
        .as_deref()
        .or(settings.subscription.as_deref());
    let inventory = container.inventory(existing, subscription);

    let used = inventory.used_ranges()?;
    info!("{}: {} used ranges", inventory.describe(), used.len());

    let plan = container.planner().plan(&request, &used)?;
    let format = args.format.unwrap_or(settings.output_format);
    Ok(output::render_plan(&plan, format)?)
}

/// Combine flags with settings into a planning request.
///
/// Host counts override prefix lengths given for the same range.
/// VNet sizing: `--vnet-ips` wins, then `--vnet-prefix`; when either
/// subnet is sized by host count the VNet is fitted to the subnets,
/// otherwise the configured prefix applies.
pub fn build_request(settings: &Settings, args: &PlanArgs) -> PlanRequest {
    let primary = subnet_size(
        args.primary_ips,
        args.primary_prefix,
        settings.primary_subnet_prefix_length,
    );
    let secondary = subnet_size(
        args.secondary_ips.or(args.cosmos_ips),
        args.secondary_prefix,
        settings.secondary_subnet_prefix_length,
    );

    let vnet = match (args.vnet_ips, args.vnet_prefix) {
        (Some(total), _) => VnetSize::TotalAddresses(total),
        (None, Some(len)) => VnetSize::PrefixLength(len),
        (None, None) if primary.is_host_count() || secondary.is_host_count() => {
            VnetSize::FitSubnets
        }
        (None, None) => VnetSize::PrefixLength(settings.vnet_prefix_length),
    };

    PlanRequest {
        base: args.base.unwrap_or(settings.base_range),
        strategy: args.search_strategy.unwrap_or(settings.search_strategy),
        vnet,
        primary,
        secondary,
        start_third_octet: args.start_third_octet.unwrap_or(settings.start_third_octet),
    }
}

fn subnet_size(hosts: Option<u64>, prefix_len: Option<u8>, default_len: u8) -> SubnetSize {
    match (hosts, prefix_len) {
        (Some(hosts), _) => SubnetSize::UsableHosts(hosts),
        (None, Some(len)) => SubnetSize::PrefixLength(len),
        (None, None) => SubnetSize::PrefixLength(default_len),
    }
}

// ============================================================
// Config commands
// ============================================================

fn execute_config(cmd: &ConfigCommands, project_dir: &Path) -> CliResult<()> {
    match cmd {
        ConfigCommands::Show => {
            let settings = Settings::load(Some(project_dir))?;
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            output::header("Config paths");
            match global_config_path() {
                Some(path) => output::action("global", &describe_path(&path)),
                None => output::warning("cannot determine global config directory"),
            }
            output::action("local", &describe_path(&local_config_path(project_dir)));
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".into())
                })?
            } else {
                local_config_path(project_dir)
            };
            let container = ServiceContainer::new(Settings::default());
            let created = init_config(&container, &path)?;
            output::action("Created", &created.display());
            Ok(())
        }
    }
}

/// Write the config template to `path`, refusing to overwrite.
pub fn init_config(container: &ServiceContainer, path: &Path) -> CliResult<PathBuf> {
    if container.fs.exists(path) {
        return Err(CliError::Usage(format!(
            "config already exists: {}",
            path.display()
        )));
    }
    container
        .fs
        .ensure_parent(path)
        .map_err(|e| InfraError::io(format!("create directory for {}", path.display()), e))?;
    container
        .fs
        .write(path, &Settings::template())
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    Ok(path.to_path_buf())
}

fn describe_path(path: &Path) -> String {
    let state = if path.exists() { "exists" } else { "not found" };
    format!("{} ({state})", path.display())
}
