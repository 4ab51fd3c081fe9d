//! Command dispatch

use std::fs;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{ContinuedFractionService, TreeRequest, TreeService};
use crate::cli::args::{Cli, Commands, ConfigCommands, Format};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{simplex_basis, stern_brocot_basis, Vector};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = load_settings(cli.config_dir.as_deref())?;
    debug!("settings: {:?}", settings);

    match &cli.command {
        Commands::Tree {
            generations,
            dimensions,
            basis,
            unique,
            recursive,
            structure,
            format,
        } => {
            let request = tree_request(basis.clone(), *generations, *dimensions)?;
            let service = TreeService::new(settings);
            if *structure {
                return cmd_tree_structure(&service, &request);
            }
            cmd_tree(
                &service,
                &request,
                *unique,
                *recursive,
                format.unwrap_or_default(),
            )
        }
        Commands::Split {
            generations,
            format,
        } => cmd_split(&TreeService::new(settings), *generations, *format),
        Commands::Sqrt {
            n,
            to,
            max_length,
            convergents,
            format,
        } => cmd_sqrt(
            &ContinuedFractionService::new(settings),
            *n,
            *to,
            *max_length,
            *convergents,
            *format,
        ),
        Commands::E {
            limit,
            convergents,
            format,
        } => cmd_e(
            &ContinuedFractionService::new(settings),
            *limit,
            *convergents,
            *format,
        ),
        Commands::Config { command } => cmd_config(command, &settings, cli.config_dir.as_deref()),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    }
}

fn load_settings(config_dir: Option<&Path>) -> CliResult<Settings> {
    let dir = match config_dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().map_err(|e| CliError::io("resolve cwd", e))?,
    };
    Ok(Settings::load(Some(dir.as_path()))?)
}

/// Default basis: Stern-Brocot for 2-D, unit vectors above.
fn tree_request(
    basis: Option<Vec<Vector>>,
    generations: usize,
    dimensions: usize,
) -> CliResult<TreeRequest> {
    let basis = match basis {
        Some(basis) => basis,
        None if dimensions == 2 => stern_brocot_basis(),
        None => simplex_basis(dimensions)?,
    };
    Ok(TreeRequest {
        basis,
        generations,
        dimensions,
    })
}

#[instrument(level = "debug", skip(service))]
fn cmd_tree(
    service: &TreeService,
    request: &TreeRequest,
    unique: bool,
    recursive: bool,
    format: Format,
) -> CliResult<()> {
    let levels = match (unique, recursive) {
        (true, true) => crate::domain::unique_per_level(&service.levels_recursive(request)?),
        (true, false) => service.unique_levels(request)?,
        (false, true) => service.levels_recursive(request)?,
        (false, false) => service.levels(request)?,
    };
    match format {
        Format::Text => {
            output::print_levels(&levels);
            Ok(())
        }
        Format::Json => output::print_levels_json(&levels),
    }
}

#[instrument(level = "debug", skip(service))]
fn cmd_tree_structure(service: &TreeService, request: &TreeRequest) -> CliResult<()> {
    let tree = service.arena(request)?;
    output::print_structure(&tree);
    Ok(())
}

#[instrument(level = "debug", skip(service))]
fn cmd_split(service: &TreeService, generations: usize, format: Format) -> CliResult<()> {
    let request = tree_request(None, generations, 2)?;
    let split = service.split(&request)?;
    match format {
        Format::Text => {
            output::print_split(&split);
            Ok(())
        }
        Format::Json => output::print_split_json(&split),
    }
}

#[instrument(level = "debug", skip(service))]
fn cmd_sqrt(
    service: &ContinuedFractionService,
    n: i64,
    to: Option<i64>,
    max_length: Option<usize>,
    with_convergents: bool,
    format: Format,
) -> CliResult<()> {
    let expansions = match to {
        Some(to) => service.sqrt_range(n, to, max_length)?,
        None => vec![(n, service.sqrt(n, max_length)?)],
    };
    let labelled: Vec<(String, _)> = expansions
        .into_iter()
        .map(|(n, cf)| (format!("sqrt({})", n), cf))
        .collect();
    report(service, &labelled, with_convergents, format)
}

#[instrument(level = "debug", skip(service))]
fn cmd_e(
    service: &ContinuedFractionService,
    limit: Option<usize>,
    with_convergents: bool,
    format: Format,
) -> CliResult<()> {
    let cf = service.e(limit)?;
    report(service, &[("e".to_string(), cf)], with_convergents, format)
}

fn report(
    service: &ContinuedFractionService,
    expansions: &[(String, crate::domain::ContinuedFraction)],
    with_convergents: bool,
    format: Format,
) -> CliResult<()> {
    let convergents = if with_convergents {
        expansions
            .iter()
            .map(|(_, cf)| service.convergents(cf).map(Some))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        vec![None; expansions.len()]
    };

    match format {
        Format::Text => {
            for ((label, cf), convergents) in expansions.iter().zip(&convergents) {
                output::print_cf(label, cf);
                if let Some(convergents) = convergents {
                    output::print_convergents(convergents);
                }
            }
            Ok(())
        }
        Format::Json => {
            let rows: Vec<_> = expansions
                .iter()
                .zip(&convergents)
                .map(|((label, cf), convergents)| (label.clone(), cf, convergents.as_deref()))
                .collect();
            output::print_cf_json(&rows)
        }
    }
}

fn cmd_config(command: &ConfigCommands, settings: &Settings, config_dir: Option<&Path>) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::detail(&format!("global: {}", path.display())),
                None => output::warning("no config directory for this platform"),
            }
            let dir = config_dir
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            output::detail(&format!("local:  {}", local_config_path(&dir).display()));
            Ok(())
        }
        ConfigCommands::Init { force } => {
            let path = global_config_path().ok_or_else(|| {
                CliError::InvalidArgs("no config directory for this platform".into())
            })?;
            write_default_config(&path, *force)?;
            output::success(&format!("wrote {}", path.display()));
            Ok(())
        }
    }
}

/// Writes the compiled defaults as TOML, refusing to clobber unless forced.
pub fn write_default_config(path: &Path, force: bool) -> CliResult<()> {
    if path.exists() && !force {
        return Err(CliError::InvalidArgs(format!(
            "{} exists, use --force to overwrite",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| CliError::io(format!("create {}", parent.display()), e))?;
    }
    let content = Settings::default().to_toml()?;
    fs::write(path, content).map_err(|e| CliError::io(format!("write {}", path.display()), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    fn test_tree_request_defaults_basis_by_dimension() {
        let classic = tree_request(None, 2, 2).unwrap();
        assert_eq!(classic.basis, stern_brocot_basis());
        let simplex = tree_request(None, 2, 3).unwrap();
        assert_eq!(simplex.basis.len(), 3);
        assert!(tree_request(None, 2, 1).is_err());
    }

    #[rstest]
    fn test_write_default_config_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("mediant.toml");
        write_default_config(&path, false).unwrap();
        assert!(path.exists());
        assert!(matches!(
            write_default_config(&path, false),
            Err(CliError::InvalidArgs(_))
        ));
        write_default_config(&path, true).unwrap();
    }
}
