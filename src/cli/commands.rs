//! Command dispatch: one function per subcommand

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::services::{Enumeration, EnumerationService};
use crate::application::{AlgorithmKind, OutputFormat};
use crate::cli::args::{Cli, Commands, ConfigCommands, InputArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_dir, global_config_path, local_config_path, Settings};
use crate::domain::Branch;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Commands::Tree {
            input,
            format,
            output,
        } => cmd_tree(cli, input, *format, output.as_deref()),
        Commands::Leaves { input } => cmd_leaves(cli, input),
        Commands::Stats { input } => cmd_stats(cli, input),
        Commands::Trace { input, path } => cmd_trace(cli, input, path),
        Commands::Config { command } => match command {
            ConfigCommands::Show => cmd_config_show(cli),
            ConfigCommands::Path => cmd_config_path(cli),
            ConfigCommands::Init { global } => cmd_config_init(cli, *global),
        },
        Commands::Completion { shell } => cmd_completion(*shell),
    }
}

fn project_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.project_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir().map_err(|e| CliError::Io {
            context: "current directory".into(),
            source: e,
        }),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let dir = project_dir(cli)?;
    Ok(Settings::load(Some(&dir))?)
}

/// Resolve the algorithm (flag beats config) and run the enumeration.
fn enumerate(cli: &Cli, input: &InputArgs) -> CliResult<(Settings, Enumeration)> {
    let settings = load_settings(cli)?;
    let kind = input.algorithm.unwrap_or(settings.algorithm);
    let service = EnumerationService::new(settings.clone());
    let enumeration = service.enumerate(kind, &input.elements)?;
    Ok((settings, enumeration))
}

#[instrument(level = "debug", skip(cli))]
fn cmd_tree(
    cli: &Cli,
    input: &InputArgs,
    format: Option<OutputFormat>,
    output_path: Option<&Path>,
) -> CliResult<()> {
    let (settings, enumeration) = enumerate(cli, input)?;
    let format = format.unwrap_or(settings.format);
    let rendered = format.renderer::<String>().render(&enumeration.tree);
    debug!("rendered {} bytes as {}", rendered.len(), format);

    match output_path {
        Some(path) => {
            fs::write(path, &rendered).map_err(|e| CliError::Write {
                path: path.to_path_buf(),
                source: e,
            })?;
            output::action("Wrote", &path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

#[instrument(level = "debug", skip(cli))]
fn cmd_leaves(cli: &Cli, input: &InputArgs) -> CliResult<()> {
    let (_, enumeration) = enumerate(cli, input)?;

    for path in enumeration.tree.paths() {
        if path.is_pruned() {
            output::pruned(&path);
        } else {
            output::detail(&path);
        }
    }
    Ok(())
}

#[instrument(level = "debug", skip(cli))]
fn cmd_stats(cli: &Cli, input: &InputArgs) -> CliResult<()> {
    let (_, enumeration) = enumerate(cli, input)?;
    let tree = &enumeration.tree;
    let stats = tree.stats();

    output::header(&format!(
        "{} sort on [{}]",
        enumeration.algorithm,
        input.elements.iter().join(" ")
    ));
    output::field("depth", &stats.depth);
    output::field("comparisons", &stats.decisions);
    output::field("orderings", &stats.leaves);
    output::field("pruned", &stats.pruned);
    output::field("runs", &enumeration.runs);
    output::field("fingerprint", &tree.fingerprint());
    Ok(())
}

#[instrument(level = "debug", skip(cli))]
fn cmd_trace(cli: &Cli, input: &InputArgs, path: &[Branch]) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let kind: AlgorithmKind = input.algorithm.unwrap_or(settings.algorithm);
    let trace = EnumerationService::new(settings).trace(kind, &input.elements, path)?;

    output::header(&format!("{} sort on [{}]", kind, input.elements.iter().join(" ")));
    for (i, (comparison, branch)) in trace.steps.iter().enumerate() {
        output::detail(&format!("{:>2}. {} [{}]", i + 1, comparison, branch));
    }
    output::action("Result", &trace.data.iter().join(" "));

    if let Some(k) = trace.contradicted {
        output::warning(&format!(
            "step {} contradicts an earlier answer, this path is pruned in the tree",
            k + 1
        ));
    }
    if trace.unscripted > 0 {
        output::warning(&format!(
            "path ended early, {} further comparison(s) answered No",
            trace.unscripted
        ));
    }
    if trace.unused > 0 {
        output::warning(&format!("{} decision(s) of the path were not used", trace.unused));
    }
    Ok(())
}

fn cmd_config_show(cli: &Cli) -> CliResult<()> {
    let settings = load_settings(cli)?;
    output::info(&settings.to_toml()?);
    Ok(())
}

fn cmd_config_path(cli: &Cli) -> CliResult<()> {
    let describe = |path: &Path| {
        let state = if path.exists() { "exists" } else { "not found" };
        format!("{} ({})", path.display(), state)
    };

    match global_config_path() {
        Some(path) => output::action("Global", &describe(&path)),
        None => output::action("Global", "no config directory on this platform"),
    }
    let dir = project_dir(cli)?;
    output::action("Local", &describe(&local_config_path(&dir)));
    Ok(())
}

#[instrument(level = "debug", skip(cli))]
fn cmd_config_init(cli: &Cli, global: bool) -> CliResult<()> {
    let path = if global {
        let dir = global_config_dir()
            .ok_or_else(|| CliError::Usage("no config directory on this platform".into()))?;
        fs::create_dir_all(&dir).map_err(|e| CliError::Io {
            context: format!("create {}", dir.display()),
            source: e,
        })?;
        dir.join("dtgen.toml")
    } else {
        local_config_path(&project_dir(cli)?)
    };

    if path.exists() {
        return Err(CliError::Usage(format!(
            "config already exists: {}",
            path.display()
        )));
    }

    fs::write(&path, Settings::template()).map_err(|e| CliError::Write {
        path: path.clone(),
        source: e,
    })?;
    output::action("Created", &path.display());
    Ok(())
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
