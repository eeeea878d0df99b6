//! Command dispatch: each subcommand maps onto the world service.

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use itertools::Itertools;
use termtree::Tree;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::application::WorldService;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{Region, RegionType, World};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::New { name, output }) => _new(name.as_deref(), output.as_deref()),
        Some(Commands::Info { file }) => _info(file),
        Some(Commands::Tree { file }) => _tree(file),
        Some(Commands::Path { file, id }) => _path(file, id),
        Some(Commands::Children { file, id }) => _children(file, id),
        Some(Commands::Validate { file }) => _validate(file),
        Some(Commands::Add {
            file,
            parent,
            id,
            name,
            kind,
            capital,
        }) => _add(file, parent, id, name, kind, capital.as_deref()),
        Some(Commands::Remove { file, id }) => _remove(file, id),
        Some(Commands::Rename { file, id, name }) => _rename(file, id, name),
        Some(Commands::SetCapital { file, id, capital }) => {
            _set_capital(file, id, capital.as_deref())
        }
        Some(Commands::List { dir }) => _list(dir.as_deref()),
        Some(Commands::Config { command }) => _config(command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "rsworld", &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

/// Load a world file into a fresh service.
fn open(file: &Path) -> CliResult<WorldService> {
    let mut service = WorldService::new(crate::config::DEFAULT_WORLD_NAME);
    service.load_path(file)?;
    Ok(service)
}

#[instrument]
fn _new(name: Option<&str>, output: Option<&Path>) -> CliResult<()> {
    let settings = Settings::load()?;
    let name = name.unwrap_or(&settings.default_world_name);
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(format!("{name}.xml")));
    debug!(name, output = %output.display());

    let service = WorldService::new(name);
    service.save_path(&output)?;
    output::action("created", &format!("{} ({})", name, output.display()));
    Ok(())
}

#[instrument]
fn _info(file: &Path) -> CliResult<()> {
    let service = open(file)?;
    let world = service.world();

    output::header(world.name());
    output::detail(&format!("regions: {}", world.region_count() - 1));
    output::detail(&format!("depth:   {}", world.depth()));

    let by_kind = world.iter().map(|r| r.kind).counts();
    for kind in RegionType::ALL.iter().skip(1) {
        if let Some(count) = by_kind.get(kind) {
            output::detail(&format!("{:9} {}", format!("{kind}:"), count));
        }
    }
    Ok(())
}

#[instrument]
fn _tree(file: &Path) -> CliResult<()> {
    let service = open(file)?;
    let world = service.world();
    output::info(&render_tree(world, world.root()));
    Ok(())
}

fn render_tree(world: &World, region: &Region) -> Tree<String> {
    let label = if region.id == world.name() {
        world.name().to_string()
    } else {
        match &region.capital {
            Some(capital) => format!(
                "{} ({}) [{}] capital: {}",
                region.name, region.id, region.kind, capital
            ),
            None => format!("{} ({}) [{}]", region.name, region.id, region.kind),
        }
    };
    let leaves: Vec<Tree<String>> = world
        .children_sorted(&region.id)
        .unwrap_or_default()
        .into_iter()
        .map(|child| render_tree(world, child))
        .collect();
    Tree::new(label).with_leaves(leaves)
}

#[instrument]
fn _path(file: &Path, id: &str) -> CliResult<()> {
    let service = open(file)?;
    let path = service
        .path_from_root(id)
        .ok_or_else(|| CliError::NotFound(format!("no region with id '{id}'")))?;
    output::info(&path.iter().map(|r| r.id.as_str()).join(" -> "));
    Ok(())
}

#[instrument]
fn _children(file: &Path, id: &str) -> CliResult<()> {
    let service = open(file)?;
    let children = service
        .children_sorted(id)
        .ok_or_else(|| CliError::NotFound(format!("no region with id '{id}'")))?;
    for child in children {
        match &child.capital {
            Some(capital) => output::info(&format!(
                "{}  {} [{}] capital: {}",
                child.id, child.name, child.kind, capital
            )),
            None => output::info(&format!("{}  {} [{}]", child.id, child.name, child.kind)),
        }
    }
    Ok(())
}

#[instrument]
fn _validate(file: &Path) -> CliResult<()> {
    let service = open(file)?;
    output::success(&format!(
        "{} is a valid world document ({} regions)",
        file.display(),
        service.world().region_count() - 1
    ));
    Ok(())
}

#[instrument]
fn _add(
    file: &Path,
    parent: &str,
    id: &str,
    name: &str,
    kind: &str,
    capital: Option<&str>,
) -> CliResult<()> {
    let kind = RegionType::from_schema_name(kind).ok_or_else(|| {
        CliError::InvalidArgs(format!(
            "unknown region type '{kind}', expected Continent, Nation, State or County"
        ))
    })?;

    let mut service = open(file)?;
    let mut region = Region::new(id, name, kind);
    region.capital = capital.map(str::to_string);
    service.world_mut().add_region(parent, region)?;
    service.save_path(file)?;
    output::action("added", &format!("{id} under {parent}"));
    Ok(())
}

#[instrument]
fn _remove(file: &Path, id: &str) -> CliResult<()> {
    let mut service = open(file)?;
    let removed = service.world_mut().remove_region(id)?;
    service.save_path(file)?;
    output::action("removed", &removed);
    Ok(())
}

#[instrument]
fn _rename(file: &Path, id: &str, name: &str) -> CliResult<()> {
    let mut service = open(file)?;
    service.world_mut().rename_region(id, name)?;
    service.save_path(file)?;
    output::action("renamed", &format!("{id} -> {name}"));
    Ok(())
}

#[instrument]
fn _set_capital(file: &Path, id: &str, capital: Option<&str>) -> CliResult<()> {
    let mut service = open(file)?;
    service
        .world_mut()
        .set_capital(id, capital.map(str::to_string))?;
    service.save_path(file)?;
    match capital {
        Some(capital) => output::action("capital", &format!("{id}: {capital}")),
        None => output::action("capital", &format!("{id}: cleared")),
    }
    Ok(())
}

#[instrument]
fn _list(dir: Option<&Path>) -> CliResult<()> {
    let settings = Settings::load()?;
    let dir = dir.unwrap_or(&settings.worlds_dir);
    debug!(dir = %dir.display());

    for entry in WalkDir::new(dir).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        match entry.path().extension() {
            Some(ext) if ext == "xml" => {}
            _ => continue,
        }
        let mut service = WorldService::new(crate::config::DEFAULT_WORLD_NAME);
        match service.load_path(entry.path()) {
            Ok(()) => output::success(&format!(
                "{} ({}, {} regions)",
                entry.path().display(),
                service.world().name(),
                service.world().region_count() - 1
            )),
            Err(e) => output::failure(&format!("{}: {}", entry.path().display(), e)),
        }
    }
    Ok(())
}

fn _config(command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load()?;
            output::info(&settings.to_toml());
        }
        ConfigCommands::Path => match Settings::global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::failure("no home directory found"),
        },
    }
    Ok(())
}
