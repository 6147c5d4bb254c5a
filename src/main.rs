//! registry-fix: repair stale entries and broken dependency references
//! in a JSON component registry.
//!
//! Loads the registry, purges denylisted entries, registers split files
//! that exist on disk, redirects dependencies that still point at
//! retired ids, and writes the result back atomically. Any failure
//! before the final save leaves the on-disk file untouched.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use dialoguer::Confirm;
use registry_fix::cli::{Args, Commands};
use registry_fix::fix::{self, FixReport};
use registry_fix::plan::FixPlan;
use registry_fix::registry::{self, Registry};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Commands::Fix {
            registry,
            root,
            plan,
            dry_run,
            interactive,
            json,
            verbose,
        } => cmd_fix(&registry, root, plan, dry_run, interactive, json, verbose),
        Commands::Check {
            registry,
            root,
            plan,
            json,
            verbose,
        } => cmd_check(&registry, root, plan, json, verbose),
        Commands::Show { registry, depth } => cmd_show(&registry, depth),
    }
}

fn cmd_fix(
    registry_path: &Path,
    root: Option<PathBuf>,
    plan_path: Option<PathBuf>,
    dry_run: bool,
    interactive: bool,
    json: bool,
    verbose: bool,
) -> Result<()> {
    let (registry, report) = run_repair(registry_path, root, plan_path, verbose)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if dry_run {
        println!("{} Dry run, registry not written", "info:".blue().bold());
        return Ok(());
    }

    if interactive {
        let proceed = Confirm::new()
            .with_prompt(format!("Write {}?", registry_path.display()))
            .default(true)
            .interact()?;
        if !proceed {
            println!("{} Aborted, registry not written", "info:".blue().bold());
            return Ok(());
        }
    }

    registry.save(registry_path)?;
    println!(
        "{} Registry saved to {}",
        "ok:".green().bold(),
        registry_path.display()
    );
    println!(
        "{} Run the registry validator to verify the result",
        "hint:".cyan().bold()
    );
    Ok(())
}

fn cmd_check(
    registry_path: &Path,
    root: Option<PathBuf>,
    plan_path: Option<PathBuf>,
    json: bool,
    verbose: bool,
) -> Result<()> {
    let (_, report) = run_repair(registry_path, root, plan_path, verbose)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
        println!(
            "{} Use `registry-fix fix` to apply these changes",
            "hint:".cyan().bold()
        );
    }
    Ok(())
}

fn cmd_show(registry_path: &Path, depth: usize) -> Result<()> {
    let registry = Registry::load(registry_path)?;
    registry::print_tree(&registry, depth);
    Ok(())
}

/// Loads the registry and applies the plan in memory, printing warnings
/// for skipped candidates. Nothing is written here.
fn run_repair(
    registry_path: &Path,
    root: Option<PathBuf>,
    plan_path: Option<PathBuf>,
    verbose: bool,
) -> Result<(Registry, FixReport)> {
    let plan = match plan_path {
        Some(path) => FixPlan::from_path(&path)?,
        None => FixPlan::builtin(),
    };
    let root = resolve_root(registry_path, root);

    let mut registry = Registry::load(registry_path)?;
    if verbose {
        eprintln!(
            "{} Loaded {} with {} context entries",
            "info:".blue().bold(),
            registry_path.display(),
            registry.count(fix::CONTEXTS)
        );
        eprintln!(
            "{} Candidate paths resolve against {}",
            "info:".blue().bold(),
            root.display()
        );
    }

    let report = fix::apply_plan(&mut registry, &plan, &root)?;

    for skipped in report.inserted.missing_files() {
        eprintln!(
            "{} File doesn't exist: {}",
            "warn:".yellow().bold(),
            skipped.path
        );
    }

    Ok((registry, report))
}

/// Candidate existence checks resolve against the registry's own
/// directory unless `--root` overrides it.
fn resolve_root(registry_path: &Path, root: Option<PathBuf>) -> PathBuf {
    root.unwrap_or_else(|| {
        registry_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

fn print_report(report: &FixReport) {
    if report.removed.is_empty() {
        println!("{} Removed dead entries: none", "ok:".green().bold());
    } else {
        let parts: Vec<String> = report
            .removed
            .iter()
            .map(|removal| format!("{}: {}", removal.category, removal.removed))
            .collect();
        println!(
            "{} Removed dead entries: {}",
            "ok:".green().bold(),
            parts.join(", ")
        );
    }

    println!(
        "{} Added {} split-file entries",
        "ok:".green().bold(),
        report.inserted.added
    );

    println!(
        "{} Rewrote {} dependency reference(s)",
        "ok:".green().bold(),
        report.rewritten.refs_rewritten
    );
    for agent in &report.rewritten.agents_updated {
        println!(
            "{} Updated dependencies for agent: {}",
            "ok:".green().bold(),
            agent
        );
    }

    println!(
        "\n{} Registry now has {} context entries",
        "ok:".green().bold(),
        report.contexts
    );
}
