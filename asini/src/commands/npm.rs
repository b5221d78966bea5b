//! Package manager commands.

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use crate::formatting::{
    create_spinner, print_error, print_section_header, print_success, print_summary_box,
    SectionStyle,
};

use super::Context;

#[derive(Subcommand)]
pub enum DistTagAction {
    /// Point a dist-tag at a published version
    Add {
        package: String,
        version: String,
        tag: String,
    },
    /// Remove a dist-tag
    Rm { package: String, tag: String },
    /// Check whether a dist-tag exists
    Check { package: String, tag: String },
}

pub async fn cmd_install(ctx: &Context, dir: PathBuf, specs: Vec<String>) -> Result<()> {
    let dir = ctx.resolve(&dir);
    if specs.is_empty() {
        print_success("Nothing to install");
        return Ok(());
    }

    let spinner = create_spinner(&format!("Installing {} dependencies", specs.len()));
    let result = ctx.npm.install_in_dir(&dir, &specs).await;
    spinner.finish_and_clear();
    result?;

    print_success(format!(
        "Installed {} in {}",
        specs.join(", "),
        dir.display()
    ));
    Ok(())
}

pub async fn cmd_exec(
    ctx: &Context,
    subcommand: String,
    dir: PathBuf,
    args: Vec<String>,
) -> Result<()> {
    let dir = ctx.resolve(&dir);
    let output = ctx.npm.exec_in_dir(&subcommand, &args, &dir).await?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

pub async fn cmd_run(ctx: &Context, script: String, dir: PathBuf, args: Vec<String>) -> Result<()> {
    let dir = ctx.resolve(&dir);
    let output = ctx.npm.run_script_in_dir(&script, &args, &dir).await?;
    if !output.is_empty() {
        println!("{}", output);
    }
    print_success(format!("Ran script {} in {}", script, dir.display()));
    Ok(())
}

pub async fn cmd_publish(ctx: &Context, dir: PathBuf, tag: String) -> Result<()> {
    let dir = ctx.resolve(&dir);
    let spinner = create_spinner(&format!("Publishing {} with tag {}", dir.display(), tag));
    let result = ctx.npm.publish_tagged_in_dir(&tag, &dir).await;
    spinner.finish_and_clear();
    let output = result?;

    if !output.is_empty() {
        println!("{}", output);
    }
    print_success(format!("Published {} under {}", dir.display(), tag));
    Ok(())
}

pub fn cmd_dist_tag(ctx: &Context, action: DistTagAction) -> Result<()> {
    match action {
        DistTagAction::Add {
            package,
            version,
            tag,
        } => {
            ctx.npm.add_dist_tag(&package, &version, &tag)?;
            print_success(format!("{}@{} tagged {}", package, version, tag));
        }
        DistTagAction::Rm { package, tag } => {
            ctx.npm.remove_dist_tag(&package, &tag)?;
            print_success(format!("Removed {} from {}", tag, package));
        }
        DistTagAction::Check { package, tag } => {
            if ctx.npm.check_dist_tag(&package, &tag) {
                print_success(format!("{} has dist-tag {}", package, tag));
            } else {
                print_error(format!("{} has no dist-tag {}", package, tag));
            }
        }
    }
    Ok(())
}

/// Returns whether the installed package satisfies `range`.
pub fn cmd_satisfied(ctx: &Context, root: PathBuf, package: String, range: String) -> Result<bool> {
    let root = ctx.resolve(&root);
    let satisfied = ctx.npm.dependency_is_satisfied(&root, &package, &range)?;

    print_section_header("Dependency Check", SectionStyle::Secondary);
    print_summary_box(
        &package,
        &[
            ("Range", &range),
            ("Satisfied", if satisfied { "yes" } else { "no" }),
        ],
    );
    println!();
    Ok(satisfied)
}
