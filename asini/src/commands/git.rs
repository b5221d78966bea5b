//! Repository commands.

use std::path::PathBuf;

use anyhow::{bail, Result};
use asini_core::GitUtilities;
use clap::Subcommand;

use crate::formatting::{
    print_check_table, print_info, print_key_value, print_path_list, print_section_header,
    print_success, print_warning, SectionStyle,
};

use super::Context;

#[derive(Subcommand)]
pub enum TagAction {
    /// Create a tag
    Add { name: String },
    /// Delete a tag
    Rm { name: String },
}

fn yes_no(value: bool) -> Option<String> {
    Some(if value { "yes" } else { "no" }.to_string())
}

/// Rows of the status table. Failed queries render as empty values.
fn status_rows(git: &GitUtilities) -> Vec<(&'static str, Option<String>)> {
    let has_commit = git.has_commit();
    let has_tags = git.has_tags();

    let mut rows = vec![
        ("Initialized", yes_no(true)),
        ("Has commits", yes_no(has_commit)),
        ("Top level", git.top_level_directory().ok().map(|p| p.display().to_string())),
        ("Branch", git.current_branch().ok()),
    ];

    if has_commit {
        rows.push(("HEAD", git.current_sha().ok()));
        rows.push(("First commit", git.first_commit().ok()));
    }

    rows.push(("Has tags", yes_no(has_tags)));
    if has_tags {
        let last = git.last_tagged_commit().ok();
        let release = last.as_deref().and_then(|sha| git.describe_tag(sha).ok());
        rows.push(("Last release", release));
        rows.push(("Last tagged commit", last));
    }

    rows
}

pub fn cmd_status(ctx: &Context) -> Result<()> {
    print_section_header("Repository Status", SectionStyle::Primary);

    if !ctx.git.is_initialized() {
        print_warning("Not a git repository");
        println!();
        return Ok(());
    }

    print_check_table(&status_rows(&ctx.git));
    println!();
    Ok(())
}

pub fn cmd_init(ctx: &Context) -> Result<()> {
    if ctx.git.is_initialized() {
        print_info("Repository already initialized");
        return Ok(());
    }
    let output = ctx.git.init()?;
    tracing::info!("{}", output);
    print_success("Initialized git repository");
    Ok(())
}

pub fn cmd_add(ctx: &Context, path: PathBuf) -> Result<()> {
    ctx.git.add_file(&path)?;
    print_success(format!("Staged {}", path.display()));
    Ok(())
}

pub fn cmd_commit(ctx: &Context, message: String) -> Result<()> {
    if message.trim().is_empty() {
        bail!("Commit message cannot be empty");
    }
    ctx.git.commit(&message)?;
    print_success("Committed staged changes");
    Ok(())
}

pub fn cmd_tag(ctx: &Context, action: TagAction) -> Result<()> {
    match action {
        TagAction::Add { name } => {
            ctx.git.add_tag(&name)?;
            print_success(format!("Created tag {}", name));
        }
        TagAction::Rm { name } => {
            ctx.git.remove_tag(&name)?;
            print_success(format!("Deleted tag {}", name));
        }
    }
    Ok(())
}

pub fn cmd_push(ctx: &Context, tags: Vec<String>) -> Result<()> {
    ctx.git.push_with_tags(&tags)?;
    if tags.is_empty() {
        print_success("Pushed current branch");
    } else {
        print_success(format!("Pushed current branch and {} tag(s)", tags.len()));
    }
    Ok(())
}

pub fn cmd_checkout(ctx: &Context, pattern: String) -> Result<()> {
    ctx.git.checkout_changes(&pattern)?;
    print_success(format!("Discarded changes matching {}", pattern));
    Ok(())
}

pub fn cmd_changed(ctx: &Context, path: PathBuf, since: Option<String>) -> Result<()> {
    let since = match since {
        Some(reference) => reference,
        None => ctx.git.last_release_ref()?,
    };

    let files = ctx.git.changed_files_since_in(&since, &path)?;

    print_section_header("Changed Files", SectionStyle::Primary);
    print_key_value("Since", &since);
    print_key_value("Path", &path.display().to_string());
    println!();
    print_path_list(&files);
    println!();
    Ok(())
}
