use crate::sync::SaveOutcome;
use anyhow::Result;
use colored::Colorize;

use super::CommandContext;
use super::utils::{confirm, print_selected, warn_backup};

pub async fn handle_save(
    ctx: &CommandContext,
    name: String,
    user: String,
    list: Option<String>,
    json: bool,
) -> Result<()> {
    let controller = ctx.controller();
    let service = ctx.save_service()?;

    let outcome = match &list {
        Some(list_id) => service.update(&user, list_id, &name, controller.board()).await?,
        None => service.save_as(&user, &name, controller.board()).await?,
    };

    if json {
        let body = match &outcome {
            SaveOutcome::Saved { list_id } => serde_json::json!({
                "action": "saved",
                "listId": list_id,
            }),
            SaveOutcome::SavedOffline { entry_id, notify } => serde_json::json!({
                "action": "queued",
                "entryId": entry_id,
                "offline": notify,
            }),
        };
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    match outcome {
        SaveOutcome::Saved { list_id } => {
            let verb = if list.is_some() { "Updated" } else { "Saved" };
            println!("{} {} {}", verb.green(), name.bold(), list_id.cyan());
        }
        SaveOutcome::SavedOffline { entry_id, notify } => {
            if notify {
                println!(
                    "{} You're offline. {} will sync when you reconnect.",
                    "Saved offline.".yellow(),
                    name.bold()
                );
            } else {
                println!(
                    "{} Could not reach the server, {} was queued.",
                    "Saved offline.".yellow(),
                    name.bold()
                );
            }
            println!("  Pending entry: {}", entry_id.cyan());
        }
    }
    Ok(())
}

pub async fn handle_lists(ctx: &CommandContext, user: String, json: bool) -> Result<()> {
    let lists = ctx.save_service()?.lists(&user).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&lists)?);
        return Ok(());
    }

    if lists.is_empty() {
        println!("{}", "No saved lists.".dimmed());
        return Ok(());
    }
    for list in &lists {
        let id = if list.offline {
            list.id.yellow()
        } else {
            list.id.cyan()
        };
        println!(
            "{} {} ({} values, updated {})",
            id,
            list.list_name.bold(),
            list.value_count,
            list.updated_at
        );
    }
    Ok(())
}

pub async fn handle_load(
    ctx: &CommandContext,
    list_id: String,
    user: String,
    force: bool,
) -> Result<()> {
    let board = ctx.save_service()?.load(&user, &list_id).await?;
    let mut controller = ctx.controller();

    if !force
        && controller.board().selected_len() > 0
        && !confirm("Loading a new list will replace your current values. Continue?")?
    {
        println!("Cancelled.");
        return Ok(());
    }

    controller.replace(board)?;
    warn_backup(controller.backup_status());

    println!("{} {}", "Loaded".green(), list_id.cyan());
    print_selected(controller.board());
    Ok(())
}

pub async fn handle_delete(
    ctx: &CommandContext,
    list_id: String,
    user: String,
    force: bool,
) -> Result<()> {
    if !force && !confirm(&format!("Delete list {} permanently?", list_id.cyan()))? {
        println!("Cancelled.");
        return Ok(());
    }

    ctx.save_service()?.delete(&user, &list_id).await?;
    println!("{} {}", "Deleted".red(), list_id.cyan());
    Ok(())
}
