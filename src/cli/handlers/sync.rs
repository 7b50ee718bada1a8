use anyhow::Result;
use colored::Colorize;

use super::CommandContext;
use super::utils::print_queue_entry;

pub fn handle_pending(ctx: &CommandContext, user: String, json: bool) -> Result<()> {
    let pending = ctx.save_service()?.queue().pending(&user)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&pending)?);
        return Ok(());
    }

    if pending.is_empty() {
        println!("{}", "No pending saves.".dimmed());
        return Ok(());
    }
    for entry in &pending {
        print_queue_entry(entry);
    }
    Ok(())
}

pub fn handle_discard(ctx: &CommandContext, entry_id: String) -> Result<()> {
    ctx.save_service()?.queue().discard(&entry_id)?;
    println!("{} {}", "Discarded".red(), entry_id.cyan());
    Ok(())
}

pub async fn handle_sync(ctx: &CommandContext, user: String) -> Result<()> {
    let service = ctx.save_service()?;
    let report = service.replay(&user).await?;

    let message = report.message();
    if report.failed > 0 || report.dropped > 0 || report.skipped > 0 {
        println!("{}", message.yellow());
        for entry in service.queue().pending(&user)? {
            print_queue_entry(&entry);
        }
    } else {
        println!("{}", message.green());
    }
    Ok(())
}
