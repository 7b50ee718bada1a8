use crate::error::RankError;
use crate::model::GroupId;
use crate::reorder::Slot;
use anyhow::Result;
use colored::Colorize;

use super::CommandContext;
use super::utils::{print_board, print_selected, warn_backup};

pub fn handle_catalog(ctx: &CommandContext, json: bool) -> Result<()> {
    if json {
        let groups: Vec<_> = GroupId::SOURCES
            .iter()
            .map(|g| {
                serde_json::json!({
                    "id": g.wire_name(),
                    "title": g.title(),
                    "values": ctx.catalog.group(*g),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    for (n, group_id) in GroupId::SOURCES.into_iter().enumerate() {
        if n > 0 {
            println!();
        }
        println!("{}", group_id.title().bold());
        for value in ctx.catalog.group(group_id) {
            println!("  {:<10} {}", value.id.dimmed(), value.content);
        }
    }
    Ok(())
}

pub fn handle_board(ctx: &CommandContext, json: bool) -> Result<()> {
    let controller = ctx.controller();
    if json {
        println!("{}", serde_json::to_string_pretty(controller.board())?);
    } else {
        print_board(controller.board());
    }
    Ok(())
}

pub fn handle_pick(ctx: &CommandContext, value: String) -> Result<()> {
    let mut controller = ctx.controller();
    controller.pick(&value)?;
    warn_backup(controller.backup_status());
    print_selected(controller.board());
    Ok(())
}

fn to_slot(group: GroupId, position: usize) -> Result<Slot> {
    if position == 0 {
        return Err(RankError::Validation("Positions start at 1".to_string()).into());
    }
    Ok(Slot::new(group, position - 1))
}

pub fn handle_move(
    ctx: &CommandContext,
    from_group: GroupId,
    from_position: usize,
    to_group: GroupId,
    to_position: usize,
) -> Result<()> {
    let from = to_slot(from_group, from_position)?;
    let to = to_slot(to_group, to_position)?;

    let mut controller = ctx.controller();
    if !controller.move_value(from, to)? {
        println!("{}", "Nothing to move.".dimmed());
        return Ok(());
    }
    warn_backup(controller.backup_status());
    print_selected(controller.board());
    Ok(())
}

pub fn handle_clear(ctx: &CommandContext) -> Result<()> {
    let mut controller = ctx.controller();
    if controller.clear()? {
        warn_backup(controller.backup_status());
        println!("{} your top values", "Cleared".green());
    } else {
        println!("{}", "Nothing selected.".dimmed());
    }
    Ok(())
}
