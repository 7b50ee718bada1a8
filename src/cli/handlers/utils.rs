use crate::model::{Board, GroupId, MAX_SELECTED};
use crate::storage::BackupStatus;
use crate::sync::QueueEntry;
use colored::Colorize;
use std::io::{self, Write};

pub fn print_board(board: &Board) {
    let selected = board.group(GroupId::Selected);
    println!(
        "{} ({}/{})",
        GroupId::Selected.title().bold(),
        selected.len(),
        MAX_SELECTED
    );
    if selected.is_empty() {
        println!("  {}", "Nothing picked yet. Try `valuerank pick <value>`.".dimmed());
    }
    for (i, value) in selected.values.iter().enumerate() {
        println!(
            "  {:>2}. {} {}",
            i + 1,
            value.content.green(),
            format!("({})", value.origin_group).dimmed()
        );
    }

    for group_id in GroupId::SOURCES {
        let group = board.group(group_id);
        println!();
        println!("{} ({})", group_id.title().bold(), group.len());
        for (i, value) in group.values.iter().enumerate() {
            println!("  {:>2}. {} {}", i + 1, value.content, value.id.dimmed());
        }
    }
}

pub fn print_selected(board: &Board) {
    let selected = board.selected();
    println!(
        "{} ({}/{})",
        GroupId::Selected.title().bold(),
        selected.len(),
        MAX_SELECTED
    );
    for (i, value) in selected.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, value.content.green());
    }
}

pub fn warn_backup(status: &BackupStatus) {
    if let BackupStatus::Failed(reason) = status {
        eprintln!("{} {}", "Warning:".yellow(), reason);
    }
}

pub fn print_queue_entry(entry: &QueueEntry) {
    let kind = match &entry.list_id {
        Some(id) => format!("update {}", id),
        None => "new list".to_string(),
    };
    println!(
        "{} {} [{}] {} value(s), queued {}",
        entry.id.cyan(),
        entry.name.bold(),
        kind,
        entry.values.len(),
        entry.timestamp.format("%Y-%m-%d %H:%M")
    );
    if let Some(err) = &entry.last_error {
        println!(
            "    {} after {} attempt(s): {}",
            "last error".red(),
            entry.attempts,
            err
        );
    }
}

/// Asks a yes/no question on stdin. Anything but `y` means no.
pub fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
