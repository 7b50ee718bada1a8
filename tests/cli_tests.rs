use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn valuerank_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("valuerank"));
    cmd.env_remove("VALUERANK_USER").env_remove("RUST_LOG");
    cmd
}

fn init_project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    valuerank_cmd()
        .arg("init")
        .current_dir(temp_dir.path())
        .assert()
        .success();
    temp_dir
}

fn run_json(dir: &TempDir, args: &[&str]) -> serde_json::Value {
    let output = valuerank_cmd()
        .args(args)
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "{:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn selected_contents(dir: &TempDir) -> Vec<String> {
    let board = run_json(dir, &["board", "--json"]);
    board["column4"]["values"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["content"].as_str().unwrap().to_string())
        .collect()
}

fn pick(dir: &TempDir, value: &str) {
    valuerank_cmd()
        .args(["pick", value])
        .current_dir(dir.path())
        .assert()
        .success();
}

// =============================================================================
// Basic CLI
// =============================================================================

#[test]
fn test_help() {
    valuerank_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("top ten personal values"));
}

#[test]
fn test_version() {
    valuerank_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("valuerank"));
}

#[test]
fn test_not_initialized_error() {
    let temp_dir = TempDir::new().unwrap();

    valuerank_cmd()
        .arg("board")
        .current_dir(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

// =============================================================================
// Initialization
// =============================================================================

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();

    valuerank_cmd()
        .arg("init")
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    assert!(temp_dir.path().join(".valuerank.toml").exists());
    assert!(temp_dir.path().join(".valuerank").exists());
}

#[test]
fn test_init_twice_fails() {
    let temp_dir = init_project();

    valuerank_cmd()
        .arg("init")
        .current_dir(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn test_init_with_remote_url() {
    let temp_dir = TempDir::new().unwrap();

    valuerank_cmd()
        .args(["init", "--remote", "http://localhost:4000"])
        .current_dir(temp_dir.path())
        .assert()
        .success();

    let config = std::fs::read_to_string(temp_dir.path().join(".valuerank.toml")).unwrap();
    assert!(config.contains("http://localhost:4000"));
}

// =============================================================================
// Catalog and board
// =============================================================================

#[test]
fn test_catalog_lists_all_groups() {
    let temp_dir = init_project();

    valuerank_cmd()
        .arg("catalog")
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Personal Values"))
        .stdout(predicate::str::contains("Family"))
        .stdout(predicate::str::contains("value-60"));

    let groups = run_json(&temp_dir, &["catalog", "--json"]);
    let total: usize = groups
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["values"].as_array().unwrap().len())
        .sum();
    assert_eq!(total, 60);
}

#[test]
fn test_fresh_board_has_nothing_selected() {
    let temp_dir = init_project();
    assert!(selected_contents(&temp_dir).is_empty());

    let board = run_json(&temp_dir, &["board", "--json"]);
    assert_eq!(board["column1"]["values"].as_array().unwrap().len(), 20);
    assert_eq!(board["column4"]["title"], "Your Top Values");
}

#[test]
fn test_pick_persists_between_runs() {
    let temp_dir = init_project();
    pick(&temp_dir, "Family");
    pick(&temp_dir, "love");

    assert_eq!(selected_contents(&temp_dir), vec!["Family", "Love"]);

    let board = run_json(&temp_dir, &["board", "--json"]);
    assert_eq!(board["column1"]["values"].as_array().unwrap().len(), 19);
    assert_eq!(board["column3"]["values"].as_array().unwrap().len(), 19);
}

#[test]
fn test_pick_again_returns_value_to_its_group() {
    let temp_dir = init_project();
    let before = run_json(&temp_dir, &["board", "--json"]);

    pick(&temp_dir, "Kindness");
    pick(&temp_dir, "Kindness");

    let after = run_json(&temp_dir, &["board", "--json"]);
    assert_eq!(before, after);
}

#[test]
fn test_pick_unknown_value_fails() {
    let temp_dir = init_project();

    valuerank_cmd()
        .args(["pick", "Telepathy"])
        .current_dir(temp_dir.path())
        .assert()
        .failure();
}

#[test]
fn test_eleventh_pick_is_rejected() {
    let temp_dir = init_project();
    for n in 1..=10 {
        pick(&temp_dir, &format!("value-{}", n));
    }

    valuerank_cmd()
        .args(["pick", "value-41"])
        .current_dir(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Maximum of 10 priorities reached"));

    let selected = selected_contents(&temp_dir);
    assert_eq!(selected.len(), 10);
    assert!(!selected.contains(&"Family".to_string()));
}

#[test]
fn test_move_reorders_selection() {
    let temp_dir = init_project();
    pick(&temp_dir, "Family");
    pick(&temp_dir, "Joy");

    valuerank_cmd()
        .args(["move", "selected", "2", "selected", "1"])
        .current_dir(temp_dir.path())
        .assert()
        .success();

    assert_eq!(selected_contents(&temp_dir), vec!["Joy", "Family"]);
}

#[test]
fn test_move_into_selection_at_position() {
    let temp_dir = init_project();
    pick(&temp_dir, "Family");

    // Personal position 1 is "Love"
    valuerank_cmd()
        .args(["move", "personal", "1", "selected", "1"])
        .current_dir(temp_dir.path())
        .assert()
        .success();

    assert_eq!(selected_contents(&temp_dir), vec!["Love", "Family"]);
}

#[test]
fn test_move_rejects_position_zero() {
    let temp_dir = init_project();

    valuerank_cmd()
        .args(["move", "personal", "0", "selected", "1"])
        .current_dir(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Positions start at 1"));
}

#[test]
fn test_clear_empties_selection() {
    let temp_dir = init_project();
    pick(&temp_dir, "Family");
    pick(&temp_dir, "Joy");

    valuerank_cmd()
        .arg("clear")
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared"));

    assert!(selected_contents(&temp_dir).is_empty());
}

// =============================================================================
// Saving and loading
// =============================================================================

#[test]
fn test_save_list_load_round_trip() {
    let temp_dir = init_project();
    pick(&temp_dir, "Family");
    pick(&temp_dir, "Joy");
    pick(&temp_dir, "Courage");

    let saved = run_json(
        &temp_dir,
        &["save", "Spring", "--user", "alice", "--json"],
    );
    assert_eq!(saved["action"], "saved");
    let list_id = saved["listId"].as_str().unwrap().to_string();

    let lists = run_json(&temp_dir, &["lists", "--user", "alice", "--json"]);
    assert_eq!(lists.as_array().unwrap().len(), 1);
    assert_eq!(lists[0]["listName"], "Spring");
    assert_eq!(lists[0]["valueCount"], 3);

    valuerank_cmd()
        .arg("clear")
        .current_dir(temp_dir.path())
        .assert()
        .success();

    valuerank_cmd()
        .args(["load", &list_id, "--user", "alice"])
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded"));

    assert_eq!(selected_contents(&temp_dir), vec!["Family", "Joy", "Courage"]);
}

#[test]
fn test_user_from_environment() {
    let temp_dir = init_project();
    pick(&temp_dir, "Family");

    valuerank_cmd()
        .args(["save", "Env"])
        .env("VALUERANK_USER", "bob")
        .current_dir(temp_dir.path())
        .assert()
        .success();

    let lists = run_json(&temp_dir, &["lists", "--user", "bob", "--json"]);
    assert_eq!(lists.as_array().unwrap().len(), 1);
}

#[test]
fn test_lists_are_private_per_user() {
    let temp_dir = init_project();
    pick(&temp_dir, "Family");
    run_json(&temp_dir, &["save", "Mine", "--user", "alice", "--json"]);

    let lists = run_json(&temp_dir, &["lists", "--user", "bob", "--json"]);
    assert!(lists.as_array().unwrap().is_empty());
}

#[test]
fn test_update_existing_list() {
    let temp_dir = init_project();
    pick(&temp_dir, "Family");
    let saved = run_json(&temp_dir, &["save", "Mine", "--user", "alice", "--json"]);
    let list_id = saved["listId"].as_str().unwrap().to_string();

    pick(&temp_dir, "Joy");
    let updated = run_json(
        &temp_dir,
        &["save", "Mine v2", "--user", "alice", "--list", &list_id, "--json"],
    );
    assert_eq!(updated["listId"], list_id.as_str());

    let lists = run_json(&temp_dir, &["lists", "--user", "alice", "--json"]);
    assert_eq!(lists.as_array().unwrap().len(), 1);
    assert_eq!(lists[0]["listName"], "Mine v2");
    assert_eq!(lists[0]["valueCount"], 2);
}

#[test]
fn test_update_missing_list_fails_without_queueing() {
    let temp_dir = init_project();
    pick(&temp_dir, "Family");

    valuerank_cmd()
        .args(["save", "Mine", "--user", "alice", "--list", "nope"])
        .current_dir(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not find list to update"));

    let pending = run_json(&temp_dir, &["pending", "--user", "alice", "--json"]);
    assert!(pending.as_array().unwrap().is_empty());
}

#[test]
fn test_save_requires_a_name() {
    let temp_dir = init_project();

    valuerank_cmd()
        .args(["save", "  ", "--user", "alice"])
        .current_dir(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a name"));
}

#[test]
fn test_load_missing_list_fails() {
    let temp_dir = init_project();

    valuerank_cmd()
        .args(["load", "missing", "--user", "alice"])
        .current_dir(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load list"));
}

#[test]
fn test_load_over_selection_asks_first() {
    let temp_dir = init_project();
    pick(&temp_dir, "Family");
    let saved = run_json(&temp_dir, &["save", "Mine", "--user", "alice", "--json"]);
    let list_id = saved["listId"].as_str().unwrap().to_string();
    pick(&temp_dir, "Joy");

    valuerank_cmd()
        .args(["load", &list_id, "--user", "alice"])
        .write_stdin("n\n")
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("replace your current values"))
        .stdout(predicate::str::contains("Cancelled"));
    assert_eq!(selected_contents(&temp_dir), vec!["Family", "Joy"]);

    valuerank_cmd()
        .args(["load", &list_id, "--user", "alice"])
        .write_stdin("y\n")
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded"));
    assert_eq!(selected_contents(&temp_dir), vec!["Family"]);

    pick(&temp_dir, "Joy");
    valuerank_cmd()
        .args(["load", &list_id, "--user", "alice", "--force"])
        .current_dir(temp_dir.path())
        .assert()
        .success();
    assert_eq!(selected_contents(&temp_dir), vec!["Family"]);
}

#[test]
fn test_delete_with_force() {
    let temp_dir = init_project();
    pick(&temp_dir, "Family");
    let saved = run_json(&temp_dir, &["save", "Mine", "--user", "alice", "--json"]);
    let list_id = saved["listId"].as_str().unwrap().to_string();

    valuerank_cmd()
        .args(["delete", &list_id, "--user", "alice", "--force"])
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted"));

    let lists = run_json(&temp_dir, &["lists", "--user", "alice", "--json"]);
    assert!(lists.as_array().unwrap().is_empty());
}

#[test]
fn test_delete_cancelled_without_confirmation() {
    let temp_dir = init_project();
    pick(&temp_dir, "Family");
    let saved = run_json(&temp_dir, &["save", "Mine", "--user", "alice", "--json"]);
    let list_id = saved["listId"].as_str().unwrap().to_string();

    valuerank_cmd()
        .args(["delete", &list_id, "--user", "alice"])
        .write_stdin("n\n")
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled"));

    let lists = run_json(&temp_dir, &["lists", "--user", "alice", "--json"]);
    assert_eq!(lists.as_array().unwrap().len(), 1);
}

// =============================================================================
// Offline queue
// =============================================================================

#[test]
fn test_offline_save_is_queued_then_synced() {
    let temp_dir = init_project();
    pick(&temp_dir, "Family");

    valuerank_cmd()
        .args(["--offline", "save", "Trip", "--user", "alice"])
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved offline."));

    let pending = run_json(&temp_dir, &["pending", "--user", "alice", "--json"]);
    let pending = pending.as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["userId"], "alice");
    assert!(pending[0].get("listId").is_none());
    assert!(temp_dir.path().join(".valuerank/local/offline_saves.json").exists());

    let lists = run_json(&temp_dir, &["lists", "--user", "alice", "--json"]);
    let lists = lists.as_array().unwrap();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0]["listName"], "Trip (Offline)");
    assert_eq!(lists[0]["offline"], true);
    assert_eq!(lists[0]["id"], pending[0]["id"]);

    valuerank_cmd()
        .args(["sync", "--user", "alice"])
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Synced 1 offline change"));

    let pending = run_json(&temp_dir, &["pending", "--user", "alice", "--json"]);
    assert!(pending.as_array().unwrap().is_empty());
    let lists = run_json(&temp_dir, &["lists", "--user", "alice", "--json"]);
    assert_eq!(lists.as_array().unwrap().len(), 1);
    assert_eq!(lists[0]["listName"], "Trip");
    assert_eq!(lists[0]["offline"], false);
}

#[test]
fn test_sync_only_replays_requesting_user() {
    let temp_dir = init_project();
    pick(&temp_dir, "Family");
    for user in ["alice", "bob"] {
        valuerank_cmd()
            .args(["--offline", "save", "Queued", "--user", user])
            .current_dir(temp_dir.path())
            .assert()
            .success();
    }

    valuerank_cmd()
        .args(["sync", "--user", "alice"])
        .current_dir(temp_dir.path())
        .assert()
        .success();

    let bob_pending = run_json(&temp_dir, &["pending", "--user", "bob", "--json"]);
    assert_eq!(bob_pending.as_array().unwrap().len(), 1);
}

#[test]
fn test_sync_with_nothing_pending() {
    let temp_dir = init_project();

    valuerank_cmd()
        .args(["sync", "--user", "alice"])
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to sync"));
}

#[test]
fn test_discard_pending_save() {
    let temp_dir = init_project();
    pick(&temp_dir, "Family");
    let queued = run_json(
        &temp_dir,
        &["--offline", "save", "Trip", "--user", "alice", "--json"],
    );
    assert_eq!(queued["action"], "queued");
    assert_eq!(queued["offline"], true);
    let entry_id = queued["entryId"].as_str().unwrap().to_string();

    valuerank_cmd()
        .args(["discard", &entry_id])
        .current_dir(temp_dir.path())
        .assert()
        .success();

    let pending = run_json(&temp_dir, &["pending", "--user", "alice", "--json"]);
    assert!(pending.as_array().unwrap().is_empty());
}

// =============================================================================
// Local-only mode
// =============================================================================

#[test]
fn test_unusable_local_storage_falls_back_to_local_only() {
    let temp_dir = init_project();
    let local = temp_dir.path().join(".valuerank/local");
    if local.exists() {
        std::fs::remove_dir_all(&local).unwrap();
    }
    std::fs::write(&local, "not a directory").unwrap();

    valuerank_cmd()
        .args(["pick", "Family"])
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("local-only"));

    // Nothing was persisted, so the next run starts from a fresh board
    assert!(selected_contents(&temp_dir).is_empty());
}

#[test]
fn test_configured_log_file_is_written_under_data_dir() {
    let temp_dir = init_project();
    std::fs::write(
        temp_dir.path().join(".valuerank.toml"),
        "[logging]\nlevel = \"debug\"\nfile = \"logs/valuerank.log\"\n",
    )
    .unwrap();

    pick(&temp_dir, "Family");

    let log_dir = temp_dir.path().join(".valuerank/logs");
    let logs: Vec<_> = std::fs::read_dir(&log_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(
        logs.iter().any(|name| name.starts_with("valuerank.log")),
        "no log file in {:?}",
        logs
    );
}
