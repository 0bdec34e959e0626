use budget_pacer::{
    document::{Account, Budget, StoredDocument},
    screen::Screen,
    session::Session,
    storage::DocumentStore,
};
use chrono::{TimeZone, Utc};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn store_in(temp: &TempDir) -> DocumentStore {
    DocumentStore::new(Some(temp.path().to_path_buf()), Some(2)).expect("document store")
}

fn sample_document() -> StoredDocument {
    let mut doc = StoredDocument::default();
    doc.accounts.insert(1, Account::new("Checking", 120.5));
    doc.budgets.insert(
        2,
        Budget {
            name: "January".into(),
            accounts: vec![1],
            first_day: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            last_day: None,
            starting_balance: 120.5,
            target_balance: 0.0,
        },
    );
    doc.fresh_id = 3;
    doc
}

fn tmp_path_for(path: &Path) -> std::path::PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.tmp", existing),
        None => String::from("tmp"),
    };
    tmp.set_extension(ext);
    tmp
}

#[test]
fn atomic_save_failure_preserves_original_file() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);

    store.save(&sample_document()).expect("initial save");
    let original = fs::read_to_string(store.state_path()).expect("read original file");

    // Create a directory that collides with the temp file name to force
    // File::create to fail.
    let tmp_path = tmp_path_for(store.state_path());
    fs::create_dir_all(&tmp_path).unwrap();

    let mut changed = sample_document();
    changed.accounts.insert(9, Account::new("Savings", 1.0));
    let result = store.save(&changed);
    assert!(
        result.is_err(),
        "expected save to fail when the temp path is a directory"
    );

    let current = fs::read_to_string(store.state_path()).expect("read after failure");
    assert_eq!(
        current, original,
        "atomic save failure must not corrupt the original file"
    );

    let _ = fs::remove_dir_all(&tmp_path);
}

#[test]
fn failed_commit_leaves_the_session_on_the_previous_state() {
    let temp = TempDir::new().unwrap();
    let mut session = Session::open(store_in(&temp)).expect("open");
    let id = session.add_account().expect("account id");
    session
        .save_account(Account::new("Checking", 10.0))
        .expect("save account");
    let before = session.document().clone();

    let state_path = temp.path().join("app-state.json");
    let tmp_path = tmp_path_for(&state_path);
    fs::create_dir_all(&tmp_path).unwrap();

    session.navigate(&Screen::EditAccount { id }.hash());
    let result = session.save_account(Account::new("Broken", 0.0));
    assert!(result.is_err(), "commit should surface the write failure");
    assert_eq!(session.document(), &before);

    let _ = fs::remove_dir_all(&tmp_path);
}

#[test]
fn backups_accumulate_and_prune_to_retention() {
    let temp = TempDir::new().unwrap();
    let store = DocumentStore::new(Some(temp.path().to_path_buf()), Some(1)).expect("store");

    for round in 0..3 {
        let mut doc = sample_document();
        doc.fresh_id += round;
        store.save(&doc).expect("save");
    }

    let backups = store.list_backups().expect("list backups");
    assert!(!backups.is_empty(), "expected a backup after repeated saves");
    assert!(
        backups.len() <= 1,
        "retention of 1 should prune older backups, got {backups:?}"
    );
}

#[test]
fn export_then_import_round_trips_the_document() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);
    let doc = sample_document();

    let export = temp.path().join("exports").join("budget.json");
    store.export_to_path(&doc, &export).expect("export");
    let imported = store.import_from_path(&export).expect("import");
    assert_eq!(imported, doc);
}

#[test]
fn import_replaces_the_whole_document() {
    let temp = TempDir::new().unwrap();
    let mut session = Session::open(store_in(&temp)).expect("open");

    session.add_account().expect("account id");
    session
        .save_account(Account::new("Old Checking", 5.0))
        .expect("save account");

    let replacement = sample_document();
    session.replace_all(replacement.clone()).expect("import");

    assert_eq!(session.document(), &replacement);
    assert_eq!(session.screen(), Screen::ViewAccounts);
    assert!(
        session
            .document()
            .accounts
            .values()
            .all(|account| account.name != "Old Checking"),
        "nothing from the prior document may survive an import"
    );

    // The replacement also hit the disk.
    let store = store_in(&temp);
    assert_eq!(store.load().expect("reload"), replacement);

    let exported = session.export_json().expect("export");
    assert!(exported.contains("\"freshId\": 3"));
    assert!(exported.contains("\"January\""));
}

#[test]
fn reset_drops_local_data() {
    let temp = TempDir::new().unwrap();
    let mut session = Session::open(store_in(&temp)).expect("open");
    session.add_account().expect("account id");
    session
        .save_account(Account::new("Checking", 5.0))
        .expect("save account");

    session.reset().expect("reset");
    assert_eq!(session.document(), &StoredDocument::default());
    assert_eq!(
        store_in(&temp).load().expect("reload"),
        StoredDocument::default()
    );
}

#[test]
fn wire_format_matches_the_stored_layout() {
    let temp = TempDir::new().unwrap();
    let store = store_in(&temp);
    store.save(&sample_document()).expect("save");

    let raw = fs::read_to_string(store.state_path()).expect("read state file");
    let value: Value = serde_json::from_str(&raw).expect("parse state file");

    assert_eq!(value["freshId"], 3);
    assert_eq!(value["accounts"]["1"]["name"], "Checking");
    assert_eq!(value["accounts"]["1"]["balance"], 120.5);
    assert_eq!(value["budgets"]["2"]["accounts"], serde_json::json!([1]));
    assert_eq!(value["budgets"]["2"]["firstDay"], "2024-01-01T00:00:00.000Z");
    assert_eq!(value["budgets"]["2"]["lastDay"], "");
    assert_eq!(value["budgets"]["2"]["startingBalance"], 120.5);
    assert_eq!(value["budgets"]["2"]["targetBalance"], 0.0);
}
