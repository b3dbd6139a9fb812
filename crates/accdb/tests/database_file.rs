use accdb::commands::{dump, grep, maintenance, merge};
use accdb::database::FlushOutcome;
use accdb::session::Session;
use accdb::Database;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const ACCOUNTS: &str = "; vim: ft=accdb:
= mail.example.org
\t{9c2f1f6e-8f0e-4f7e-9a57-0b4f0d7c2d11}
\thost: imap.example.org
\tlogin: alice
\tpass: hunter2
\t+ mail, work

= _Zebra Bank
\t{00000000-0000-4000-8000-000000000002}
\tlogin: z123
\tpass: correct horse
\t+ money

= apple id
\t{00000000-0000-4000-8000-000000000003}
\temail: alice@example.org
\t+ phone

; dbflags: cache
";

fn setup() -> (TempDir, PathBuf, PathBuf) {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("accounts.db.txt");
    let cache_path = dir.path().join("accounts.cache.txt");
    fs::write(&db_path, ACCOUNTS).unwrap();
    (dir, db_path, cache_path)
}

#[test]
fn test_untouched_file_is_not_rewritten() {
    let (_dir, db_path, cache_path) = setup();
    let session = Session::open(&db_path, &cache_path).unwrap();
    assert_eq!(session.close().unwrap().flush, FlushOutcome::Clean);
    assert_eq!(fs::read_to_string(&db_path).unwrap(), ACCOUNTS);
}

#[test]
fn test_touch_rewrites_identically() {
    let (_dir, db_path, cache_path) = setup();
    let mut session = Session::open(&db_path, &cache_path).unwrap();
    maintenance::touch(&mut session.db).unwrap();
    session.close().unwrap();

    assert_eq!(fs::read_to_string(&db_path).unwrap(), ACCOUNTS);
    assert_eq!(fs::read_to_string(&cache_path).unwrap(), ACCOUNTS);
}

#[test]
fn test_sort_persists_and_keeps_item_numbers_within_session() {
    let (_dir, db_path, cache_path) = setup();
    let mut session = Session::open(&db_path, &cache_path).unwrap();
    maintenance::sort(&mut session.db).unwrap();

    let names: Vec<&str> = session.db.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["apple id", "mail.example.org", "_Zebra Bank"]);
    assert_eq!(session.db.find_by_itemno(2).unwrap().name, "_Zebra Bank");
    session.close().unwrap();

    let reloaded = Database::from_file(&db_path).unwrap();
    assert_eq!(reloaded.find_by_itemno(1).unwrap().name, "apple id");
}

#[test]
fn test_merge_archives_password_on_disk() {
    let (_dir, db_path, cache_path) = setup();
    let mut session = Session::open(&db_path, &cache_path).unwrap();
    let update = "= mail.example.org
\t{9c2f1f6e-8f0e-4f7e-9a57-0b4f0d7c2d11}
\tlogin: alice
\tpass: new-secret
";
    merge::run(&mut session.db, update).unwrap();
    let report = session.close().unwrap();
    assert_eq!(report.flush, FlushOutcome::Written);
    assert!(report.mirrored);

    let text = fs::read_to_string(&db_path).unwrap();
    assert!(text.contains("\tpass: new-secret\n"));
    assert!(text.contains("\t!pass.old: hunter2 (until "));
    assert!(!text.contains("imap.example.org"));

    let reloaded = Database::from_file(&db_path).unwrap();
    let entry = reloaded.find_by_itemno(1).unwrap();
    assert!(entry.values("!pass.old").unwrap()[0].is_confidential());
}

#[test]
fn test_tombstoned_entry_stays_on_disk_but_not_in_results() {
    let (_dir, db_path, cache_path) = setup();
    let mut session = Session::open(&db_path, &cache_path).unwrap();
    let mut zebra = session.db.find_by_itemno(2).unwrap().clone();
    zebra.tombstone();
    session.db.replace(zebra).unwrap();
    session.close().unwrap();

    let db = Database::from_file(&db_path).unwrap();
    assert!(db.find_by_itemno(2).unwrap().is_deleted());
    assert_eq!(db.find_by_itemno(3).unwrap().itemno, Some(3));

    let listed = grep::run::<&str>(&db, &[]).unwrap().listed_entries;
    assert_eq!(listed.len(), 2);

    let safe = dump::render(&db, dump::DumpFormat::Safe).unwrap();
    assert!(!safe.contains("Zebra"));
}

#[test]
fn test_conceal_flag_hides_passwords_on_disk() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("db.txt");
    fs::write(&db_path, "= a\npass: hunter2\n; dbflags: conceal\n").unwrap();

    let mut session = Session::open(&db_path, &dir.path().join("cache")).unwrap();
    session.db.touch();
    session.close().unwrap();

    let text = fs::read_to_string(&db_path).unwrap();
    assert!(!text.contains("hunter2"));
    assert!(text.contains("pass: <base64> aHVudGVyMg=="));

    let db = Database::from_file(&db_path).unwrap();
    assert_eq!(
        db.find_by_itemno(1).unwrap().values("pass").unwrap()[0].reveal(),
        "hunter2"
    );
}

#[test]
fn test_readonly_cache_discards_changes() {
    let (dir, _db_path, cache_path) = setup();
    fs::write(&cache_path, ACCOUNTS).unwrap();

    let mut session = Session::open(&dir.path().join("gone.txt"), &cache_path).unwrap();
    assert!(session.using_cache());
    maintenance::sort(&mut session.db).unwrap();
    assert_eq!(session.close().unwrap().flush, FlushOutcome::Discarded);
    assert_eq!(fs::read_to_string(&cache_path).unwrap(), ACCOUNTS);
}
