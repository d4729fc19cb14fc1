use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn heading_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("heading");
    path
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

fn setup_vault() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    write(root, "00-INBOX/daily-notes/2025-07-22.md", "# Tuesday\n");
    write(root, "projects/backup-system/README.md", "# Backup\n");
    write(
        root,
        "projects/backup-system-summary.md",
        "---\ntags:\n- backup\n---\nSummary body.\n",
    );
    write(root, "04-TEMPLATES/project-template.md", "## Goals\n");
    write(
        root,
        "notes/done.md",
        "---\nheading: Already There\n---\nbody\n",
    );
    write(
        root,
        "notes/broken.md",
        "---\ntitle: [unclosed\n---\nbody\n",
    );
    write(root, "drawings/sketch.excalidraw.md", "{}\n");
    write(root, ".obsidian/workspace.md", "internal\n");
    write(root, "notes/plain.txt", "not markdown\n");

    tmp
}

fn run_heading(args: &[&str]) -> (String, String, bool) {
    let binary = heading_binary();
    let output = Command::new(&binary)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run heading binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn run_vault(vault: &Path, extra: &[&str]) -> (String, String, bool) {
    let vault = vault.to_str().unwrap();
    let mut args = vec!["run", vault, "--report", "human"];
    args.extend_from_slice(extra);
    run_heading(&args)
}

#[test]
fn test_run_labels_vault() {
    let tmp = setup_vault();
    let root = tmp.path();
    let (stdout, stderr, success) = run_vault(root, &["--title-case"]);
    assert!(success, "run failed: {}", stderr);

    assert_eq!(
        read(root, "00-INBOX/daily-notes/2025-07-22.md"),
        "---\nheading: Daily Note 2025-07-22\n---\n\n# Tuesday\n"
    );
    assert_eq!(
        read(root, "projects/backup-system/README.md"),
        "---\nheading: Backup System - README\n---\n\n# Backup\n"
    );
    assert_eq!(
        read(root, "projects/backup-system-summary.md"),
        "---\ntags:\n- backup\nheading: Backup System - Summary\n---\nSummary body.\n"
    );
    assert!(read(root, "04-TEMPLATES/project-template.md").contains("Template: project-template"));

    assert!(stdout.contains("✓ Added heading to: 00-INBOX/daily-notes/2025-07-22.md"));
    assert!(stdout.contains("⚠ Skipped (has heading): notes/done.md"));
    assert!(stdout.contains("✗ Error processing notes/broken.md (malformed metadata)"));
    assert!(stdout.contains("Found 6 markdown files"));
    assert!(stdout.contains("  Processed:           4"));
    assert!(stdout.contains("  Skipped (existing):  1"));
    assert!(stdout.contains("  Skipped (special):   1"));
    assert!(stdout.contains("  Errors:              1"));
    assert!(stdout.contains("  Total files:         7"));
}

#[test]
fn test_run_leaves_untouched_files_alone() {
    let tmp = setup_vault();
    let root = tmp.path();
    let (_, stderr, success) = run_vault(root, &[]);
    assert!(success, "run failed: {}", stderr);

    assert_eq!(read(root, "notes/done.md"), "---\nheading: Already There\n---\nbody\n");
    assert_eq!(read(root, "notes/broken.md"), "---\ntitle: [unclosed\n---\nbody\n");
    assert_eq!(read(root, "drawings/sketch.excalidraw.md"), "{}\n");
    assert_eq!(read(root, ".obsidian/workspace.md"), "internal\n");
    assert_eq!(read(root, "notes/plain.txt"), "not markdown\n");
}

#[test]
fn test_run_dry_run() {
    let tmp = setup_vault();
    let root = tmp.path();
    let (stdout, stderr, success) = run_vault(root, &["--dry-run"]);
    assert!(success, "dry run failed: {}", stderr);

    assert!(stdout.contains("DRY RUN"));
    assert!(stdout.contains("✓ Would add heading to: 00-INBOX/daily-notes/2025-07-22.md"));
    assert!(stdout.contains("SUMMARY (dry run)"));
    assert_eq!(read(root, "00-INBOX/daily-notes/2025-07-22.md"), "# Tuesday\n");
    assert_eq!(read(root, "projects/backup-system/README.md"), "# Backup\n");
}

#[test]
fn test_run_idempotent() {
    let tmp = setup_vault();
    let root = tmp.path();
    let (_, _, first_ok) = run_vault(root, &["--title-case"]);
    assert!(first_ok);
    let after_first = read(root, "projects/backup-system-summary.md");

    let (stdout, _, second_ok) = run_vault(root, &["--title-case"]);
    assert!(second_ok);
    assert!(stdout.contains("  Processed:           0"));
    assert!(stdout.contains("  Skipped (existing):  5"));
    assert_eq!(read(root, "projects/backup-system-summary.md"), after_first);
}

#[test]
fn test_run_backup() {
    let tmp = setup_vault();
    let root = tmp.path();
    let (_, stderr, success) = run_vault(root, &["--backup"]);
    assert!(success, "run failed: {}", stderr);

    assert_eq!(read(root, "projects/backup-system/README.md.bak"), "# Backup\n");
    assert!(!root.join("notes/done.md.bak").exists());
    assert!(!root.join("notes/broken.md.bak").exists());
}

#[test]
fn test_run_exclude_dirs() {
    let tmp = setup_vault();
    let root = tmp.path();
    let (stdout, _, success) = run_vault(root, &["--exclude-dirs", "projects,04-TEMPLATES"]);
    assert!(success);

    assert_eq!(read(root, "projects/backup-system/README.md"), "# Backup\n");
    assert_eq!(read(root, "04-TEMPLATES/project-template.md"), "## Goals\n");
    assert!(stdout.contains("✓ Added heading to: 00-INBOX/daily-notes/2025-07-22.md"));
}

#[test]
fn test_run_json_report() {
    let tmp = setup_vault();
    let root = tmp.path();
    let vault = root.to_str().unwrap();
    let (stdout, _, success) = run_heading(&["run", vault, "--report", "json", "--dry-run"]);
    assert!(success);

    let events: Vec<serde_json::Value> = stdout
        .lines()
        .filter(|l| l.starts_with('{'))
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(events[0]["event"], "started");
    assert_eq!(events[0]["total"], 6);
    let daily = events
        .iter()
        .find(|e| e["path"] == "00-INBOX/daily-notes/2025-07-22.md")
        .unwrap();
    assert_eq!(daily["status"], "updated");
    assert_eq!(daily["label"], "Daily Note 2025-07-22");
    let broken = events
        .iter()
        .find(|e| e["path"] == "notes/broken.md")
        .unwrap();
    assert_eq!(broken["status"], "errored");
    assert_eq!(broken["kind"], "malformed metadata");
}

#[test]
fn test_vault_config_file() {
    let tmp = setup_vault();
    let root = tmp.path();
    write(
        root,
        ".heading-config.toml",
        "field = \"display\"\ndaily_note_patterns = [\"logbook/\"]\n",
    );
    write(root, "logbook/2024-03-01.md", "entry\n");

    let (_, stderr, success) = run_vault(root, &[]);
    assert!(success, "run failed: {}", stderr);
    assert_eq!(
        read(root, "logbook/2024-03-01.md"),
        "---\ndisplay: Daily Note 2024-03-01\n---\n\nentry\n"
    );
    assert!(read(root, "notes/done.md").contains("display: done"));
}

#[test]
fn test_explicit_config_must_parse() {
    let tmp = setup_vault();
    let root = tmp.path();
    let bad = root.join("bad.toml");
    fs::write(&bad, "field = [not toml").unwrap();

    let (_, stderr, success) = run_heading(&[
        "--config",
        bad.to_str().unwrap(),
        "run",
        root.to_str().unwrap(),
    ]);
    assert!(!success);
    assert!(stderr.contains("bad.toml"));
}

#[test]
fn test_missing_vault() {
    let (_, stderr, success) = run_heading(&["run", "/nonexistent/vault/path"]);
    assert!(!success);
    assert!(stderr.contains("Vault path does not exist"));
}

#[test]
fn test_label_command() {
    let (stdout, _, success) = run_heading(&[
        "label",
        "projects/backup-system/README.md",
        "--title-case",
    ]);
    assert!(success);
    assert!(stdout.contains("rule:  readme"));
    assert!(stdout.contains("label: Backup System - README"));

    let (stdout, _, success) = run_heading(&["label", "journal/2024-01-15.md"]);
    assert!(success);
    assert!(stdout.contains("label: Daily Note 2024-01-15"));
}
