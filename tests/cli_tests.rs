use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/partners.htm");
const FIELD_TABLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/partner-fields.toml");

fn command(args: &[&str], out_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_partner-etl"));
    cmd.args(args).arg("--output-path").arg(out_dir);
    cmd
}

fn partner_etl(args: &[&str], out_dir: &Path) -> Output {
    command(args, out_dir).env("RUST_LOG", "off").output().unwrap()
}

fn first_name(out_dir: &Path) -> String {
    let mut reader = csv::Reader::from_path(out_dir.join("partner_data.csv")).unwrap();
    let headers = reader.headers().unwrap().clone();
    let name_col = headers.iter().position(|h| h == "Name").unwrap();
    let first = reader.records().next().unwrap().unwrap();
    first[name_col].to_string()
}

#[test]
fn test_successful_run_exits_zero() {
    let temp_dir = TempDir::new().unwrap();
    let output = partner_etl(&[FIXTURE, "--format", "xlsx,csv"], temp_dir.path());

    assert_eq!(output.status.code(), Some(0));
    assert!(temp_dir.path().join("partner_data.xlsx").exists());
    assert!(temp_dir.path().join("partner_data.csv").exists());
    assert!(temp_dir.path().join("summary.txt").exists());
}

#[test]
fn test_missing_input_exits_with_input_code() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.htm");
    let output = partner_etl(&[missing.to_str().unwrap()], temp_dir.path());

    assert_eq!(output.status.code(), Some(3));
    assert!(!temp_dir.path().join("partner_data.xlsx").exists());
}

#[test]
fn test_unwritable_output_exits_with_output_code() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("blocker");
    std::fs::write(&blocker, b"x").unwrap();

    let output = partner_etl(&[FIXTURE], &blocker);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_field_table_override() {
    let temp_dir = TempDir::new().unwrap();
    let output = partner_etl(
        &[FIXTURE, "--config", FIELD_TABLE, "--format", "csv", "--no-summary"],
        temp_dir.path(),
    );

    assert_eq!(output.status.code(), Some(0));
    let csv = std::fs::read_to_string(temp_dir.path().join("partner_data.csv")).unwrap();
    assert_eq!(csv.lines().count(), 4);
    assert!(!temp_dir.path().join("summary.txt").exists());
}

#[test]
fn test_broken_field_table_exits_with_config_code() {
    let temp_dir = TempDir::new().unwrap();
    let table = temp_dir.path().join("fields.toml");
    std::fs::write(
        &table,
        "[entry]\nselector = \"tr\"\n\n[[fields]]\ncolumn = \"Name\"\nselector = \"a[[\"\nextract = \"text\"\n",
    )
    .unwrap();

    let output = partner_etl(
        &[FIXTURE, "--config", table.to_str().unwrap()],
        temp_dir.path(),
    );
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_non_utf8_input_exits_with_input_code() {
    let temp_dir = TempDir::new().unwrap();
    let page = temp_dir.path().join("page.htm");
    let mut bytes = std::fs::read(FIXTURE).unwrap();
    bytes.extend_from_slice(&[0xFF, 0xFE]);
    std::fs::write(&page, bytes).unwrap();

    let output = partner_etl(&[page.to_str().unwrap(), "--format", "csv"], temp_dir.path());
    assert_eq!(output.status.code(), Some(3));
    assert!(!temp_dir.path().join("partner_data.csv").exists());
}

#[test]
fn test_symbols_kept_by_default() {
    let temp_dir = TempDir::new().unwrap();
    let output = partner_etl(&[FIXTURE, "--format", "csv"], temp_dir.path());

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(first_name(temp_dir.path()), "Acme Digital GmbH & Co. KG");
}

#[test]
fn test_strip_symbols_flag() {
    let temp_dir = TempDir::new().unwrap();
    let output = partner_etl(
        &[FIXTURE, "--format", "csv", "--strip-symbols"],
        temp_dir.path(),
    );

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(first_name(temp_dir.path()), "Acme Digital GmbH Co. KG");
}

#[test]
fn test_strip_symbols_from_field_table() {
    let temp_dir = TempDir::new().unwrap();
    let table = temp_dir.path().join("fields.toml");
    let mut content = std::fs::read_to_string(FIELD_TABLE).unwrap();
    content.push_str("\n[transform]\nstrip_symbols = true\n");
    std::fs::write(&table, content).unwrap();

    let output = partner_etl(
        &[FIXTURE, "--format", "csv", "--config", table.to_str().unwrap()],
        temp_dir.path(),
    );

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(first_name(temp_dir.path()), "Acme Digital GmbH Co. KG");
}

#[test]
fn test_log_file_records_progress() {
    let temp_dir = TempDir::new().unwrap();
    let log = temp_dir.path().join("run.log");
    let output = command(
        &[FIXTURE, "--format", "csv", "--log-file", log.to_str().unwrap()],
        temp_dir.path(),
    )
    .env("RUST_LOG", "partner_etl=info")
    .output()
    .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let text = std::fs::read_to_string(&log).unwrap();
    assert!(text.contains("Processed partner 1/3: Acme Digital GmbH & Co. KG"));
    assert!(text.contains("Processed partner 3/3: Contoso Consulting"));
    // 檔案日誌不含 ANSI 色碼
    assert!(!text.contains('\u{1b}'));
}
