use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

const REFERRALS_DUMP: &str = "域 (50)\n1 2 3\na.com\nb.net\nShopping\nNews\n#12\n-\n\
                              1.2M\n3.4%\n500K\n1.1%\n+2.1%\n-0.3%\n";

const OVERVIEW_DUMP: &str = "总访问量\n5.2M\n+3.1% 自上个月\n热门国家/地区\n美国\n28.4% 2.1%\n";

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_sitedump")
}

fn write_input(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("failed to write input dump");
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(bin())
        .args(args)
        .output()
        .expect("failed to run sitedump")
}

fn run_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(bin())
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn sitedump");
    // The child may exit before reading, e.g. on a bad flag.
    let _ = child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes());
    child.wait_with_output().expect("failed to wait for sitedump")
}

#[test]
fn referrals_writes_csv_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "referrals.txt", REFERRALS_DUMP);
    let out_dir = dir.path().join("out");

    let output = run(&[
        "referrals",
        "--input",
        input.to_str().unwrap(),
        "--output-dir",
        out_dir.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "referrals should succeed");

    let csv = fs::read_to_string(out_dir.join("referrals_incoming.csv")).unwrap();
    assert_eq!(
        csv,
        "row_index,domain,industry,global_rank,traffic_absolute,traffic_percent,change\n\
         1,a.com,Shopping,#12,1.2M,3.4%,+2.1%\n\
         2,b.net,News,-,500K,1.1%,-0.3%\n"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Total rows: 2"));
}

#[test]
fn referrals_without_header_fails_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "broken.txt", "a.com\nb.net\n#1\n");
    let out_dir = dir.path().join("out");

    let output = run(&[
        "referrals",
        "--input",
        input.to_str().unwrap(),
        "--output-dir",
        out_dir.to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"));
    assert!(stderr.contains("域"));
    assert!(!out_dir.join("referrals_incoming.csv").exists());
}

#[test]
fn referrals_reads_stdin_and_prints_json() {
    let output = run_with_stdin(&["referrals", "--format", "json"], REFERRALS_DUMP);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["rows"][1]["domain"], "b.net");
    assert_eq!(value["rows"][1]["global_rank"], "-");
}

#[test]
fn overview_writes_markdown_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "overview.txt", OVERVIEW_DUMP);
    let out_dir = dir.path().join("out");

    let output = run(&[
        "overview",
        "--domain",
        "example.com",
        "--input",
        input.to_str().unwrap(),
        "--output-dir",
        out_dir.to_str().unwrap(),
        "--with-report",
    ]);
    assert!(output.status.success());

    let markdown = fs::read_to_string(out_dir.join("overview.md")).unwrap();
    assert!(markdown.starts_with("# example.com 网站分析概览"));
    assert!(markdown.contains("| 总访问量 | 5.2M |"));
    assert!(markdown.contains("| 美国 | 28.4% | +2.1% |"));
    assert!(!markdown.contains("## 竞争对手"));

    let report = fs::read_to_string(out_dir.join("overview-report.json")).unwrap();
    let report: serde_json::Value = serde_json::from_str(&report).unwrap();
    assert_eq!(report["document"], "overview");
    assert_eq!(report["line_count"], 6);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("field(s) missing"));
}

#[test]
fn default_formats_follow_document_kind() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("out");
    let out = out_dir.to_str().unwrap();

    let overview = run_with_stdin(
        &["overview", "--domain", "example.com", "--output-dir", out],
        OVERVIEW_DUMP,
    );
    assert!(overview.status.success());
    assert!(out_dir.join("overview.md").exists());

    let referrals = run_with_stdin(&["referrals", "--output-dir", out], REFERRALS_DUMP);
    assert!(referrals.status.success());
    assert!(out_dir.join("referrals_incoming.csv").exists());
}

#[test]
fn overview_output_is_idempotent() {
    let first = run_with_stdin(&["overview", "--domain", "example.com"], OVERVIEW_DUMP);
    let second = run_with_stdin(&["overview", "--domain", "example.com"], OVERVIEW_DUMP);
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn overview_rejects_csv() {
    let output = run_with_stdin(
        &["overview", "--domain", "example.com", "--format", "csv"],
        OVERVIEW_DUMP,
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("CSV"));
}

#[test]
fn invalid_threshold_override_fails() {
    let output = run_with_stdin(&["referrals", "--miss-run", "0"], REFERRALS_DUMP);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("miss_run"));
}

#[test]
fn config_file_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_input(dir.path(), "thresholds.yml", "miss_run: 1\n");
    let dump = "域\n1 2 3\na.com\n广告\nb.net\nShopping\n";

    let output = run_with_stdin(
        &["referrals", "--config", config.to_str().unwrap()],
        dump,
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 2, "only a.com should survive: {stdout}");
}

#[test]
fn url_prints_report_url() {
    let output = run(&["url", "--kind", "referrals", "--domain", "nexusmods.com"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        "https://pro.similarweb.com/#/digitalsuite/websiteanalysis/referrals/*/999/3m?webSource=Total&selectedTab=incomingTraffic&key=nexusmods.com"
    );
}
