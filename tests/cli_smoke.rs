//! Smoke tests for the catnav binary.
//!
//! Every run gets its own config file (pointing the log into a scratch
//! directory) and its own snapshot path, passed through the child's
//! environment so tests never touch the user's directories.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

const CATALOG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/catalog.json");

struct Scratch {
    dir: PathBuf,
}

impl Scratch {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("catnav-cli-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("scratch dir");
        let config = format!("log_file_path = {:?}\n", dir.join("catnav.log"));
        fs::write(dir.join("config.toml"), config).expect("write config");
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn command(&self) -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_catnav"));
        command
            .env("CATNAV_CONFIG", self.path("config.toml"))
            .env("CATNAV_STATE", self.path("session.json"))
            .env_remove("CATNAV_CATALOG")
            .env_remove("RUST_LOG");
        command
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

fn json_lines(output: &Output) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("every stdout line is JSON"))
        .collect()
}

fn run_with_stdin(mut command: Command, input: &str) -> Output {
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn catnav");
    child
        .stdin
        .take()
        .expect("piped stdin")
        .write_all(input.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait for catnav")
}

#[test]
fn script_file_produces_one_report_per_command() {
    let scratch = Scratch::new("script");
    let script = scratch.path("walk.txt");
    fs::write(&script, "# walk to Zeiss\ngo longe\ngo longe-marcas\ngo longe-zeiss\nshow\n")
        .expect("write script");

    let output = scratch
        .command()
        .arg(CATALOG)
        .arg("--script")
        .arg(&script)
        .output()
        .expect("run catnav");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let reports = json_lines(&output);
    assert_eq!(reports.len(), 4);
    assert_eq!(reports[3]["command"], "show");
    assert_eq!(reports[3]["session"]["navigation"]["id"], "longe-zeiss");
    assert_eq!(reports[3]["session"]["result_count"], 3);
    assert!(scratch.path("session.json").exists(), "session saved on exit");
    assert!(scratch.path("catnav.log").exists(), "log written to configured path");
}

#[test]
fn stdin_commands_and_session_restore() {
    let scratch = Scratch::new("stdin");

    let mut first = scratch.command();
    first.arg(CATALOG);
    let output = run_with_stdin(first, "go perto\nfilter add material material-trivex Trivex\n");
    assert!(output.status.success());
    assert_eq!(json_lines(&output).len(), 2);

    let mut second = scratch.command();
    second.arg(CATALOG);
    let resumed = run_with_stdin(second, "show\n");
    let reports = json_lines(&resumed);
    assert_eq!(reports[0]["session"]["navigation"]["id"], "perto");
    assert_eq!(reports[0]["session"]["filters"][1]["id"], "material-trivex");

    let mut fresh = scratch.command();
    fresh.arg(CATALOG).arg("--no-restore");
    let reports = json_lines(&run_with_stdin(fresh, "show\n"));
    assert_eq!(reports[0]["session"]["navigation"]["is_root"], true);
}

#[test]
fn bad_lines_are_reported_and_the_run_continues() {
    let scratch = Scratch::new("bad");

    let mut command = scratch.command();
    command.arg(CATALOG).arg("--no-restore");
    let output = run_with_stdin(command, "go nowhere\nteleport\nback\ngo longe\n");

    assert!(output.status.success());
    let reports = json_lines(&output);
    let ok: Vec<_> = reports.iter().map(|r| r["ok"].as_bool()).collect();
    assert_eq!(ok, vec![Some(false), Some(false), Some(false), Some(true)]);
}

#[test]
fn missing_catalog_fails() {
    let scratch = Scratch::new("missing");

    let output = scratch
        .command()
        .arg(Path::new("/nonexistent/catalog.json"))
        .stdin(Stdio::null())
        .output()
        .expect("run catnav");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn no_catalog_anywhere_fails_with_hint() {
    let scratch = Scratch::new("none");

    let output = scratch
        .command()
        .stdin(Stdio::null())
        .output()
        .expect("run catnav");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("CATNAV_CATALOG"));
}
