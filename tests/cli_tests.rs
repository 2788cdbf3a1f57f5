use std::io::Write;
use std::process::Command;

fn csv(lines: &[&str]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file.flush().unwrap();
    file
}

fn fleetwatch() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_fleetwatch"));
    cmd.env("RUST_LOG", "off");
    cmd
}

#[test]
fn test_json_output_is_only_the_report() {
    let input = csv(&["1,80,100,50", "bad line", "2,100,110,60"]);
    let output = fleetwatch()
        .arg(input.path())
        .args(["--json", "--iterations", "5", "--pacing-ms", "2"])
        .output()
        .expect("run fleetwatch");

    assert_eq!(output.status.code(), Some(0));
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is a single JSON document");
    assert_eq!(report["loaded"], 2);
    assert_eq!(report["rejected"], 1);
    assert_eq!(report["performance"]["concurrent"]["passes"], 5);
}

#[test]
fn test_text_output_lists_load_counts() {
    let input = csv(&["1,80,100,50", "bad line"]);
    let output = fleetwatch()
        .arg(input.path())
        .args(["--iterations", "5", "--pacing-ms", "2"])
        .output()
        .expect("run fleetwatch");

    assert_eq!(output.status.code(), Some(0));
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.starts_with("Loaded 1 vehicles from file"));
    assert!(text.contains("Skipped 1 malformed line(s)."));
    assert!(text.contains("Average Speed:"));
}

#[test]
fn test_exit_codes() {
    let dir = tempfile::tempdir().unwrap();
    let missing = fleetwatch()
        .arg(dir.path().join("absent.csv"))
        .status()
        .expect("run fleetwatch");
    assert_eq!(missing.code(), Some(1));

    let empty = csv(&["id,speed,temperature,fuel", "a,b,c,d"]);
    let no_records = fleetwatch()
        .arg(empty.path())
        .status()
        .expect("run fleetwatch");
    assert_eq!(no_records.code(), Some(2));
}
