use std::{
    fs,
    path::PathBuf,
    process::{Command, Output},
};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_waypoint-defence"))
        .args(args)
        .output()
        .expect("failed to invoke the waypoint-defence binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn scratch_file(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("waypoint-defence-{}-{name}", std::process::id()))
}

#[test]
fn clears_the_first_wave_with_a_bow() {
    let output = run(&["--waves", "1", "--seed", "9", "--tower", "bow@400,60"]);
    assert!(output.status.success(), "run should succeed: {output:?}");

    let text = stdout(&output);
    assert!(text.contains("outcome: cleared"), "unexpected summary: {text}");
    assert!(text.contains("waves cleared: 1"), "unexpected summary: {text}");
    assert!(text.contains("wave: 2"), "unexpected summary: {text}");
}

#[test]
fn saved_runs_resume_on_the_next_wave() {
    let save = scratch_file("resume.save");
    let first = run(&["--waves", "1", "--save", save.to_str().expect("utf-8 path")]);
    assert!(first.status.success(), "first run should succeed: {first:?}");

    let code = fs::read_to_string(&save).expect("save file written");
    assert!(code.starts_with("wd:v1:"), "unexpected save code: {code}");

    let second = run(&["--waves", "1", "--load", save.to_str().expect("utf-8 path")]);
    let _ = fs::remove_file(&save);
    assert!(second.status.success(), "resumed run should succeed: {second:?}");
    assert!(
        stdout(&second).contains("wave: 3"),
        "resumed run should clear wave two: {}",
        stdout(&second)
    );
}

#[test]
fn locked_towers_abort_the_run() {
    let output = run(&["--tower", "cannon@400,60"]);
    assert!(!output.status.success(), "locked purchase must fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unlocks on wave 5"), "unexpected error: {stderr}");
}

#[test]
fn malformed_tower_orders_are_usage_errors() {
    let output = run(&["--tower", "catapult@1,2"]);
    assert!(!output.status.success(), "unknown tower kind must fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("catapult"), "unexpected error: {stderr}");
}

#[test]
fn tuning_files_override_defaults() {
    let tuning = scratch_file("tuning.toml");
    fs::write(
        &tuning,
        "[economy]\nstarting_money = 5\nmoney_multiplier = 1.0\n",
    )
    .expect("write tuning");

    let output = run(&[
        "--tuning",
        tuning.to_str().expect("utf-8 path"),
        "--tower",
        "bow@400,60",
    ]);
    let _ = fs::remove_file(&tuning);
    assert!(!output.status.success(), "five coins cannot buy a bow");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("costs 100 but only 5 is available"),
        "unexpected error: {stderr}"
    );
}
