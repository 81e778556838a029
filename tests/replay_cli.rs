use std::{path::PathBuf, process::Command};

fn replay_exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_skimmer-replay")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "skimmer-replay.exe"
            } else {
                "skimmer-replay"
            });
            p
        })
}

#[test]
fn replay_prints_one_summary_per_seed() {
    let output = Command::new(replay_exe())
        .args(["--seeds", "3", "--first-seed", "40", "--seconds", "6", "--fps", "30"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let seeds: Vec<u64> = stdout
        .lines()
        .map(|line| {
            let v: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(v["stats"]["sweeps_started"].as_u64().unwrap() >= 1);
            v["seed"].as_u64().unwrap()
        })
        .collect();
    assert_eq!(seeds, vec![40, 41, 42]);
}

#[test]
fn unbounded_frame_rate_still_finishes() {
    let status = Command::new(replay_exe())
        .args(["--seeds", "1", "--seconds", "3", "--fps", "inf"])
        .status()
        .unwrap();
    assert!(status.success());
}

#[test]
fn out_of_range_duration_is_an_error_not_a_panic() {
    for seconds in ["inf", "1e30"] {
        let output = Command::new(replay_exe())
            .args(["--seeds", "1", "--seconds", seconds])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(1), "--seconds {seconds}");
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("invalid --seconds"), "{stderr}");
    }
}
