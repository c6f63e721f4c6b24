//! Integration tests for the analysis pipeline and its file outputs

use dopamine_bout_analyzer::config::AnalysisConfig;
use dopamine_bout_analyzer::export::{ManifestBuilder, RunManifest, MANIFEST_FILE, TABLE_NAMES};
use dopamine_bout_analyzer::input::{read_concentration, read_locomotion, InputError};
use dopamine_bout_analyzer::pipeline::{run_analysis, Analysis, AnalysisError};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SECONDS: usize = 30;

/// Seconds 10..=13 are running; everything else is still.
fn is_running(second: usize) -> bool {
    (10..=13).contains(&second)
}

fn locomotion_csv(seconds: usize, running: impl Fn(usize) -> bool) -> String {
    let mut data = String::from("Subject,Rat 4\nProtocol,Wheel\n");
    for second in 0..seconds {
        let (interval, speed, distance) = if running(second) {
            (2.0, 5.0, 0.1)
        } else {
            (0.0, 0.0, 0.0)
        };
        data.push_str(&format!(
            "10:00:{second:02},\nInterval Count,{interval}\nAverage m/min,{speed}\nDistance,{distance}\nTotal Counts,{second}\n"
        ));
    }
    data
}

/// One reading per second at `s + 0.5`, except second 28.
fn dopamine_csv(seconds: usize) -> String {
    let mut data = String::from("Time (seconds),Concentration\n");
    for second in (0..seconds).filter(|&s| s != 28) {
        data.push_str(&format!("{}.5,{second}\n", second));
    }
    data
}

struct Fixture {
    dir: TempDir,
    locomotion: PathBuf,
    dopamine: PathBuf,
}

fn fixture(locomotion: &str, dopamine: &str) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let locomotion_path = dir.path().join("rat4_locomotion.csv");
    let dopamine_path = dir.path().join("rat4.csv");
    std::fs::write(&locomotion_path, locomotion).unwrap();
    std::fs::write(&dopamine_path, dopamine).unwrap();
    Fixture {
        dir,
        locomotion: locomotion_path,
        dopamine: dopamine_path,
    }
}

fn test_config() -> AnalysisConfig {
    AnalysisConfig {
        sedentary_window_length: 3,
        ..AnalysisConfig::default()
    }
}

fn analyze_files(fixture: &Fixture, config: &AnalysisConfig) -> Analysis {
    let locomotion = read_locomotion(&fixture.locomotion).unwrap();
    let dopamine = read_concentration(&fixture.dopamine).unwrap();
    run_analysis(&locomotion, &dopamine, config).unwrap()
}

fn seconds_of(rows: &[dopamine_bout_analyzer::CombinedRow]) -> Vec<usize> {
    rows.iter().map(|r| r.second).collect()
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn test_end_to_end_tables() {
    let fixture = fixture(
        &locomotion_csv(SECONDS, is_running),
        &dopamine_csv(SECONDS),
    );
    let analysis = analyze_files(&fixture, &test_config());

    assert_eq!(analysis.timeline.len(), SECONDS);
    assert_eq!(analysis.segmentation.running_bouts.len(), 1);
    assert_eq!(seconds_of(&analysis.tables.during), vec![10, 11, 12, 13]);
    assert_eq!(seconds_of(&analysis.tables.before), vec![5, 6, 7, 8, 9]);
    assert_eq!(seconds_of(&analysis.tables.offset), vec![10, 11, 12]);
    assert_eq!(seconds_of(&analysis.tables.after), vec![14, 15, 16, 17, 18]);

    // 0..=9 and 14..=29, minus second 28 which has no reading
    let mut sedentary: Vec<usize> = (0..=9).chain(14..=29).filter(|&s| s != 28).collect();
    assert_eq!(seconds_of(&analysis.tables.sedentary), sedentary);
    sedentary.push(28);
    sedentary.sort_unstable();
    assert_eq!(analysis.segmentation.sedentary.iter().collect::<Vec<_>>(), sedentary);

    let summary = &analysis.summary;
    assert_eq!(summary.locomotion_samples, SECONDS);
    assert_eq!(summary.bins, SECONDS);
    assert_eq!(summary.empty_bins, 1);
    assert_eq!(summary.aligned_with_concentration, SECONDS - 1);
    assert_eq!(summary.sedentary_seconds, 26);
}

#[test]
fn test_no_interpolation_of_missing_second() {
    let fixture = fixture(
        &locomotion_csv(SECONDS, is_running),
        &dopamine_csv(SECONDS),
    );
    let analysis = analyze_files(&fixture, &test_config());

    let row = analysis.timeline.get(28).unwrap();
    assert_eq!(row.avg_concentration, None);
    assert_eq!(row.source_label, None);
    assert_eq!(analysis.timeline.get(27).unwrap().avg_concentration, Some(27.0));
}

#[test]
fn test_csv_export_files() {
    let fixture = fixture(
        &locomotion_csv(SECONDS, is_running),
        &dopamine_csv(SECONDS),
    );
    let analysis = analyze_files(&fixture, &test_config());
    let out = fixture.dir.path().join("out");

    let written = analysis.bundle().write_csv_dir(&out).unwrap();
    assert_eq!(written.len(), TABLE_NAMES.len());

    let combined = read(&out.join("combined_data.csv"));
    let lines: Vec<&str> = combined.lines().collect();
    assert_eq!(lines.len(), SECONDS + 1);
    assert_eq!(
        lines[0],
        "Time,Interval Count,Average m/min,Distance,Total Counts,Time (seconds),\
         Avg Dopamine Concentration,File Name,File Number,Sedentary Bout"
    );
    assert_eq!(lines[1], "10:00:00,0.0,0.0,0.0,0.0,0,0.0,rat4.csv,1,Yes");
    assert_eq!(lines[11], "10:00:10,2.0,5.0,0.1,10.0,10,10.0,rat4.csv,1,No");
    assert_eq!(lines[29], "10:00:28,0.0,0.0,0.0,28.0,28,,,1,Yes");

    let during = read(&out.join("dopamine_during.csv"));
    assert_eq!(during.lines().count(), 5);
}

#[test]
fn test_empty_tables_keep_header() {
    let fixture = fixture(&locomotion_csv(SECONDS, |_| false), &dopamine_csv(SECONDS));
    let analysis = analyze_files(&fixture, &test_config());
    assert!(analysis.summary.no_bouts_found());

    let out = fixture.dir.path().join("out");
    analysis.bundle().write_csv_dir(&out).unwrap();

    for file in [
        "dopamine_during.csv",
        "dopamine_before.csv",
        "dopamine_offset.csv",
        "dopamine_after.csv",
    ] {
        let text = read(&out.join(file));
        assert_eq!(text.lines().count(), 1, "{file} should only hold a header");
        assert!(text.starts_with("Time,"));
    }
    // Every second is sedentary when nothing moves
    assert_eq!(read(&out.join("sedentary_bouts.csv")).lines().count(), SECONDS);
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let fixture = fixture(
        &locomotion_csv(SECONDS, is_running),
        &dopamine_csv(SECONDS),
    );
    let first = fixture.dir.path().join("first");
    let second = fixture.dir.path().join("second");

    analyze_files(&fixture, &test_config())
        .bundle()
        .write_csv_dir(&first)
        .unwrap();
    analyze_files(&fixture, &test_config())
        .bundle()
        .write_csv_dir(&second)
        .unwrap();

    for name in TABLE_NAMES {
        let file = format!("{}.csv", name.to_lowercase().replace(' ', "_"));
        assert_eq!(
            std::fs::read(first.join(&file)).unwrap(),
            std::fs::read(second.join(&file)).unwrap(),
            "{file} differs between runs"
        );
    }
}

#[test]
fn test_bout_at_recording_start() {
    let fixture = fixture(&locomotion_csv(10, |s| s < 3), &dopamine_csv(10));
    let analysis = analyze_files(&fixture, &test_config());

    assert_eq!(analysis.segmentation.running_bouts.len(), 1);
    assert!(analysis.tables.before.is_empty());
    assert_eq!(seconds_of(&analysis.tables.during), vec![0, 1, 2]);
    assert_eq!(seconds_of(&analysis.tables.offset), vec![0, 1]);
    assert_eq!(seconds_of(&analysis.tables.after), vec![3, 4, 5, 6, 7]);
}

#[test]
fn test_single_second_run_is_not_a_bout() {
    let fixture = fixture(&locomotion_csv(SECONDS, |s| s == 15), &dopamine_csv(SECONDS));
    let analysis = analyze_files(&fixture, &test_config());

    assert!(analysis.segmentation.running_bouts.is_empty());
    assert!(analysis.tables.during.is_empty());
    // Second 15 moved, so it can never be sedentary
    assert!(!analysis.segmentation.sedentary.contains(15));
}

#[test]
fn test_json_export_and_manifest() {
    let fixture = fixture(
        &locomotion_csv(SECONDS, is_running),
        &dopamine_csv(SECONDS),
    );
    let config = test_config();
    let analysis = analyze_files(&fixture, &config);
    let out = fixture.dir.path().join("json");

    let bundle = analysis.bundle();
    bundle.write_json(&out.join("tables.json")).unwrap();
    let tables: serde_json::Value = serde_json::from_str(&read(&out.join("tables.json"))).unwrap();
    assert_eq!(tables["tables"][1]["name"], "Dopamine During");
    assert_eq!(tables["tables"][1]["rows"][0]["Time (seconds)"], 10);
    assert_eq!(tables["tables"][1]["rows"][0]["Sedentary Bout"], "No");

    let manifest = ManifestBuilder::new()
        .with_inputs(&fixture.locomotion, &fixture.dopamine)
        .build(&config, &analysis.summary, &bundle, |_| "tables.json".to_string());
    let path = manifest.write_to_dir(&out).unwrap();
    assert_eq!(path, out.join(MANIFEST_FILE));

    let parsed: RunManifest = serde_json::from_str(&read(&path)).unwrap();
    assert_eq!(parsed.analysis.sedentary_window_length, 3);
    assert_eq!(parsed.summary, analysis.summary);
    assert_eq!(parsed.tables[1].rows, 4);
}

#[test]
fn test_invalid_parameter_is_rejected() {
    let fixture = fixture(
        &locomotion_csv(SECONDS, is_running),
        &dopamine_csv(SECONDS),
    );
    let locomotion = read_locomotion(&fixture.locomotion).unwrap();
    let dopamine = read_concentration(&fixture.dopamine).unwrap();
    let config = AnalysisConfig {
        min_running_bout_length: 0,
        ..AnalysisConfig::default()
    };

    let result = run_analysis(&locomotion, &dopamine, &config);
    assert!(matches!(result, Err(AnalysisError::InvalidConfig(_))));
}

#[test]
fn test_missing_concentration_column() {
    let fixture = fixture(&locomotion_csv(5, |_| false), "Time (seconds),Signal\n0.5,1\n");

    match read_concentration(&fixture.dopamine) {
        Err(InputError::MissingColumn { column }) => assert_eq!(column, "Concentration"),
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn test_empty_concentration_table_is_fatal() {
    let fixture = fixture(&locomotion_csv(5, |_| false), "Time (seconds),Concentration\n");
    let locomotion = read_locomotion(&fixture.locomotion).unwrap();
    let dopamine = read_concentration(&fixture.dopamine).unwrap();

    let result = run_analysis(&locomotion, &dopamine, &AnalysisConfig::default());
    assert!(matches!(result, Err(AnalysisError::EmptyInput)));
}
