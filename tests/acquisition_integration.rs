// tests/acquisition_integration.rs
//! Recorder, CSV and pipeline working together

use emg_symmetry::acquisition::csv::{load_table, save_table};
use emg_symmetry::acquisition::SampleRecorder;
use emg_symmetry::config::AnalysisConfig;
use emg_symmetry::processing::SymmetryPipeline;
use emg_symmetry::simulation::{MuscleProfile, RecordingConfig, RecordingGenerator};
use tempfile::tempdir;

#[test]
fn test_streamed_lines_match_generated_table() {
    let config = RecordingConfig::default().with_muscles(vec![MuscleProfile::new("psoas", 1.0, 1.5)]);
    let table = RecordingGenerator::new(config).unwrap().generate().unwrap();

    let left = table.channel("psoas_left").unwrap();
    let right = table.channel("psoas_right").unwrap();

    let mut recorder = SampleRecorder::new(&["psoas_left", "psoas_right"]).unwrap();
    for (row, &time) in table.time_ms().iter().enumerate() {
        recorder.push_line(time, &format!("{},{}\n", left[row], right[row])).unwrap();
        if row % 500 == 0 {
            // Noise on the link is dropped without disturbing the session
            assert!(recorder.push_line(time, "garbage").is_err());
        }
    }
    assert_eq!(recorder.stats().accepted, table.len());
    assert_eq!(recorder.stats().skipped(), 10);

    let recorded = recorder.finish().unwrap();
    assert_eq!(recorded, table);
}

#[test]
fn test_augmented_table_survives_csv() {
    let config = RecordingConfig::default().with_muscles(vec![
        MuscleProfile::new("iliacus", 2.0, 1.0),
        MuscleProfile::new("psoas", 1.0, 1.0),
    ]);
    let table = RecordingGenerator::new(config).unwrap().generate().unwrap();

    let dir = tempdir().unwrap();
    let input = dir.path().join("recording.csv");
    save_table(&input, &table).unwrap();
    let loaded = load_table(&input).unwrap();
    assert_eq!(loaded, table);

    let output = SymmetryPipeline::new(&AnalysisConfig::hip_flexor_report())
        .unwrap()
        .run(&loaded)
        .unwrap();

    let augmented_path = dir.path().join("augmented.csv");
    save_table(&augmented_path, &output.augmented).unwrap();
    let augmented = load_table(&augmented_path).unwrap();

    assert_eq!(augmented.columns().len(), 8);
    assert_eq!(
        augmented.channel("psoas_right_envelope").unwrap(),
        output.augmented.channel("psoas_right_envelope").unwrap()
    );
}
