//! Integration tests for writing, rotating and reading step data files

use foiltools_geometry::Volume;
use foiltools_stepdat::{
    header_line, read_paths, read_run, read_step_file, run_paths, write_ascii_pretty, write_json, Error,
    RotatingWriter, RunSummary, StepRecord, WriterConfig,
};
use rstest::rstest;
use std::fs;

fn step(event_id: i32) -> StepRecord {
    StepRecord {
        event_id,
        particle: "e-".to_string(),
        volume: Volume::FoilAl,
        edep_kev: 0.5,
        ..Default::default()
    }
}

#[test]
fn rotation_at_boundary() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = RotatingWriter::create(dir.path(), WriterConfig::default()).unwrap();

    for id in 0..=50_001 {
        let rotated = writer.append(&step(id)).unwrap();
        assert_eq!(rotated, id == 50_001, "event {id}");
    }
    assert_eq!(writer.baseline(), 50_001);
    writer.close().unwrap();

    let first = read_step_file(dir.path().join("run_0.dat")).unwrap();
    assert_eq!(first.len(), 50_001);
    assert_eq!(first.first().unwrap().event_id, 0);
    assert_eq!(first.last().unwrap().event_id, 50_000);

    let second = read_step_file(dir.path().join("run_1.dat")).unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].event_id, 50_001);

    assert!(!dir.path().join("run_2.dat").exists());
}

#[rstest]
#[case(10, &[0, 5, 10, 11, 15, 21, 22, 40], 4)]
#[case(10, &[0, 100, 101, 90, 89], 3)]
#[case(0, &[0, 0, 1, 1, 2], 3)]
fn rotations_follow_the_baseline(
    #[case] events_per_file: u64,
    #[case] ids: &[i32],
    #[case] expected_files: usize,
) {
    let dir = tempfile::tempdir().unwrap();
    let config = WriterConfig {
        events_per_file,
        ..Default::default()
    };
    let mut writer = RotatingWriter::create(dir.path(), config.clone()).unwrap();
    for id in ids {
        writer.append(&step(*id)).unwrap();
    }
    writer.close().unwrap();

    assert_eq!(writer.paths().len(), expected_files);
    assert_eq!(run_paths(dir.path(), &config), writer.paths());

    let records = read_run(dir.path(), &config).unwrap();
    let read_ids: Vec<i32> = records.iter().map(|r| r.event_id).collect();
    assert_eq!(read_ids, ids);
}

#[test]
fn every_file_has_the_header() {
    let dir = tempfile::tempdir().unwrap();
    let config = WriterConfig {
        events_per_file: 1,
        ..Default::default()
    };
    let mut writer = RotatingWriter::create(dir.path(), config).unwrap();
    writer.append(&step(0)).unwrap();
    writer.append(&step(5)).unwrap();
    drop(writer);

    for name in ["run_0.dat", "run_1.dat"] {
        let text = fs::read_to_string(dir.path().join(name)).unwrap();
        assert_eq!(text.lines().next().unwrap(), header_line());
        assert_eq!(text.lines().count(), 2);
    }
}

#[test]
fn rows_survive_to_six_significant_figures() {
    let dir = tempfile::tempdir().unwrap();
    let original = StepRecord {
        event_id: 42,
        particle: "alpha".to_string(),
        volume: Volume::FoilTa,
        edep_kev: 123.456789,
        kinetic_energy_kev: 4.56789012e3,
        global_time_ns: 1.23456789e-3,
        step_length_um: 0.987654321,
        momentum_kev: 1.8e5,
        position_um: [-59_999.123, 0.0, 10_007.512_345],
    };

    let mut writer = RotatingWriter::create(dir.path(), WriterConfig::default()).unwrap();
    writer.write_record(&original).unwrap();
    writer.close().unwrap();

    let read = read_step_file(dir.path().join("run_0.dat")).unwrap();
    assert_eq!(read.len(), 1);
    let read = &read[0];

    assert_eq!(read.event_id, 42);
    assert_eq!(read.particle, "alpha");
    assert_eq!(read.volume, Volume::FoilTa);

    let pairs = [
        (original.edep_kev, read.edep_kev),
        (original.kinetic_energy_kev, read.kinetic_energy_kev),
        (original.global_time_ns, read.global_time_ns),
        (original.step_length_um, read.step_length_um),
        (original.momentum_kev, read.momentum_kev),
        (original.position_um[0], read.position_um[0]),
        (original.position_um[1], read.position_um[1]),
        (original.position_um[2], read.position_um[2]),
    ];
    for (expected, found) in pairs {
        let tolerance = 5e-6 * expected.abs();
        assert!((expected - found).abs() <= tolerance, "{expected} vs {found}");
    }
}

#[test]
fn writing_after_close_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = RotatingWriter::create(dir.path(), WriterConfig::default()).unwrap();
    writer.close().unwrap();
    writer.close().unwrap();
    assert!(!writer.is_open());
    assert!(matches!(
        writer.write_record(&step(0)),
        Err(Error::WriterClosed)
    ));
}

#[test]
fn missing_runs() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        read_run(dir.path(), &WriterConfig::default()),
        Err(Error::NoRunFiles(_))
    ));
}

#[test]
fn custom_names() {
    let dir = tempfile::tempdir().unwrap();
    let config = WriterConfig {
        prefix: "worker3_".to_string(),
        extension: "txt".to_string(),
        ..Default::default()
    };
    let writer = RotatingWriter::create(dir.path(), config).unwrap();
    assert_eq!(
        writer.current_path().unwrap(),
        dir.path().join("worker3_0.txt")
    );
}

#[test]
fn legacy_header_files_are_readable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run_0.dat");
    let text = format!(
        "{}\n     1      proton           2         3.5 \n",
        header_line().replace("steplen_um", "steplen_mm")
    );
    fs::write(&path, text).unwrap();
    assert!(matches!(read_step_file(&path), Err(Error::ParseError(_))));

    let text = format!(
        "{}\n     1      proton           2         3.5   1  2  3  4  5  6  7 \n",
        header_line().replace("steplen_um", "steplen_mm")
    );
    fs::write(&path, text).unwrap();
    let records = read_step_file(&path).unwrap();
    assert_eq!(records[0].step_length_um, 3.0);
}

#[test]
fn summaries_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut records: Vec<StepRecord> = (0..10).map(step).collect();
    records.push(StepRecord {
        event_id: 3,
        particle: "gamma".to_string(),
        volume: Volume::Envelope,
        ..Default::default()
    });

    let summary = RunSummary::from_records(&records);
    assert_eq!(summary.events, 10);
    assert_eq!(summary.steps, 11);

    let json_path = dir.path().join("summary.json");
    write_json(&summary, &json_path).unwrap();
    let json = fs::read_to_string(&json_path).unwrap();
    let back: RunSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(back.volumes[&Volume::FoilAl].steps, 10);
    assert_eq!(back.particles["gamma"], 1);

    let text_path = dir.path().join("summary.txt");
    write_ascii_pretty(&summary, &text_path).unwrap();
    let text = fs::read_to_string(&text_path).unwrap();
    assert!(text.contains("Total steps : 11"));
    assert!(text.contains("e-:10 gamma:1"));
}

#[test]
fn shorter_rerun_replaces_the_earlier_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = WriterConfig {
        events_per_file: 1,
        ..Default::default()
    };

    let mut first = RotatingWriter::create(dir.path(), config.clone()).unwrap();
    for id in [0, 5, 10] {
        first.append(&step(id)).unwrap();
    }
    first.close().unwrap();
    assert_eq!(run_paths(dir.path(), &config).len(), 3);

    let mut second = RotatingWriter::create(dir.path(), config.clone()).unwrap();
    second.append(&step(0)).unwrap();
    second.close().unwrap();

    assert!(!dir.path().join("run_1.dat").exists());
    assert!(!dir.path().join("run_2.dat").exists());
    assert_eq!(read_run(dir.path(), &config).unwrap(), vec![step(0)]);
    assert_eq!(read_paths(second.paths()).unwrap(), vec![step(0)]);
}

#[test]
fn other_prefixes_survive_a_rerun() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("thread_1_1.dat"), "kept").unwrap();

    let mut writer = RotatingWriter::create(dir.path(), WriterConfig::default()).unwrap();
    writer.close().unwrap();
    assert!(dir.path().join("thread_1_1.dat").exists());
}

#[rstest]
#[case("")]
#[case("anti proton")]
#[case("e-\n")]
fn unreadable_particle_names_are_rejected(#[case] particle: &str) {
    let dir = tempfile::tempdir().unwrap();
    let config = WriterConfig {
        events_per_file: 1,
        ..Default::default()
    };
    let mut writer = RotatingWriter::create(dir.path(), config).unwrap();
    writer.append(&step(0)).unwrap();

    let bad = StepRecord {
        particle: particle.to_string(),
        ..step(100)
    };
    assert!(matches!(
        writer.append(&bad),
        Err(Error::InvalidParticleName(name)) if name == particle
    ));
    writer.close().unwrap();

    // rejected before any rotation
    assert_eq!(writer.paths().len(), 1);
    assert_eq!(read_paths(writer.paths()).unwrap(), vec![step(0)]);
}

#[test]
fn closed_writer_ignores_far_events() {
    let dir = tempfile::tempdir().unwrap();
    let config = WriterConfig {
        events_per_file: 10,
        ..Default::default()
    };
    let mut writer = RotatingWriter::create(dir.path(), config.clone()).unwrap();
    writer.append(&step(0)).unwrap();
    writer.close().unwrap();

    assert!(matches!(writer.append(&step(1000)), Err(Error::WriterClosed)));
    assert!(!writer.is_open());
    assert_eq!(run_paths(dir.path(), &config).len(), 1);
}
