//! Integration tests for target construction and classification

use foiltools_geometry::units::{cm, um};
use foiltools_geometry::{Detector, DetectorConfig, DetectorConstruction, Error, Volume};
use nalgebra::Vector3;
use rstest::{fixture, rstest};
use std::io::Write;

#[fixture]
fn detector() -> Detector {
    Detector::build_default().unwrap()
}

#[rstest]
#[case([0.0, 0.0, 0.0], Volume::FoilAl)] // foil centre
#[case([0.0, 0.0, 7.4], Volume::FoilAl)] // just inside the downstream face
#[case([0.0, 0.0, -7.4], Volume::FoilAl)] // just inside the upstream face
#[case([59_000.0, -59_000.0, 3.0], Volume::FoilAl)] // near a corner
#[case([0.0, 0.0, 7.6], Volume::Envelope)] // just past the foil
#[case([61_000.0, 0.0, 0.0], Volume::Envelope)] // beside the foil
#[case([0.0, 0.0, 10_007.5], Volume::FoilTa)] // tantalum centre
#[case([0.0, 0.0, 10_057.0], Volume::FoilTa)] // inside the tantalum exit face
#[case([0.0, 0.0, 10_058.0], Volume::Envelope)] // past the tantalum
#[case([0.0, 0.0, 5_000.0], Volume::Envelope)] // between the foils
#[case([0.0, 0.0, 2.0e6], Volume::World)] // beyond the envelope in z
#[case([1.5e6, 0.0, 0.0], Volume::World)] // beyond the envelope in x
#[case([0.0, 0.0, 1.0e9], Volume::World)] // outside the world entirely
fn classify_points(detector: Detector, #[case] position_um: [f64; 3], #[case] expected: Volume) {
    let point = Vector3::from(position_um) * um;
    assert_eq!(detector.classify_point(&point), expected);
}

#[rstest]
fn default_hierarchy(detector: Detector) {
    let geometry = &detector.geometry;
    // world, envelope, one slab per foil
    assert_eq!(geometry.number_of_placements(), 4);
    assert_eq!(geometry.number_of_logicals(), 4);

    let world = detector.world().unwrap();
    let world_lv = geometry.logical(geometry.logical_of(world).unwrap()).unwrap();
    assert_eq!(world_lv.solid.size(), Vector3::new(2400.0 * cm, 2400.0 * cm, 3600.0 * cm));

    let envelope = geometry.daughters(world);
    assert_eq!(envelope.len(), 1);
    assert_eq!(geometry.daughters(envelope[0]).len(), 2);

    let ta = geometry.logical(detector.scoring.foil_ta).unwrap();
    assert_eq!(ta.material.name, "G4_Ta");
    assert!((ta.solid.size().z / um - 100.0).abs() < 1e-9);
}

#[test]
fn binned_foils_share_one_handle() {
    let config = DetectorConfig {
        al_bins: 5,
        ta_bins: 10,
        ..Default::default()
    };
    let detector = DetectorConstruction::new(config).construct().unwrap();
    assert_eq!(detector.geometry.number_of_placements(), 2 + 5 + 10);

    let al_slabs = detector
        .geometry
        .placements()
        .filter(|(_, p)| p.logical == detector.scoring.foil_al)
        .count();
    assert_eq!(al_slabs, 5);

    // every slab, including the outermost ones, maps to the same foil
    for z in [-7.0, -4.0, 0.0, 4.0, 7.0] {
        let point = Vector3::new(0.0, 0.0, z * um);
        assert_eq!(detector.classify_point(&point), Volume::FoilAl);
    }
    for z in [9_960.0, 10_000.0, 10_055.0] {
        let point = Vector3::new(0.0, 0.0, z * um);
        assert_eq!(detector.classify_point(&point), Volume::FoilTa);
    }
}

#[test]
fn overlapping_foils_are_rejected() {
    let config = DetectorConfig {
        foil_gap_um: 0.0,
        ..Default::default()
    };
    let result = DetectorConstruction::new(config).construct();
    assert!(matches!(result, Err(Error::Overlap { .. })));

    // the same target builds when the check is off
    let config = DetectorConfig {
        foil_gap_um: 0.0,
        check_overlaps: false,
        ..Default::default()
    };
    assert!(DetectorConstruction::new(config).construct().is_ok());
}

#[test]
fn oversized_foil_is_rejected() {
    let config = DetectorConfig {
        foil_half_xy_cm: 150.0,
        ..Default::default()
    };
    let result = DetectorConstruction::new(config).construct();
    assert!(matches!(result, Err(Error::OutsideMother { .. })));
}

#[test]
fn unknown_material_is_rejected() {
    let config = DetectorConfig {
        ta_material: "G4_Unobtanium".to_string(),
        ..Default::default()
    };
    let result = DetectorConstruction::new(config).construct();
    assert!(matches!(result, Err(Error::UnknownMaterial(_))));
}

#[test]
fn config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("target.json");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, r#"{{ "al_bins": 3, "al_material": "G4_Al" }}"#).unwrap();
    drop(file);

    let config = DetectorConfig::from_json_file(&path).unwrap();
    assert_eq!(config.al_bins, 3);
    assert_eq!(config.ta_bins, 1);

    let construction = DetectorConstruction::new(config);
    let detector = construction.construct().unwrap();
    let al = detector.geometry.logical(detector.scoring.foil_al).unwrap();
    assert_eq!(al.material.name, "G4_Al");

    assert!(matches!(
        DetectorConfig::from_json_file(dir.path().join("missing.json")),
        Err(Error::IOError(_))
    ));
}
