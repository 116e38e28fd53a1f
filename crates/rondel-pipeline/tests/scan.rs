//! End-to-end scan behavior over small labeled volumes.

#![allow(clippy::unwrap_used)]

use ndarray::ArrayD;
use rondel_pipeline::{
    AxisTag, BorderKernel, InputRow, LabeledVolume, NullMonitor, OutputRow, ScanConfig, ScanDriver,
};

/// Build a 2D char-labeled volume from y-major rows; '.' is background.
fn volume_2d(rows: &[&str]) -> LabeledVolume<char> {
    let height = rows.len();
    let width = rows[0].len();
    let mut data = ArrayD::from_elem(vec![width, height], '.');
    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            data[[x, y]] = ch;
        }
    }
    LabeledVolume::new(data, vec![AxisTag::X, AxisTag::Y], '.').unwrap()
}

/// Stack 2D char planes along a trailing Z axis.
fn volume_3d(planes: &[&[&str]]) -> LabeledVolume<char> {
    let height = planes[0].len();
    let width = planes[0][0].len();
    let mut data = ArrayD::from_elem(vec![width, height, planes.len()], '.');
    for (z, plane) in planes.iter().enumerate() {
        for (y, row) in plane.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                data[[x, y, z]] = ch;
            }
        }
    }
    LabeledVolume::new(data, vec![AxisTag::X, AxisTag::Y, AxisTag::Z], '.').unwrap()
}

fn scan(rows: Vec<InputRow<char>>) -> Vec<OutputRow> {
    let driver = ScanDriver::new(ScanConfig::default(), BorderKernel).unwrap();
    let mut output = Vec::new();
    driver.run(rows, &NullMonitor, &mut output).unwrap();
    output
}

#[test]
fn three_by_three_square_yields_sqrt_two_radii() {
    let rows = vec![InputRow {
        key: "Row0".to_owned(),
        cell: Some(volume_2d(&["LLL", "LLL", "LLL"])),
    }];
    let output = scan(rows);

    assert_eq!(output.len(), 1);
    assert_eq!(output[0].key, "Row0_RegionL_Slice0");
    let expected = 2.0_f64.sqrt();
    assert!((output[0].min_radius.unwrap() - expected).abs() < 1e-9);
    assert!((output[0].max_radius.unwrap() - expected).abs() < 1e-9);
}

#[test]
fn missing_cell_row_emits_one_missing_row_then_continues() {
    let rows = vec![
        InputRow {
            key: "Row3".to_owned(),
            cell: None,
        },
        InputRow {
            key: "Row4".to_owned(),
            cell: Some(volume_2d(&["A"])),
        },
    ];
    let output = scan(rows);

    assert_eq!(output.len(), 2);
    assert_eq!(output[0].key, "Row3");
    assert!(output[0].is_missing());
    assert_eq!(output[1].key, "Row4_RegionA_Slice0");
}

#[test]
fn repeated_label_across_slices_gets_distinct_keys() {
    let plane: &[&str] = &["LL", "LL"];
    let rows = vec![InputRow {
        key: "Row0".to_owned(),
        cell: Some(volume_3d(&[plane, plane, plane])),
    }];
    let output = scan(rows);

    let mut keys: Vec<&str> = output.iter().map(|r| r.key.as_str()).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "Row0_RegionL_Slice0",
            "Row0_RegionL_Slice1",
            "Row0_RegionL_Slice2",
        ]
    );
}

#[test]
fn row_count_matches_region_slice_count() {
    // Two labels in slice 0, one label in slice 1, empty slice 2.
    let rows = vec![InputRow {
        key: "Row0".to_owned(),
        cell: Some(volume_3d(&[
            &["AA..", "AA..", "..BB"],
            &["CC..", "CC..", "...."],
            &["....", "....", "...."],
        ])),
    }];
    let output = scan(rows);
    assert_eq!(output.len(), 3);
    assert!(output.iter().all(|r| !r.is_missing()));
}

#[test]
fn rerunning_an_identical_scan_is_deterministic() {
    let cell = volume_3d(&[
        &["AA.B", "AA.B", "...."],
        &["..C.", ".CC.", "..C."],
        &["DDDD", "D..D", "DDDD"],
    ]);
    let rows = || {
        vec![InputRow {
            key: "Row0".to_owned(),
            cell: Some(cell.clone()),
        }]
    };

    let mut first = scan(rows());
    let mut second = scan(rows());
    first.sort_by(|a, b| a.key.cmp(&b.key));
    second.sort_by(|a, b| a.key.cmp(&b.key));
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn disconnected_same_label_components_merge_into_one_row() {
    // Two disconnected 'L' components in one slice form one region:
    // identity depends only on label and slice index, so they must not
    // produce colliding row keys.
    let rows = vec![InputRow {
        key: "Row0".to_owned(),
        cell: Some(volume_2d(&["L...L"])),
    }];
    let output = scan(rows);
    assert_eq!(output.len(), 1);
    assert_eq!(output[0].key, "Row0_RegionL_Slice0");
}

#[test]
fn all_row_keys_within_a_row_are_unique() {
    // Disconnected same-label components in several slices, mixed with
    // a second label: every emitted key must be distinct.
    let rows = vec![InputRow {
        key: "Row0".to_owned(),
        cell: Some(volume_3d(&[
            &["A.A", ".B."],
            &["AA.", "..B"],
            &["B.B", ".A."],
        ])),
    }];
    let output = scan(rows);
    assert_eq!(output.len(), 6);

    let mut keys: Vec<&str> = output.iter().map(|r| r.key.as_str()).collect();
    keys.sort_unstable();
    let mut unique = keys.clone();
    unique.dedup();
    assert_eq!(unique, keys);
}
