// tests/unit_tests.rs
use approx::assert_relative_eq;
use serde_json::json;

use fire_detect::io::SensorHistory;
use fire_detect::layout::RowMajor;
use fire_detect::model::{Classifier, FeatureSchema, ObliviousEnsemble};
use fire_detect::processing::indices::{SpectralBands, SpectralIndex, SpectralIndices, EVI, NDI, SAVI, SR};
use fire_detect::processing::{
    assemble_features, assemble_pixel_table, emit_points, reconcile, score, summarize,
    FeatureTable, PIXEL_COLUMNS,
};
use fire_detect::raster::{GeoTransform, Grid};
use fire_detect::FireError;

const EPS: f64 = 1e-3;

/// Helper function to build same-shape band grids from flat values
fn create_bands(
    shape: (usize, usize),
    red: &[f64],
    green: &[f64],
    blue: &[f64],
    nir: &[f64],
) -> SpectralBands {
    let grid = |values: &[f64]| Grid::new(shape, values.to_vec()).unwrap();
    SpectralBands::new(grid(red), grid(green), grid(blue), grid(nir)).unwrap()
}

fn history(names: &[&str], rows: Vec<Vec<Option<f64>>>) -> SensorHistory {
    let ids = (0..rows.len()).map(|i| format!("2024-07-{:02}", i + 1)).collect();
    SensorHistory::new(
        "date",
        names.iter().map(|s| s.to_string()).collect(),
        ids,
        rows,
    )
    .unwrap()
}

/// Test NDVI, NDWI and GNDVI with known values
#[test]
fn test_normalized_difference_calculation() {
    let bands = create_bands(
        (1, 2),
        &[2500.0, 0.2],
        &[1000.0, 0.3],
        &[500.0, 0.1],
        &[5000.0, 0.6],
    );
    let indices = SpectralIndices::calculate(&bands, EPS);

    assert_relative_eq!(indices.ndvi.data()[[0, 0]], 2500.0 / (EPS + 7500.0), max_relative = 1e-12);
    assert_relative_eq!(indices.ndvi.data()[[0, 1]], 0.4 / (EPS + 0.8), epsilon = 1e-12);
    assert_relative_eq!(indices.ndwi.data()[[0, 0]], -4000.0 / (EPS + 6000.0), max_relative = 1e-12);
    assert_relative_eq!(indices.gndvi.data()[[0, 1]], 0.3 / (EPS + 0.9), epsilon = 1e-12);
}

/// Test EVI calculation with known values
#[test]
fn test_evi_calculation() {
    // EVI = 2.5 * (NIR - RED) / (eps + NIR + 6*RED - 7.5*BLUE + 1)
    let test_cases = [
        // NIR, RED, BLUE
        (0.5, 0.1, 0.05),
        (0.3, 0.3, 0.1),
        (5000.0, 2500.0, 1500.0),
    ];

    let evi = EVI::new(EPS);
    for (nir, red, blue) in test_cases {
        let bands = create_bands((1, 1), &[red], &[0.0], &[blue], &[nir]);
        let result = bands.apply(&evi);
        let expected = 2.5 * (nir - red) / (EPS + nir + 6.0 * red - 7.5 * blue + 1.0);
        assert_relative_eq!(result.data()[[0, 0]], expected);
    }
}

/// EVI is never clamped to [-1, 1]
#[test]
fn test_evi_not_clamped() {
    let bands = create_bands((1, 1), &[0.0], &[0.0], &[0.2], &[0.5]);
    let value = bands.apply(&EVI::new(EPS)).data()[[0, 0]];
    // denominator = 0.001 + 0.5 - 1.5 + 1 = 0.001
    assert!(value > 1000.0, "got {}", value);
}

#[test]
fn test_simple_ratio_calculation() {
    let bands = create_bands((1, 2), &[0.0, 2.0], &[0.0, 0.0], &[0.0, 0.0], &[1.0, 4.0]);
    let result = bands.apply(&SR::new(EPS));
    assert_relative_eq!(result.data()[[0, 0]], 1.0 / EPS);
    assert_relative_eq!(result.data()[[0, 1]], 4.0 / 2.001);
}

/// Test SAVI calculation with known values
#[test]
fn test_savi_calculation() {
    // SAVI = ((NIR - RED) / (NIR + RED + 0.5)) * 1.5
    let bands = create_bands((1, 2), &[2500.0, 0.1], &[0.0; 2], &[0.0; 2], &[5000.0, 0.5]);
    let result = bands.apply(&SAVI::new());
    assert_relative_eq!(result.data()[[0, 0]], (2500.0 / 7500.5) * 1.5);
    assert_relative_eq!(result.data()[[0, 1]], (0.4 / 1.1) * 1.5, epsilon = 1e-12);
}

/// SAVI has no stabilizer, so a zero denominator must surface as NaN/Inf
#[test]
fn test_savi_degenerate_denominator_propagates() {
    let bands = create_bands((1, 2), &[0.0, -0.25], &[0.0; 2], &[0.0; 2], &[0.0, -0.25]);
    let result = bands.apply(&SAVI::new());

    // nir = red = 0: (0 / 0.5) * 1.5 is a plain zero, denominator is not degenerate
    assert_eq!(result.data()[[0, 0]], 0.0);
    // nir + red + 0.5 == 0 and nir - red == 0: 0/0
    assert!(result.data()[[0, 1]].is_nan());

    let bands = create_bands((1, 1), &[-0.5], &[0.0], &[0.0], &[0.0]);
    let value = bands.apply(&SAVI::new()).data()[[0, 0]];
    assert!(value.is_infinite(), "expected Inf, got {}", value);
}

/// NaN and Inf inputs flow through the stabilized indices untouched
#[test]
fn test_nan_inputs_are_not_masked() {
    let bands = create_bands((1, 1), &[f64::NAN], &[0.1], &[0.1], &[0.5]);
    let indices = SpectralIndices::calculate(&bands, EPS);
    assert!(indices.ndvi.data()[[0, 0]].is_nan());
    assert!(indices.evi.data()[[0, 0]].is_nan());
    assert!(indices.savi.data()[[0, 0]].is_nan());
    assert!(indices.sr.data()[[0, 0]].is_nan());
    assert!(!indices.ndwi.data()[[0, 0]].is_nan());
}

/// Repeated computation is bit-identical
#[test]
fn test_indices_are_deterministic() {
    let n = 64 * 48;
    let red: Vec<f64> = (0..n).map(|i| (i % 97) as f64 * 0.013).collect();
    let green: Vec<f64> = (0..n).map(|i| (i % 89) as f64 * 0.011).collect();
    let blue: Vec<f64> = (0..n).map(|i| (i % 83) as f64 * 0.007).collect();
    let nir: Vec<f64> = (0..n).map(|i| (i % 79) as f64 * 0.017).collect();
    let bands = create_bands((48, 64), &red, &green, &blue, &nir);

    let first = SpectralIndices::calculate(&bands, EPS).into_columns();
    let second = SpectralIndices::calculate(&bands, EPS).into_columns();
    for ((name_a, a), (name_b, b)) in first.iter().zip(second.iter()) {
        assert_eq!(name_a, name_b);
        let bits_a: Vec<u64> = a.data().iter().map(|v| v.to_bits()).collect();
        let bits_b: Vec<u64> = b.data().iter().map(|v| v.to_bits()).collect();
        assert_eq!(bits_a, bits_b, "{} differs between runs", name_a);
    }
}

#[test]
fn test_mismatched_band_shapes_rejected() {
    let a = Grid::filled((2, 2), 1.0);
    let b = Grid::filled((2, 3), 1.0);
    let result = SpectralBands::new(a.clone(), a.clone(), b, a);
    assert!(matches!(result, Err(FireError::ShapeMismatch { .. })));
}

#[test]
fn test_index_names() {
    assert_eq!(NDI::ndvi(EPS).name(), "ndvi");
    assert_eq!(NDI::ndwi(EPS).name(), "ndwi");
    assert_eq!(NDI::gndvi(EPS).name(), "gndvi");
    assert_eq!(EVI::new(EPS).name(), "evi");
    assert_eq!(SAVI::new().name(), "savi");
    assert_eq!(SR::new(EPS).name(), "sr");
}

#[test]
fn test_row_major_contract() {
    let width = 7;
    for row in 0..5 {
        for col in 0..width {
            let i = RowMajor::index(row, col, width);
            assert_eq!(RowMajor::pixel(i, width), (row, col));
        }
    }
    assert_eq!(RowMajor::index(1, 0, width), 7);
    assert_eq!(RowMajor::len((5, 7)), 35);

    let grid = Grid::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
    assert_eq!(grid.shape(), (2, 3));
    assert_eq!(grid.to_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    assert_eq!(grid.get(1, 0), Some(4.0));
    let order: Vec<(usize, usize)> = grid.indexed_iter().map(|(r, c, _)| (r, c)).collect();
    assert_eq!(order, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
}

#[test]
fn test_pixel_table_layout() {
    // 2 rows x 3 columns; red encodes the pixel position
    let red = [0.0, 1.0, 2.0, 10.0, 11.0, 12.0];
    let bands = create_bands((2, 3), &red, &[0.2; 6], &[0.1; 6], &[0.5; 6]);
    let indices = SpectralIndices::calculate(&bands, EPS);
    let table = assemble_pixel_table(bands, indices).unwrap();

    assert_eq!(table.n_rows(), 6);
    assert!(table.names().eq(PIXEL_COLUMNS.iter().copied()));
    assert_eq!(table.column("red").unwrap().to_vec(), red.to_vec());
    // row 4 is pixel (1, 1)
    let (row, col) = RowMajor::pixel(4, 3);
    assert_eq!((row, col), (1, 1));
    assert_eq!(table.column("red").unwrap()[4], 11.0);
}

#[test]
fn test_aggregate_exactly_ten_rows() {
    let rows: Vec<Vec<Option<f64>>> = (1..=10)
        .map(|i| vec![Some(i as f64), Some(2.0 * i as f64)])
        .collect();
    let summary = summarize(&history(&["temp", "humidity"], rows), 10);

    assert_eq!(summary.len(), 2);
    assert_relative_eq!(summary.get("temp").unwrap(), 5.5);
    assert_relative_eq!(summary.get("humidity").unwrap(), 11.0);
}

#[test]
fn test_aggregate_uses_last_ten_of_fifteen() {
    let rows: Vec<Vec<Option<f64>>> = (1..=15).map(|i| vec![Some(i as f64)]).collect();
    let summary = summarize(&history(&["temp"], rows), 10);

    // mean of 6..=15
    assert_relative_eq!(summary.get("temp").unwrap(), 10.5);
}

#[test]
fn test_aggregate_short_history_uses_all_rows() {
    let rows = vec![vec![Some(1.0)], vec![Some(4.0)], vec![Some(7.0)]];
    let summary = summarize(&history(&["wind"], rows), 10);
    assert_relative_eq!(summary.get("wind").unwrap(), 4.0);
}

#[test]
fn test_aggregate_empty_history_is_all_missing() {
    let summary = summarize(&history(&["temp", "humidity"], vec![]), 10);
    assert_eq!(summary.len(), 2);
    assert!(summary.get("temp").unwrap().is_nan());
    assert!(summary.get("humidity").unwrap().is_nan());
}

#[test]
fn test_aggregate_skips_empty_cells() {
    let rows = vec![
        vec![Some(2.0), None],
        vec![None, None],
        vec![Some(4.0), None],
    ];
    let summary = summarize(&history(&["temp", "rain"], rows), 10);
    assert_relative_eq!(summary.get("temp").unwrap(), 3.0);
    assert!(summary.get("rain").unwrap().is_nan());
}

#[test]
fn test_history_from_csv() {
    let csv = "date,temp,humidity\n2024-07-01,20.5,40\n2024-07-02,,45\n2024-07-03,22.5,NaN\n";
    let history = SensorHistory::from_reader(csv.as_bytes()).unwrap();

    assert_eq!(history.id_column(), "date");
    assert_eq!(history.measurement_names(), &["temp", "humidity"]);
    assert_eq!(history.len(), 3);
    assert_eq!(history.ids()[1], "2024-07-02");
    assert_eq!(history.rows()[1], vec![None, Some(45.0)]);
    assert_eq!(history.rows()[2], vec![Some(22.5), None]);
}

#[test]
fn test_history_header_only_is_valid() {
    let history = SensorHistory::from_reader("date,temp\n".as_bytes()).unwrap();
    assert!(history.is_empty());
    assert!(summarize(&history, 10).get("temp").unwrap().is_nan());
}

#[test]
fn test_history_rejects_non_numeric() {
    let csv = "date,temp\n2024-07-01,hot\n";
    let err = SensorHistory::from_reader(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, FireError::TableRead(_)));
    assert!(err.is_source_read());
}

#[test]
fn test_history_rejects_empty_input() {
    let err = SensorHistory::from_reader("".as_bytes()).unwrap_err();
    assert!(err.is_source_read());
}

fn small_table() -> FeatureTable {
    let mut table = FeatureTable::new(3);
    table.push_column("red", vec![1.0, 2.0, 3.0]).unwrap();
    table.push_column("nir", vec![4.0, 5.0, 6.0]).unwrap();
    table.push_column("extra", vec![7.0, 8.0, 9.0]).unwrap();
    table
}

#[test]
fn test_reconcile_follows_schema_order() {
    let schema: FeatureSchema = ["nir", "temp", "red"].into_iter().collect();
    let summary = summarize(&history(&["temp"], vec![vec![Some(30.0)]]), 10);

    let matrix = assemble_features(small_table(), &summary, &schema).unwrap();

    assert_eq!(matrix.names(), &["nir", "temp", "red"]);
    assert_eq!(matrix.n_rows(), 3);
    assert_eq!(matrix.column(0).to_vec(), vec![4.0, 5.0, 6.0]);
    assert_eq!(matrix.column(1).to_vec(), vec![30.0, 30.0, 30.0]);
    assert_eq!(matrix.column(2).to_vec(), vec![1.0, 2.0, 3.0]);
    assert!(matrix.column_by_name("extra").is_none());
}

#[test]
fn test_reconcile_order_independent_of_input_order() {
    let schema: FeatureSchema = ["red", "nir"].into_iter().collect();

    let mut reversed = FeatureTable::new(3);
    reversed.push_column("nir", vec![4.0, 5.0, 6.0]).unwrap();
    reversed.push_column("red", vec![1.0, 2.0, 3.0]).unwrap();

    let a = reconcile(small_table(), &schema).unwrap();
    let b = reconcile(reversed, &schema).unwrap();
    assert_eq!(a.names(), b.names());
    assert_eq!(a.column(0), b.column(0));
    assert_eq!(a.column(1), b.column(1));
}

#[test]
fn test_reconcile_fills_missing_with_nan_not_zero() {
    let schema: FeatureSchema = ["red", "soil_moisture"].into_iter().collect();
    let matrix = reconcile(small_table(), &schema).unwrap();

    let filled = matrix.column_by_name("soil_moisture").unwrap();
    assert_eq!(filled.len(), 3);
    assert!(filled.iter().all(|v| v.is_nan()));
    assert!(filled.iter().all(|&v| v != 0.0));
}

#[test]
fn test_reconcile_prefers_pixel_column_on_duplicate_name() {
    let schema: FeatureSchema = ["red"].into_iter().collect();
    let summary = summarize(&history(&["red"], vec![vec![Some(99.0)]]), 10);
    let matrix = assemble_features(small_table(), &summary, &schema).unwrap();
    assert_eq!(matrix.column(0).to_vec(), vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_reconcile_repeated_schema_name() {
    let schema: FeatureSchema = ["red", "red"].into_iter().collect();
    let matrix = reconcile(small_table(), &schema).unwrap();
    assert_eq!(matrix.n_cols(), 2);
    assert_eq!(matrix.column(0), matrix.column(1));
}

#[test]
fn test_reconcile_empty_schema_fails() {
    let err = reconcile(small_table(), &FeatureSchema::new(vec![])).unwrap_err();
    assert!(err.is_schema_mismatch());
}

#[test]
fn test_emit_points_scan_order_and_strict_threshold() {
    let grid = Grid::from_rows(&[vec![0.9, 0.1], vec![0.95, 0.0]]).unwrap();
    // identity-like: x = col + 0.5, y = row + 0.5
    let transform = GeoTransform::from_gdal([0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);

    let points = emit_points(&grid, &transform, 0.85);

    assert_eq!(points.len(), 2);
    assert_eq!((points[0].row, points[0].col), (0, 0));
    assert_eq!((points[1].row, points[1].col), (1, 0));
    assert_eq!(points[0].coordinates(), [0.5, 0.5]);
    assert_eq!(points[1].coordinates(), [0.5, 1.5]);
}

#[test]
fn test_emit_points_equal_to_threshold_is_excluded() {
    let grid = Grid::from_rows(&[vec![0.85, 0.850001], vec![f64::NAN, 1.0]]).unwrap();
    let points = emit_points(&grid, &GeoTransform::default(), 0.85);
    let pixels: Vec<(usize, usize)> = points.iter().map(|p| (p.row, p.col)).collect();
    assert_eq!(pixels, vec![(0, 1), (1, 1)]);
}

#[test]
fn test_emit_points_all_high_yields_every_pixel() {
    let grid = Grid::filled((3, 4), 0.99);
    let points = emit_points(&grid, &GeoTransform::default(), 0.5);
    assert_eq!(points.len(), 12);
}

#[test]
fn test_pixel_to_geo_north_up() {
    let gt = GeoTransform::new(100.0, 200.0, 10.0, -10.0);
    let (x, y) = gt.pixel_to_geo(2, 5);
    assert_relative_eq!(x, 155.0);
    assert_relative_eq!(y, 175.0);
}

#[test]
fn test_pixel_to_geo_roundtrip() {
    let transforms = [
        GeoTransform::new(100.0, 200.0, 10.0, -10.0),
        GeoTransform::from_gdal([500000.0, 30.0, 2.5, 4200000.0, -1.5, -30.0]),
    ];

    for gt in transforms {
        for (row, col) in [(0, 0), (10, 3), (7, 250)] {
            let (x, y) = gt.pixel_to_geo(row, col);
            let (r, c) = gt.geo_to_pixel(x, y);
            assert_relative_eq!(r, row as f64 + 0.5, epsilon = 1e-6);
            assert_relative_eq!(c, col as f64 + 0.5, epsilon = 1e-6);
        }
    }
}

#[test]
fn test_row_and_col_are_not_swapped() {
    let gt = GeoTransform::new(0.0, 0.0, 1.0, -100.0);
    let (x, y) = gt.pixel_to_geo(1, 0);
    assert_relative_eq!(x, 0.5);
    assert_relative_eq!(y, -150.0);
}

fn stump_model() -> ObliviousEnsemble {
    let document = json!({
        "features_info": {
            "float_features": [
                { "feature_index": 0, "flat_feature_index": 0, "feature_id": "ndvi" },
                { "feature_index": 1, "flat_feature_index": 1, "feature_id": "temp",
                  "nan_value_treatment": "AsTrue" }
            ]
        },
        "oblivious_trees": [
            { "splits": [ { "float_feature_index": 0, "border": 0.0, "split_type": "FloatFeature" } ],
              "leaf_values": [-2.0, 2.0] },
            { "splits": [ { "float_feature_index": 0, "border": 0.5 },
                          { "float_feature_index": 1, "border": 30.0 } ],
              "leaf_values": [0.0, 0.5, 1.0, 1.5] }
        ],
        "scale_and_bias": [1.0, [-0.5]]
    });
    ObliviousEnsemble::from_json(&document.to_string()).unwrap()
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[test]
fn test_model_schema_and_scores() {
    let model = stump_model();
    assert_eq!(model.schema().names(), &["ndvi", "temp"]);
    assert_eq!(model.n_trees(), 2);

    let mut table = FeatureTable::new(4);
    table.push_column("temp", vec![20.0, 35.0, f64::NAN, 20.0]).unwrap();
    table.push_column("ndvi", vec![-0.3, 0.2, 0.7, f64::NAN]).unwrap();
    let matrix = reconcile(table, model.schema()).unwrap();

    let probabilities = model.predict_proba(&matrix).unwrap();
    assert_eq!(probabilities.len(), 4);
    // row 0: tree0 -> -2; tree1 bits (0, 0) -> 0.0
    assert_relative_eq!(probabilities[0], sigmoid(-2.0 + 0.0 - 0.5));
    // row 1: tree0 -> 2; tree1 bits (0, 1) -> leaf 2 -> 1.0
    assert_relative_eq!(probabilities[1], sigmoid(2.0 + 1.0 - 0.5));
    // row 2: NaN temp is AsTrue; tree1 bits (1, 1) -> 1.5
    assert_relative_eq!(probabilities[2], sigmoid(2.0 + 1.5 - 0.5));
    // row 3: NaN ndvi defaults to AsFalse
    assert_relative_eq!(probabilities[3], sigmoid(-2.0 + 0.0 - 0.5));
}

#[test]
fn test_score_reshapes_to_raster() {
    let model = stump_model();
    let mut table = FeatureTable::new(6);
    table
        .push_column("ndvi", vec![-1.0, 1.0, -1.0, 1.0, -1.0, 1.0])
        .unwrap();
    let matrix = reconcile(table, model.schema()).unwrap();

    let grid = score(&model, &matrix, (2, 3)).unwrap();
    assert_eq!(grid.shape(), (2, 3));
    assert_eq!(grid.len(), 6);
    assert!(grid.get(0, 1).unwrap() > grid.get(0, 0).unwrap());

    let err = score(&model, &matrix, (3, 3)).unwrap_err();
    assert!(matches!(err, FireError::ShapeMismatch { .. }));
}

#[test]
fn test_model_rejects_wrong_leaf_count() {
    let document = json!({
        "features_info": { "float_features": [
            { "feature_index": 0, "flat_feature_index": 0, "feature_id": "red" } ] },
        "oblivious_trees": [
            { "splits": [ { "float_feature_index": 0, "border": 0.0 } ],
              "leaf_values": [0.0, 1.0, 2.0] }
        ]
    });
    let err = ObliviousEnsemble::from_json(&document.to_string()).unwrap_err();
    assert!(matches!(err, FireError::ModelLoad(_)));
}

#[test]
fn test_model_rejects_unknown_split_feature() {
    let document = json!({
        "features_info": { "float_features": [
            { "feature_index": 0, "flat_feature_index": 0, "feature_id": "red" } ] },
        "oblivious_trees": [
            { "splits": [ { "float_feature_index": 3, "border": 0.0 } ],
              "leaf_values": [0.0, 1.0] }
        ]
    });
    assert!(ObliviousEnsemble::from_json(&document.to_string()).is_err());
}

#[test]
fn test_model_without_features_has_empty_schema() {
    let document = json!({ "features_info": {}, "oblivious_trees": [] });
    let model = ObliviousEnsemble::from_json(&document.to_string()).unwrap();
    assert!(model.schema().is_empty());
    assert!(fire_detect::model::require_schema(&model)
        .unwrap_err()
        .is_schema_mismatch());
}

#[test]
fn test_model_rejects_mismatched_matrix() {
    let model = stump_model();
    let schema: FeatureSchema = ["temp", "ndvi"].into_iter().collect();
    let mut table = FeatureTable::new(1);
    table.push_column("ndvi", vec![0.0]).unwrap();
    let matrix = reconcile(table, &schema).unwrap();
    assert!(model.predict_proba(&matrix).unwrap_err().is_schema_mismatch());
}

#[test]
fn test_detection_point_geojson() {
    let grid = Grid::from_rows(&[vec![0.9]]).unwrap();
    let points = emit_points(&grid, &GeoTransform::new(10.0, 20.0, 2.0, -2.0), 0.5);
    let value = serde_json::to_value(&points).unwrap();
    assert_eq!(
        value,
        json!([{ "type": "Point", "coordinates": [11.0, 19.0] }])
    );
}

#[test]
fn test_model_rejects_multiclass_bias() {
    let document = json!({
        "features_info": { "float_features": [
            { "feature_index": 0, "flat_feature_index": 0, "feature_id": "red" } ] },
        "oblivious_trees": [],
        "scale_and_bias": [1.0, [0.0, 0.1, 0.2]]
    });
    let err = ObliviousEnsemble::from_json(&document.to_string()).unwrap_err();
    assert!(matches!(err, FireError::ModelLoad(_)));
}

#[test]
fn test_history_reads_dataframe_missing_tokens() {
    let csv = "date,temp\n1,None\n2,<NA>\n3,1.#QNAN\n4,-1.#IND\n5,#N/A N/A\n6,18.5\n";
    let history = SensorHistory::from_reader(csv.as_bytes()).unwrap();

    assert_eq!(history.len(), 6);
    assert!(history.rows()[..5].iter().all(|row| row[0].is_none()));
    assert_eq!(history.rows()[5], vec![Some(18.5)]);
    assert_relative_eq!(summarize(&history, 10).get("temp").unwrap(), 18.5);
}

#[test]
fn test_grid_flattens_in_scan_order() {
    let grid = Grid::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
    let flat = grid.flat().unwrap();
    for (i, &value) in flat.iter().enumerate() {
        let (row, col) = RowMajor::pixel(i, grid.width());
        assert_eq!(grid.data()[[row, col]], value);
    }

    let back = RowMajor::reshape(flat.to_vec(), grid.shape()).unwrap();
    assert_eq!(&back, grid.data());
    assert!(RowMajor::reshape(vec![1.0; 5], (2, 3)).is_err());
}

#[test]
fn test_feature_matrix_is_pixels_by_schema() {
    let bands = create_bands((2, 3), &[0.1; 6], &[0.2; 6], &[0.1; 6], &[0.5; 6]);
    let indices = SpectralIndices::calculate(&bands, EPS);
    let table = assemble_pixel_table(bands, indices).unwrap();
    assert_eq!(table.data().dim(), (6, PIXEL_COLUMNS.len()));

    let schema: FeatureSchema = ["ndvi", "temp", "humidity", "red"].into_iter().collect();
    let summary = summarize(
        &history(&["humidity", "temp"], vec![vec![Some(40.0), Some(31.0)]]),
        10,
    );
    let matrix = assemble_features(table, &summary, &schema).unwrap();

    assert_eq!(matrix.data().dim(), (6, 4));
    for row in matrix.data().outer_iter() {
        assert_eq!(row[1], 31.0);
        assert_eq!(row[2], 40.0);
        assert_eq!(row[3], 0.1);
    }
}

#[test]
fn test_table_append_rejects_wrong_row_count() {
    let mut table = small_table();
    let block = ndarray::Array2::<f64>::zeros((2, 1));
    let err = table
        .append(vec!["short".to_string()], block.view())
        .unwrap_err();
    assert!(matches!(err, FireError::ShapeMismatch { expected: 3, actual: 2 }));
    assert_eq!(table.n_cols(), 3);
}
