#![allow(dead_code)]

use std::sync::Arc;

use aacgm_wrap::{
    aacgm::Aacgm,
    dispatcher::ConversionResult,
    env_state::AacgmEnv,
    igrf::GaussCoefficientSeries,
    transform::{ConvertedPoint, DipoleTransform},
};
use approx::assert_abs_diff_eq;
use camino::Utf8Path;

pub const IGRF_TEST_FILE: &str = "tests/data/igrf12coeffs.txt";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn test_env() -> AacgmEnv {
    AacgmEnv::default().with_igrf_coeffs(IGRF_TEST_FILE)
}

pub fn igrf_series() -> Arc<GaussCoefficientSeries> {
    Arc::new(GaussCoefficientSeries::from_file(Utf8Path::new(IGRF_TEST_FILE)).unwrap())
}

pub fn dipole_aacgm() -> Aacgm<DipoleTransform> {
    init_tracing();
    Aacgm::dipole(test_env()).unwrap()
}

pub fn assert_point_close(actual: &ConvertedPoint, expected: &ConvertedPoint, epsilon: f64) {
    assert_abs_diff_eq!(actual.lat, expected.lat, epsilon = epsilon);
    assert_abs_diff_eq!(actual.lon, expected.lon, epsilon = epsilon);
    assert_abs_diff_eq!(actual.r, expected.r, epsilon = epsilon);
}

/// Rows of `result` at `indices`, in order.
pub fn select_rows(result: &ConversionResult, indices: &[usize]) -> Vec<ConvertedPoint> {
    indices.iter().filter_map(|&i| result.row(i)).collect()
}
