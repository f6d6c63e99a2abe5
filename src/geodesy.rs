use crate::constants::{Degree, RADEG, WGS84_E2};

/// Convert a geocentric latitude to a geodetic latitude on the WGS-84 ellipsoid.
///
/// Arguments
/// ---------
/// * `gc_lat`: geocentric latitude in degrees north
///
/// Return
/// ------
/// * geodetic latitude in degrees north
pub fn gc2gd_lat(gc_lat: Degree) -> Degree {
    ((gc_lat * RADEG).tan() / (1.0 - WGS84_E2)).atan() / RADEG
}

/// Inverse of [`gc2gd_lat`].
pub fn gd2gc_lat(gd_lat: Degree) -> Degree {
    ((gd_lat * RADEG).tan() * (1.0 - WGS84_E2)).atan() / RADEG
}

/// Element-wise [`gc2gd_lat`].
pub fn gc2gd_lat_arr(gc_lat: &[Degree]) -> Vec<Degree> {
    gc_lat.iter().copied().map(gc2gd_lat).collect()
}
