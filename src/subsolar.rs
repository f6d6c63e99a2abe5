use nalgebra::Vector3;

use crate::{
    aacgm_errors::AacgmError,
    constants::{Degree, RADEG, SUBSOLAR_FIRST_YEAR, SUBSOLAR_LAST_YEAR},
    time::Instant,
};

/// Geographic point where the Sun is at the zenith.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubsolarPoint {
    /// Geographic longitude in degrees east, in [-180°, 180°]
    pub longitude: Degree,
    /// Geographic latitude in degrees north (the solar declination)
    pub latitude: Degree,
}

impl SubsolarPoint {
    /// Geocentric Cartesian unit vector of the point.
    pub fn unit_vector(&self) -> Vector3<f64> {
        let (lat, lon) = (self.latitude * RADEG, self.longitude * RADEG);
        Vector3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
    }
}

/// Reduce an angle in degrees to the nearest representative of [-180°, 180°].
///
/// Ties round to even, so the reduction of ±180° does not depend on the sign.
fn reduce_degrees(angle: Degree) -> Degree {
    angle - 360.0 * (angle / 360.0).round_ties_even()
}

/// Compute the subsolar geographic longitude and latitude.
///
/// Based on the formulas of the Astronomical Almanac for the year 1996, p. C24, after the
/// Fortran code of A. D. Richmond (NCAR). The Almanac quotes an accuracy of 0.01° in latitude
/// and 0.025° in longitude between 1950 and 2050. Every day has exactly 86400 seconds: leap
/// seconds are ignored.
///
/// Arguments
/// ---------
/// * `year`: calendar year, between 1601 and 2100 inclusive
/// * `doy`: day of year, 1 for January 1st
/// * `utime`: seconds since midnight of that day
///
/// Return
/// ------
/// * the [`SubsolarPoint`], or [`AacgmError::SubsolarYearOutOfRange`]
pub fn subsolar_point(year: i32, doy: u32, utime: f64) -> Result<SubsolarPoint, AacgmError> {
    if !(SUBSOLAR_FIRST_YEAR..=SUBSOLAR_LAST_YEAR).contains(&year) {
        return Err(AacgmError::SubsolarYearOutOfRange(year));
    }

    let yr2 = f64::from(year - 2000);

    // Leap days since 1601, with the Julian/Gregorian century correction before 1901
    let mut nleap = (f64::from(year - 1601) / 4.0).floor() - 99.0;
    if year <= 1900 {
        let ncent = 3.0 - (f64::from(year - 1601) / 100.0).floor();
        nleap += ncent;
    }

    // Mean longitude of the Sun and mean anomaly at the start of the year
    let l0 = -79.549 + (-0.238699 * (yr2 - 4.0 * nleap) + 3.08514e-2 * nleap);
    let g0 = -2.472 + (-0.2558905 * (yr2 - 4.0 * nleap) - 3.79617e-2 * nleap);

    // Days (including fraction) since 12 UT on January 1 of the year
    let dfrac = (utime / 86400.0 - 1.5) + f64::from(doy);

    let l_sun = l0 + 0.9856474 * dfrac;
    let grad = (g0 + 0.9856003 * dfrac) * RADEG;

    // Ecliptic longitude
    let lmrad = (l_sun + 1.915 * grad.sin() + 0.020 * (2.0 * grad).sin()) * RADEG;
    let sinlm = lmrad.sin();

    // Days (including fraction) since 12 UT on January 1 of 2000
    let epoch_day = dfrac + 365.0 * yr2 + nleap;

    // Obliquity of the ecliptic
    let epsrad = (23.439 - 4.0e-7 * epoch_day) * RADEG;

    let alpha = (epsrad.cos() * sinlm).atan2(lmrad.cos()) / RADEG;
    let latitude = (epsrad.sin() * sinlm).asin() / RADEG;

    // Equation of time, then apparent time (the Earth turns one degree every 240 s)
    let etdeg = reduce_degrees(l_sun - alpha);
    let aptime = utime / 240.0 + etdeg;

    Ok(SubsolarPoint {
        longitude: reduce_degrees(180.0 - aptime),
        latitude,
    })
}

/// Subsolar point at an [`Instant`].
pub fn subsolar_point_at(instant: &Instant) -> Result<SubsolarPoint, AacgmError> {
    subsolar_point(
        instant.year(),
        instant.day_of_year(),
        f64::from(instant.seconds_of_day()),
    )
}
