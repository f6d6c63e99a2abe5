use crate::{
    aacgm_errors::AacgmError,
    constants::{Degree, Kilometer, MAX_LATITUDE_TOLERANCE},
    flags::ConversionFlags,
};

/// Reject unrealistic latitudes and clamp the round-off band (90°, 90.1°] back to ±90°.
///
/// Arguments
/// ---------
/// * `lat`: latitudes in degrees, modified in place
///
/// Return
/// ------
/// * `Err(UnrealisticLatitude)` with the first offending value if any |lat| > 90.1°;
///   in that case `lat` is left untouched.
pub fn check_latitude(lat: &mut [Degree]) -> Result<(), AacgmError> {
    if let Some(bad) = lat.iter().find(|l| l.abs() > MAX_LATITUDE_TOLERANCE) {
        tracing::error!(latitude = *bad, "unrealistic latitude");
        return Err(AacgmError::UnrealisticLatitude(*bad));
    }
    for l in lat.iter_mut() {
        *l = l.clamp(-90.0, 90.0);
    }
    Ok(())
}

/// Apply the altitude policy to a whole batch before any transform call.
///
/// Altitudes above `max_coeff_altitude` are refused unless `flags` enables tracing or
/// explicitly accepts out-of-range coefficients. Negative altitudes are only reported.
pub fn check_altitude(
    alt: &[Kilometer],
    max_coeff_altitude: Kilometer,
    flags: ConversionFlags,
) -> Result<(), AacgmError> {
    // NaN altitudes are ignored here, like a nan-aware max
    let highest = alt
        .iter()
        .copied()
        .filter(|a| !a.is_nan())
        .fold(f64::NEG_INFINITY, f64::max);
    let lowest = alt
        .iter()
        .copied()
        .filter(|a| !a.is_nan())
        .fold(f64::INFINITY, f64::min);

    if lowest < 0.0 {
        tracing::warn!(altitude = lowest, "conversion not intended for altitudes < 0 km");
    }

    if highest > max_coeff_altitude && !flags.allows_high_altitude() {
        let err = AacgmError::CoefficientAltitudeExceeded {
            altitude: highest,
            limit: max_coeff_altitude,
        };
        tracing::error!("{err}");
        return Err(err);
    }
    Ok(())
}

/// Wrap longitudes into [-180°, 180°).
pub fn wrap_longitude(lon: &mut [Degree]) {
    for l in lon.iter_mut() {
        *l = (*l + 180.0).rem_euclid(360.0) - 180.0;
    }
}

#[cfg(test)]
mod validation_test {
    use super::*;
    use crate::constants::MAX_COEFF_ALTITUDE;

    #[test]
    fn test_latitude_unchanged_inside_range() {
        let mut lat = vec![-90.0, -45.5, 0.0, 60.0, 90.0];
        check_latitude(&mut lat).unwrap();
        assert_eq!(lat, vec![-90.0, -45.5, 0.0, 60.0, 90.0]);
    }

    #[test]
    fn test_latitude_clamped_in_tolerance_band() {
        let mut lat = vec![90.05, -90.1, 89.0];
        check_latitude(&mut lat).unwrap();
        assert_eq!(lat, vec![90.0, -90.0, 89.0]);
    }

    #[test]
    fn test_unrealistic_latitude() {
        let mut lat = vec![60.0, 91.0];
        assert_eq!(
            check_latitude(&mut lat),
            Err(AacgmError::UnrealisticLatitude(91.0))
        );
        assert_eq!(lat, vec![60.0, 91.0]);

        let mut lat = vec![-90.2];
        assert!(check_latitude(&mut lat).is_err());
    }

    #[test]
    fn test_altitude_policy() {
        let g2a = ConversionFlags::from_string("G2A");
        assert!(check_altitude(&[300.0, 2000.0], MAX_COEFF_ALTITUDE, g2a).is_ok());
        assert_eq!(
            check_altitude(&[300.0, 5500.0], MAX_COEFF_ALTITUDE, g2a),
            Err(AacgmError::CoefficientAltitudeExceeded {
                altitude: 5500.0,
                limit: 2000.0
            })
        );

        for method in ["TRACE", "ALLOWTRACE", "BADIDEA"] {
            let flags = ConversionFlags::from_string(method);
            assert!(check_altitude(&[5500.0], MAX_COEFF_ALTITUDE, flags).is_ok());
        }
        assert!(check_altitude(
            &[5500.0],
            MAX_COEFF_ALTITUDE,
            ConversionFlags::from_string("GEOCENTRIC")
        )
        .is_err());
    }

    #[test]
    fn test_negative_altitude_is_advisory() {
        let flags = ConversionFlags::default();
        assert!(check_altitude(&[-10.0], MAX_COEFF_ALTITUDE, flags).is_ok());
        assert!(check_altitude(&[f64::NAN, 100.0], MAX_COEFF_ALTITUDE, flags).is_ok());
    }

    #[test]
    fn test_wrap_longitude() {
        let mut lon = vec![0.0, 180.0, -180.0, 190.0, -190.0, 540.0, 359.5];
        wrap_longitude(&mut lon);
        assert_eq!(lon, vec![0.0, -180.0, -180.0, -170.0, 170.0, -180.0, -0.5]);
    }
}
