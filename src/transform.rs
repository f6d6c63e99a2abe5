//! # Coordinate transform primitive
//!
//! The AACGM-v2 transform itself (spherical-harmonic coefficients or field-line tracing) is
//! an external collaborator. The rest of the crate only relies on the
//! [`CoordinateTransform`] contract:
//!
//! 1. [`CoordinateTransform::establish_instant`] sets the internal time state, once per batch;
//! 2. [`CoordinateTransform::transform_point`] converts one point under that time state.
//!
//! The primitive is stateful (it remembers the current instant), hence `&mut self`: two
//! batches must never interleave on the same transform. Wrap it in a `Mutex` to share it.
//!
//! [`DipoleTransform`] is a self-contained implementation based on the IGRF centred dipole,
//! handy when the AACGM-v2 coefficient files are not available and for testing.

use std::sync::Arc;

use nalgebra::{Matrix3, Vector3};
use thiserror::Error;

use crate::{
    aacgm_errors::AacgmError,
    constants::{Degree, EarthRadii, Kilometer, IGRF_EXTRAPOLATION_YEARS, RADEG, RE},
    flags::ConversionFlags,
    geodesy::{gc2gd_lat, gd2gc_lat},
    igrf::{dipole_axis, dipole_frame, GaussCoefficientSeries},
    time::Instant,
};

/// Output of one successful point conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvertedPoint {
    /// Output latitude in degrees north
    pub lat: Degree,
    /// Output longitude in degrees east
    pub lon: Degree,
    /// Geocentric radial distance in Earth radii
    pub r: EarthRadii,
}

impl ConvertedPoint {
    pub const NAN: ConvertedPoint = ConvertedPoint {
        lat: f64::NAN,
        lon: f64::NAN,
        r: f64::NAN,
    };

    /// True when this is a failure marker (any NaN component).
    pub fn is_nan(&self) -> bool {
        self.lat.is_nan() || self.lon.is_nan() || self.r.is_nan()
    }
}

/// Recoverable failure of a single point; it never aborts a batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PointFailure {
    #[error("the field line through this point does not reach the requested altitude")]
    ForbiddenRegion,

    #[error("field-line tracing did not converge")]
    NonConvergentTrace,

    #[error("non-finite input coordinate")]
    NonFiniteInput,

    #[error("no instant was established before the conversion")]
    InstantNotEstablished,

    /// Raw status code for implementations binding a native AACGM-v2 library.
    #[error("transform error code {0}")]
    ErrorCode(i32),
}

pub type ConversionOutcome = Result<ConvertedPoint, PointFailure>;

/// Stateful coordinate transform between geographic and AACGM-v2 coordinates.
pub trait CoordinateTransform {
    /// Set the epoch used by the following [`transform_point`](Self::transform_point) calls.
    ///
    /// A failure here is fatal for the whole batch.
    fn establish_instant(&mut self, instant: &Instant) -> Result<(), AacgmError>;

    /// Convert a single point.
    ///
    /// Arguments
    /// ---------
    /// * `lat`: input latitude in degrees north, within [-90°, 90°]
    /// * `lon`: input longitude in degrees east, within [-180°, 180°)
    /// * `alt`: altitude above the surface of the Earth in km
    /// * `flags`: direction and method of the conversion
    fn transform_point(
        &mut self,
        lat: Degree,
        lon: Degree,
        alt: Kilometer,
        flags: ConversionFlags,
    ) -> Result<ConvertedPoint, PointFailure>;
}

impl<T: CoordinateTransform + ?Sized> CoordinateTransform for Box<T> {
    fn establish_instant(&mut self, instant: &Instant) -> Result<(), AacgmError> {
        (**self).establish_instant(instant)
    }

    fn transform_point(
        &mut self,
        lat: Degree,
        lon: Degree,
        alt: Kilometer,
        flags: ConversionFlags,
    ) -> Result<ConvertedPoint, PointFailure> {
        (**self).transform_point(lat, lon, alt, flags)
    }
}

/// Altitude-adjusted centred-dipole transform.
///
/// Geographic points are rotated into the dipole frame of the instant, then the dipole
/// latitude is mapped along the dipole field line down to the reference sphere of radius
/// `RE`: `cos²λ = cos²λd · RE / (RE + h)`. The inverse mapping fails when the field line
/// never reaches the requested altitude.
///
/// Field lines of a dipole are analytic, so `TRACE`, `ALLOWTRACE` and `BADIDEA` do not change
/// the result.
#[derive(Debug, Clone)]
pub struct DipoleTransform {
    series: Arc<GaussCoefficientSeries>,
    frame: Option<Matrix3<f64>>,
}

impl DipoleTransform {
    pub fn new(series: Arc<GaussCoefficientSeries>) -> Self {
        DipoleTransform {
            series,
            frame: None,
        }
    }

    fn unit_vector(lat: Degree, lon: Degree) -> Vector3<f64> {
        let (lat, lon) = (lat * RADEG, lon * RADEG);
        Vector3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
    }

    fn angles(v: &Vector3<f64>) -> (Degree, Degree) {
        (
            v.z.clamp(-1.0, 1.0).asin() / RADEG,
            v.y.atan2(v.x) / RADEG,
        )
    }

    /// Move a latitude along a dipole field line: `cos²λ_out = scale · cos²λ_in`.
    fn map_along_field_line(lat: Degree, scale: f64) -> Result<Degree, PointFailure> {
        let cos2 = (lat * RADEG).cos().powi(2) * scale;
        if cos2 > 1.0 {
            return Err(PointFailure::ForbiddenRegion);
        }
        Ok(lat.signum() * cos2.sqrt().acos() / RADEG)
    }
}

impl CoordinateTransform for DipoleTransform {
    fn establish_instant(&mut self, instant: &Instant) -> Result<(), AacgmError> {
        let year = instant.fractional_year();
        let (first, last) = (self.series.first_epoch(), self.series.last_epoch());

        if year < first || year > last + IGRF_EXTRAPOLATION_YEARS {
            return Err(AacgmError::InstantNotSupported {
                year,
                reason: format!(
                    "IGRF dipole valid from {first} to {}",
                    last + IGRF_EXTRAPOLATION_YEARS
                ),
            });
        }

        self.frame = Some(dipole_frame(&dipole_axis(instant, &self.series)));
        tracing::debug!(%instant, "dipole frame established");
        Ok(())
    }

    fn transform_point(
        &mut self,
        lat: Degree,
        lon: Degree,
        alt: Kilometer,
        flags: ConversionFlags,
    ) -> Result<ConvertedPoint, PointFailure> {
        let frame = self.frame.ok_or(PointFailure::InstantNotEstablished)?;
        if !(lat.is_finite() && lon.is_finite() && alt.is_finite()) {
            return Err(PointFailure::NonFiniteInput);
        }

        let r = (RE + alt) / RE;

        if flags.is_a2g() {
            let dipole_lat = Self::map_along_field_line(lat, r)?;
            let geo = frame.transpose() * Self::unit_vector(dipole_lat, lon);
            let (gc_lat, geo_lon) = Self::angles(&geo);
            let out_lat = if flags.is_geocentric() {
                gc_lat
            } else {
                gc2gd_lat(gc_lat)
            };
            Ok(ConvertedPoint {
                lat: out_lat,
                lon: geo_lon,
                r,
            })
        } else {
            let gc_lat = if flags.is_geocentric() {
                lat
            } else {
                gd2gc_lat(lat)
            };
            let dipole = frame * Self::unit_vector(gc_lat, lon);
            let (dipole_lat, dipole_lon) = Self::angles(&dipole);
            Ok(ConvertedPoint {
                lat: Self::map_along_field_line(dipole_lat, 1.0 / r)?,
                lon: dipole_lon,
                r,
            })
        }
    }
}

#[cfg(test)]
mod transform_test {
    use super::*;
    use crate::igrf::igrf_test::series;
    use approx::assert_abs_diff_eq;

    fn established() -> DipoleTransform {
        let mut transform = DipoleTransform::new(Arc::new(series()));
        transform
            .establish_instant(&Instant::from_date(2015, 1, 1).unwrap())
            .unwrap();
        transform
    }

    #[test]
    fn test_requires_instant() {
        let mut transform = DipoleTransform::new(Arc::new(series()));
        assert_eq!(
            transform.transform_point(60.0, 0.0, 300.0, ConversionFlags::default()),
            Err(PointFailure::InstantNotEstablished)
        );
    }

    #[test]
    fn test_instant_outside_model() {
        let mut transform = DipoleTransform::new(Arc::new(series()));
        let err = transform
            .establish_instant(&Instant::from_date(1990, 1, 1).unwrap())
            .unwrap_err();
        assert!(matches!(err, AacgmError::InstantNotSupported { .. }));

        assert!(transform
            .establish_instant(&Instant::from_date(2019, 6, 1).unwrap())
            .is_ok());
        assert!(transform
            .establish_instant(&Instant::from_date(2020, 6, 1).unwrap())
            .is_err());
    }

    #[test]
    fn test_dipole_pole_maps_to_magnetic_pole() {
        let mut transform = established();
        let axis = dipole_axis(&Instant::from_date(2015, 1, 1).unwrap(), &series());
        let (pole_lat, pole_lon) = DipoleTransform::angles(&axis);

        let flags = ConversionFlags::from_string("G2A|GEOCENTRIC");
        let out = transform.transform_point(pole_lat, pole_lon, 0.0, flags).unwrap();
        assert_abs_diff_eq!(out.lat, 90.0, epsilon = 1e-6);
        assert_abs_diff_eq!(out.r, 1.0);
    }

    #[test]
    fn test_altitude_raises_magnetic_latitude() {
        let mut transform = established();
        let flags = ConversionFlags::default();
        let ground = transform.transform_point(60.0, 0.0, 0.0, flags).unwrap();
        let high = transform.transform_point(60.0, 0.0, 300.0, flags).unwrap();
        assert!(high.lat > ground.lat);
        assert_abs_diff_eq!(high.lon, ground.lon, epsilon = 1e-12);
        assert_abs_diff_eq!(high.r, (RE + 300.0) / RE, epsilon = 1e-15);
    }

    #[test]
    fn test_g2a_a2g_round_trip() {
        let mut transform = established();
        for method in ["G2A", "G2A|GEOCENTRIC", "G2A|TRACE"] {
            let g2a = ConversionFlags::from_string(method);
            let a2g = ConversionFlags::from_string(&format!("{method}|A2G"));
            for (lat, lon, alt) in [(60.0, 0.0, 300.0), (-45.0, 120.0, 1000.0), (75.0, -100.0, 0.0)] {
                let mag = transform.transform_point(lat, lon, alt, g2a).unwrap();
                let geo = transform.transform_point(mag.lat, mag.lon, alt, a2g).unwrap();
                assert_abs_diff_eq!(geo.lat, lat, epsilon = 1e-8);
                assert_abs_diff_eq!(geo.lon, lon, epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn test_forbidden_region() {
        let mut transform = established();
        let a2g = ConversionFlags::from_string("A2G");
        // the field line of a 10° magnetic latitude peaks near 1.03 RE, far below 3 RE
        assert_eq!(
            transform.transform_point(10.0, 0.0, 2.0 * RE, a2g),
            Err(PointFailure::ForbiddenRegion)
        );
        assert_eq!(
            transform.transform_point(f64::NAN, 0.0, 300.0, a2g),
            Err(PointFailure::NonFiniteInput)
        );
    }
}
