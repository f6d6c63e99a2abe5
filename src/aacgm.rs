//! # Aacgm: conversion context and public entry points
//!
//! This module defines the [`Aacgm`](crate::aacgm::Aacgm) struct, the façade that wires together:
//!
//! 1. **Environment** ([`AacgmEnv`]): coefficient locations and the coefficient altitude ceiling.
//! 2. **Transform primitive**: any [`CoordinateTransform`], e.g. a binding to the AACGM-v2
//!    coefficient library or the built-in [`DipoleTransform`].
//! 3. **IGRF dipole coefficients**: a shared, read-only [`GaussCoefficientSeries`] used for
//!    the dipole axis and magnetic local time.
//!
//! ## Conversion pipeline
//!
//! ```text
//! time input ──► Instant::resolve
//! lat/lon/alt ─► PointBatch::normalize ─► check_altitude ─► check_latitude ─► wrap_longitude
//!                                                                    │
//! flags ─────────────────────────────────────────────────────────────┴─► dispatch ─► rows
//! ```
//!
//! Argument errors and the altitude policy abort the call before the transform is touched.
//! Failures of individual points come back as NaN rows.
//!
//! ## Typical usage
//!
//! ```rust, no_run
//! use aacgm_wrap::{aacgm::Aacgm, env_state::AacgmEnv, flags::ConversionFlags};
//!
//! let mut aacgm = Aacgm::dipole(AacgmEnv::from_env()).unwrap();
//!
//! let point = aacgm
//!     .convert_latlon(60.0, 0.0, 300.0, "2015-01-01", ConversionFlags::from_string("G2A"))
//!     .unwrap();
//! let coords = aacgm
//!     .get_aacgm_coord(60.0, 0.0, 300.0, (2015, 1, 1), ConversionFlags::from_string("TRACE"))
//!     .unwrap();
//! println!("{point:?} {coords:?}");
//! ```
//!
//! ## Concurrency
//!
//! Conversions take `&mut self` because the transform keeps the current instant between
//! [`establish_instant`](CoordinateTransform::establish_instant) and the point calls. Share an
//! `Aacgm` across threads behind a `Mutex`; the IGRF table itself is behind an `Arc`.

use std::sync::Arc;

use nalgebra::Vector3;

use crate::{
    aacgm_errors::AacgmError,
    constants::{Degree, Hour, Kilometer},
    dispatcher::{dispatch, ConversionResult},
    env_state::AacgmEnv,
    flags::ConversionFlags,
    igrf::{dipole_axis, GaussCoefficientSeries},
    inputs::{CoordInput, PointBatch},
    mlt::{convert_mlt, convert_mlt_per_instant, mlon_to_mlt, MltDirection},
    time::{Instant, TimeInput},
    transform::{ConvertedPoint, CoordinateTransform, DipoleTransform},
    validation::{check_altitude, check_latitude, wrap_longitude},
};

/// AACGM-v2 latitude, longitude and magnetic local time of one location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagneticCoord {
    pub mlat: Degree,
    pub mlon: Degree,
    pub mlt: Hour,
}

/// Column-wise [`MagneticCoord`] for a batch of locations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MagneticCoords {
    pub mlat: Vec<Degree>,
    pub mlon: Vec<Degree>,
    pub mlt: Vec<Hour>,
}

#[derive(Debug, Clone)]
pub struct Aacgm<T: CoordinateTransform> {
    env: AacgmEnv,
    transform: T,
    igrf: Arc<GaussCoefficientSeries>,
}

impl Aacgm<DipoleTransform> {
    /// Context backed by the centred-dipole transform, reading the IGRF table at `env.igrf_coeffs`.
    pub fn dipole(env: AacgmEnv) -> Result<Self, AacgmError> {
        let igrf = Arc::new(GaussCoefficientSeries::from_file(&env.igrf_coeffs)?);
        let transform = DipoleTransform::new(Arc::clone(&igrf));
        Ok(Aacgm::new(env, transform, igrf))
    }
}

impl<T: CoordinateTransform> Aacgm<T> {
    pub fn new(env: AacgmEnv, transform: T, igrf: Arc<GaussCoefficientSeries>) -> Self {
        Aacgm {
            env,
            transform,
            igrf,
        }
    }

    /// Construct a context whose IGRF table is read from `env.igrf_coeffs`.
    ///
    /// Return
    /// ----------
    /// * a new [`Aacgm`], or [`AacgmError::IgrfFileNotFound`]/[`AacgmError::IgrfParseError`]
    pub fn with_transform(env: AacgmEnv, transform: T) -> Result<Self, AacgmError> {
        let igrf = GaussCoefficientSeries::from_file(&env.igrf_coeffs)?;
        Ok(Aacgm::new(env, transform, Arc::new(igrf)))
    }

    pub fn env(&self) -> &AacgmEnv {
        &self.env
    }

    pub fn igrf(&self) -> &Arc<GaussCoefficientSeries> {
        &self.igrf
    }

    pub fn transform(&self) -> &T {
        &self.transform
    }

    pub fn into_transform(self) -> T {
        self.transform
    }

    /// Validate and canonicalise a batch in place.
    fn prepare(&self, batch: &mut PointBatch, flags: ConversionFlags) -> Result<(), AacgmError> {
        check_altitude(batch.alt(), self.env.max_coeff_altitude, flags)?;
        check_latitude(batch.lat_mut())?;
        wrap_longitude(batch.lon_mut());
        Ok(())
    }

    /// Convert one location between geographic and AACGM-v2 coordinates.
    ///
    /// Arguments
    /// ---------
    /// * `lat`: input latitude in degrees N (`flags` tell which kind of latitude)
    /// * `lon`: input longitude in degrees E
    /// * `alt`: altitude above the surface of the Earth in km
    /// * `dtime`: date or date-time of the magnetic field
    /// * `flags`: direction and method, see [`ConversionFlags`]
    ///
    /// Return
    /// ------
    /// * the converted point, all NaN if the transform could not convert it
    /// * an [`AacgmError`] for invalid arguments, a refused altitude or an unsupported instant
    pub fn convert_latlon(
        &mut self,
        lat: Degree,
        lon: Degree,
        alt: Kilometer,
        dtime: impl Into<TimeInput>,
        flags: ConversionFlags,
    ) -> Result<ConvertedPoint, AacgmError> {
        let instant = Instant::resolve(dtime)?;
        let mut batch = PointBatch::single(lat, lon, alt);
        self.prepare(&mut batch, flags)?;

        let result = dispatch(&mut self.transform, &batch, &instant, flags)?;
        Ok(result.row(0).unwrap_or(ConvertedPoint::NAN))
    }

    /// Convert many locations at a single instant.
    ///
    /// `lat`, `lon` and `alt` may each be a scalar or a 1-D array; they are broadcast to a
    /// common length (see [`PointBatch::normalize`]). Rows are returned in input order.
    pub fn convert_latlon_arr(
        &mut self,
        lat: impl Into<CoordInput>,
        lon: impl Into<CoordInput>,
        alt: impl Into<CoordInput>,
        dtime: impl Into<TimeInput>,
        flags: ConversionFlags,
    ) -> Result<ConversionResult, AacgmError> {
        let instant = Instant::resolve(dtime)?;
        let mut batch = PointBatch::normalize(lat, lon, alt)?;
        self.prepare(&mut batch, flags)?;

        dispatch(&mut self.transform, &batch, &instant, flags)
    }

    /// AACGM-v2 latitude, longitude and MLT of a geographic location.
    ///
    /// `method` chooses how the transform is performed (`TRACE`, `ALLOWTRACE`, `BADIDEA`,
    /// `GEOCENTRIC`); the direction is always geographic → AACGM-v2, an `A2G` bit is ignored.
    /// A location the transform cannot convert yields NaN in all three fields.
    pub fn get_aacgm_coord(
        &mut self,
        glat: Degree,
        glon: Degree,
        alt: Kilometer,
        dtime: impl Into<TimeInput>,
        method: ConversionFlags,
    ) -> Result<MagneticCoord, AacgmError> {
        let instant = Instant::resolve(dtime)?;
        let point = self.convert_latlon(glat, glon, alt, instant, method.as_g2a())?;
        let mlt = mlon_to_mlt(point.lon, &instant, &self.igrf)?;

        Ok(MagneticCoord {
            mlat: point.lat,
            mlon: point.lon,
            mlt,
        })
    }

    /// Array version of [`get_aacgm_coord`](Self::get_aacgm_coord).
    pub fn get_aacgm_coord_arr(
        &mut self,
        glat: impl Into<CoordInput>,
        glon: impl Into<CoordInput>,
        alt: impl Into<CoordInput>,
        dtime: impl Into<TimeInput>,
        method: ConversionFlags,
    ) -> Result<MagneticCoords, AacgmError> {
        let instant = Instant::resolve(dtime)?;
        let result = self.convert_latlon_arr(glat, glon, alt, instant, method.as_g2a())?;
        let mlt = convert_mlt(&result.lon, &instant, &self.igrf, MltDirection::MlonToMlt)?;

        Ok(MagneticCoords {
            mlat: result.lat,
            mlon: result.lon,
            mlt,
        })
    }

    /// Convert magnetic longitudes to MLT, or back, at one instant.
    pub fn convert_mlt(
        &self,
        values: &[f64],
        dtime: impl Into<TimeInput>,
        direction: MltDirection,
    ) -> Result<Vec<f64>, AacgmError> {
        let instant = Instant::resolve(dtime)?;
        convert_mlt(values, &instant, &self.igrf, direction)
    }

    /// Convert magnetic longitudes to MLT, or back, each value with its own instant.
    pub fn convert_mlt_per_instant(
        &self,
        values: &[f64],
        instants: &[Instant],
        direction: MltDirection,
    ) -> Result<Vec<f64>, AacgmError> {
        convert_mlt_per_instant(values, instants, &self.igrf, direction)
    }

    /// Unit vector pointing at the northern IGRF dipole pole.
    pub fn dipole_axis(&self, dtime: impl Into<TimeInput>) -> Result<Vector3<f64>, AacgmError> {
        let instant = Instant::resolve(dtime)?;
        Ok(dipole_axis(&instant, &self.igrf))
    }
}

#[cfg(test)]
mod aacgm_test {
    use super::*;
    use crate::igrf::igrf_test::series;
    use approx::assert_abs_diff_eq;

    fn dipole_context() -> Aacgm<DipoleTransform> {
        let igrf = Arc::new(series());
        Aacgm::new(
            AacgmEnv::default(),
            DipoleTransform::new(Arc::clone(&igrf)),
            igrf,
        )
    }

    #[test]
    fn test_scalar_matches_batch_of_one() {
        let mut aacgm = dipole_context();
        let flags = ConversionFlags::from_string("G2A");
        let scalar = aacgm
            .convert_latlon(60.0, 0.0, 300.0, (2015, 1, 1, 0, 0, 0), flags)
            .unwrap();
        let batch = aacgm
            .convert_latlon_arr(vec![60.0], vec![0.0], vec![300.0], "2015-01-01", flags)
            .unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(batch.row(0), Some(scalar));
        assert!(!scalar.is_nan());
    }

    #[test]
    fn test_longitude_wrapped_before_transform() {
        let mut aacgm = dipole_context();
        let flags = ConversionFlags::default();
        let a = aacgm.convert_latlon(45.0, 350.0, 100.0, (2015, 1, 1), flags).unwrap();
        let b = aacgm.convert_latlon(45.0, -10.0, 100.0, (2015, 1, 1), flags).unwrap();
        assert_abs_diff_eq!(a.lat, b.lat, epsilon = 1e-12);
        assert_abs_diff_eq!(a.lon, b.lon, epsilon = 1e-12);
    }

    #[test]
    fn test_altitude_policy_refuses_batch() {
        let mut aacgm = dipole_context();
        let err = aacgm
            .convert_latlon_arr(vec![60.0, 61.0], 0.0, vec![300.0, 5500.0], (2015, 1, 1), ConversionFlags::default())
            .unwrap_err();
        assert!(matches!(err, AacgmError::CoefficientAltitudeExceeded { .. }));

        let ok = aacgm
            .convert_latlon(60.0, 0.0, 5500.0, (2015, 1, 1), ConversionFlags::from_string("TRACE"))
            .unwrap();
        assert!(!ok.is_nan());
    }

    #[test]
    fn test_env_ceiling_is_used() {
        let igrf = Arc::new(series());
        let mut aacgm = Aacgm::new(
            AacgmEnv::default().with_max_coeff_altitude(500.0),
            DipoleTransform::new(Arc::clone(&igrf)),
            igrf,
        );
        assert_eq!(
            aacgm.convert_latlon(60.0, 0.0, 600.0, (2015, 1, 1), ConversionFlags::default()),
            Err(AacgmError::CoefficientAltitudeExceeded {
                altitude: 600.0,
                limit: 500.0
            })
        );
    }

    #[test]
    fn test_get_aacgm_coord_ignores_a2g() {
        let mut aacgm = dipole_context();
        let dtime = (2015, 2, 24, 14, 0, 15);
        let coord = aacgm
            .get_aacgm_coord(60.0, 0.0, 300.0, dtime, ConversionFlags::from_string("A2G|TRACE"))
            .unwrap();
        let point = aacgm
            .convert_latlon(60.0, 0.0, 300.0, dtime, ConversionFlags::from_string("TRACE"))
            .unwrap();
        assert_eq!(coord.mlat, point.lat);
        assert_eq!(coord.mlon, point.lon);
        let mlt = aacgm.convert_mlt(&[point.lon], dtime, MltDirection::MlonToMlt).unwrap();
        assert_eq!(coord.mlt, mlt[0]);
    }

    #[test]
    fn test_get_aacgm_coord_arr_nan_propagates() {
        let mut aacgm = dipole_context();
        let coords = aacgm
            .get_aacgm_coord_arr(vec![60.0, f64::NAN], 0.0, 300.0, (2015, 1, 1), ConversionFlags::from_string("TRACE"))
            .unwrap();
        assert!(!coords.mlt[0].is_nan());
        assert!((0.0..24.0).contains(&coords.mlt[0]));
        assert!(coords.mlat[1].is_nan());
        assert!(coords.mlon[1].is_nan());
        assert!(coords.mlt[1].is_nan());
    }

    #[test]
    fn test_boxed_transform() {
        let igrf = Arc::new(series());
        let transform: Box<dyn CoordinateTransform> =
            Box::new(DipoleTransform::new(Arc::clone(&igrf)));
        let mut aacgm = Aacgm::new(AacgmEnv::default(), transform, igrf);
        let point = aacgm
            .convert_latlon(60.0, 0.0, 300.0, (2015, 1, 1), ConversionFlags::default())
            .unwrap();
        assert!(!point.is_nan());
    }

    #[test]
    fn test_dipole_axis_entry() {
        let aacgm = dipole_context();
        let axis = aacgm.dipole_axis("2015-01-01").unwrap();
        assert_abs_diff_eq!(axis.x, 0.0503, epsilon = 1e-3);
        assert_abs_diff_eq!(axis.y, -0.1606, epsilon = 1e-3);
        assert_abs_diff_eq!(axis.z, 0.9857, epsilon = 1e-3);
    }
}
