//! # Magnetic local time
//!
//! Magnetic local time is the hour angle between a magnetic meridian and the magnetic
//! meridian of the subsolar point, measured in the centred-dipole frame:
//!
//! ```text
//! MLT  = ((mlon − mlon_subsol) / 15 + 12) mod 24
//! mlon = (15 · (MLT − 12) + mlon_subsol) mod 360
//! ```
//!
//! `mlon_subsol` is the dipole longitude of the subsolar point: the subsolar unit vector
//! (see [`crate::subsolar`]) rotated into the frame built on the IGRF dipole axis
//! (see [`crate::igrf::dipole_frame`]).

use crate::{
    aacgm_errors::AacgmError,
    constants::{Degree, Hour, DEG_PER_HOUR, RADEG},
    igrf::{dipole_axis, dipole_frame, GaussCoefficientSeries},
    subsolar::subsolar_point_at,
    time::Instant,
};

/// Direction of an MLT conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MltDirection {
    /// Magnetic longitude (degrees) → magnetic local time (hours)
    #[default]
    MlonToMlt,
    /// Magnetic local time (hours) → magnetic longitude (degrees)
    MltToMlon,
}

/// Floor modulo into [0, period), also for inputs that round up to `period`.
fn wrap(value: f64, period: f64) -> f64 {
    let wrapped = value.rem_euclid(period);
    if wrapped >= period {
        wrapped - period
    } else {
        wrapped
    }
}

/// Dipole longitude of the subsolar point at `instant`, in degrees within [-180°, 180°].
pub fn subsolar_dipole_longitude(
    instant: &Instant,
    series: &GaussCoefficientSeries,
) -> Result<Degree, AacgmError> {
    let subsolar = subsolar_point_at(instant)?.unit_vector();
    let rotated = dipole_frame(&dipole_axis(instant, series)) * subsolar;
    Ok(rotated.y.atan2(rotated.x) / RADEG)
}

fn mlt_from_reference(mlon: Degree, mlon_subsol: Degree) -> Hour {
    wrap((mlon - mlon_subsol) / DEG_PER_HOUR + 12.0, 24.0)
}

fn mlon_from_reference(mlt: Hour, mlon_subsol: Degree) -> Degree {
    wrap(DEG_PER_HOUR * (mlt - 12.0) + mlon_subsol, 360.0)
}

fn apply(direction: MltDirection, value: f64, mlon_subsol: Degree) -> f64 {
    match direction {
        MltDirection::MlonToMlt => mlt_from_reference(value, mlon_subsol),
        MltDirection::MltToMlon => mlon_from_reference(value, mlon_subsol),
    }
}

/// Magnetic longitude (degrees, any range) → MLT in [0, 24) hours.
pub fn mlon_to_mlt(
    mlon: Degree,
    instant: &Instant,
    series: &GaussCoefficientSeries,
) -> Result<Hour, AacgmError> {
    Ok(mlt_from_reference(
        mlon,
        subsolar_dipole_longitude(instant, series)?,
    ))
}

/// MLT (hours, any range) → magnetic longitude in [0, 360) degrees.
pub fn mlt_to_mlon(
    mlt: Hour,
    instant: &Instant,
    series: &GaussCoefficientSeries,
) -> Result<Degree, AacgmError> {
    Ok(mlon_from_reference(
        mlt,
        subsolar_dipole_longitude(instant, series)?,
    ))
}

/// Convert many values at a single instant; the subsolar reference is computed once.
///
/// Arguments
/// ---------
/// * `values`: magnetic longitudes in degrees or MLTs in hours, depending on `direction`
/// * `instant`: epoch shared by all values
/// * `series`: IGRF dipole coefficients
/// * `direction`: [`MltDirection`]
///
/// Return
/// ------
/// * the converted values, in input order; NaN inputs stay NaN
pub fn convert_mlt(
    values: &[f64],
    instant: &Instant,
    series: &GaussCoefficientSeries,
    direction: MltDirection,
) -> Result<Vec<f64>, AacgmError> {
    let mlon_subsol = subsolar_dipole_longitude(instant, series)?;
    Ok(values
        .iter()
        .map(|&value| apply(direction, value, mlon_subsol))
        .collect())
}

/// Convert values paired one-to-one with their own instants.
///
/// Fails with [`AacgmError::MismatchedTimeArrays`] unless both slices have the same length.
pub fn convert_mlt_per_instant(
    values: &[f64],
    instants: &[Instant],
    series: &GaussCoefficientSeries,
    direction: MltDirection,
) -> Result<Vec<f64>, AacgmError> {
    if values.len() != instants.len() {
        return Err(AacgmError::MismatchedTimeArrays {
            values: values.len(),
            times: instants.len(),
        });
    }

    values
        .iter()
        .zip(instants)
        .map(|(&value, instant)| {
            Ok(apply(
                direction,
                value,
                subsolar_dipole_longitude(instant, series)?,
            ))
        })
        .collect()
}
