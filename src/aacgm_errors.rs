use thiserror::Error;

use crate::constants::{Degree, FractionalYear, Kilometer};

#[derive(Error, Debug)]
pub enum AacgmError {
    #[error("time must be a datetime-like value: {0}")]
    InvalidTime(String),

    #[error("unable to process multi-dimensional arrays (got {ndim} dimensions)")]
    MultiDimensionalInput { ndim: usize },

    #[error("mismatched input arrays: lat {lat:?}, lon {lon:?}, alt {alt:?}")]
    MismatchedInputArrays {
        lat: Vec<usize>,
        lon: Vec<usize>,
        alt: Vec<usize>,
    },

    #[error("array of shape {shape:?} holds {len} values")]
    InconsistentArrayShape { shape: Vec<usize>, len: usize },

    #[error("mismatched input arrays: {values} values for {times} times")]
    MismatchedTimeArrays { values: usize, times: usize },

    #[error("unrealistic latitude: {0}")]
    UnrealisticLatitude(Degree),

    #[error(
        "coefficients are not valid for altitudes above {limit} km (got {altitude} km). You must either use field-line tracing (TRACE or ALLOWTRACE) or indicate you know this is a bad idea (BADIDEA)"
    )]
    CoefficientAltitudeExceeded { altitude: Kilometer, limit: Kilometer },

    #[error("subsol valid between 1601-2100. Input year is: {0}")]
    SubsolarYearOutOfRange(i32),

    #[error("transform cannot be set to epoch {year}: {reason}")]
    InstantNotSupported { year: FractionalYear, reason: String },

    #[error("IGRF coefficient file not found at: {0}")]
    IgrfFileNotFound(String),

    #[error("Error while parsing the IGRF coefficient table: {0}")]
    IgrfParseError(String),

    #[error("IGRF coefficient series contains no epoch")]
    EmptyCoefficientSeries,

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),
}

impl PartialEq for AacgmError {
    fn eq(&self, other: &Self) -> bool {
        use AacgmError::*;
        match (self, other) {
            (InvalidTime(a), InvalidTime(b)) => a == b,
            (MultiDimensionalInput { ndim: a }, MultiDimensionalInput { ndim: b }) => a == b,
            (
                MismatchedInputArrays { lat, lon, alt },
                MismatchedInputArrays {
                    lat: lat_b,
                    lon: lon_b,
                    alt: alt_b,
                },
            ) => lat == lat_b && lon == lon_b && alt == alt_b,
            (
                InconsistentArrayShape { shape, len },
                InconsistentArrayShape {
                    shape: shape_b,
                    len: len_b,
                },
            ) => shape == shape_b && len == len_b,
            (
                MismatchedTimeArrays { values, times },
                MismatchedTimeArrays {
                    values: values_b,
                    times: times_b,
                },
            ) => values == values_b && times == times_b,
            (UnrealisticLatitude(a), UnrealisticLatitude(b)) => a == b,
            (
                CoefficientAltitudeExceeded { altitude, limit },
                CoefficientAltitudeExceeded {
                    altitude: altitude_b,
                    limit: limit_b,
                },
            ) => altitude == altitude_b && limit == limit_b,
            (SubsolarYearOutOfRange(a), SubsolarYearOutOfRange(b)) => a == b,
            (
                InstantNotSupported { year, reason },
                InstantNotSupported {
                    year: year_b,
                    reason: reason_b,
                },
            ) => year == year_b && reason == reason_b,
            (IgrfFileNotFound(a), IgrfFileNotFound(b)) => a == b,
            (IgrfParseError(a), IgrfParseError(b)) => a == b,

            // io::Error is not comparable: same variant is enough
            (IoError(_), IoError(_)) => true,

            (EmptyCoefficientSeries, EmptyCoefficientSeries) => true,

            _ => false,
        }
    }
}
