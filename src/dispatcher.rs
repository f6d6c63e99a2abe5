use itertools::izip;

use crate::{
    aacgm_errors::AacgmError,
    constants::{Degree, EarthRadii},
    flags::ConversionFlags,
    inputs::PointBatch,
    time::Instant,
    transform::{ConversionOutcome, ConvertedPoint, CoordinateTransform},
};

/// Converted coordinates of a batch, one row per input point.
///
/// A row whose conversion failed holds NaN in all three columns; test with
/// [`ConversionResult::is_nan_row`] or `f64::is_nan`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConversionResult {
    pub lat: Vec<Degree>,
    pub lon: Vec<Degree>,
    pub r: Vec<EarthRadii>,
}

impl ConversionResult {
    pub fn with_capacity(capacity: usize) -> Self {
        ConversionResult {
            lat: Vec::with_capacity(capacity),
            lon: Vec::with_capacity(capacity),
            r: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, point: ConvertedPoint) {
        self.lat.push(point.lat);
        self.lon.push(point.lon);
        self.r.push(point.r);
    }

    pub fn len(&self) -> usize {
        self.lat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lat.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<ConvertedPoint> {
        Some(ConvertedPoint {
            lat: *self.lat.get(index)?,
            lon: *self.lon.get(index)?,
            r: *self.r.get(index)?,
        })
    }

    pub fn is_nan_row(&self, index: usize) -> bool {
        self.row(index).is_some_and(|row| row.is_nan())
    }

    pub fn rows(&self) -> impl Iterator<Item = ConvertedPoint> + '_ {
        izip!(&self.lat, &self.lon, &self.r).map(|(&lat, &lon, &r)| ConvertedPoint { lat, lon, r })
    }
}

impl FromIterator<ConversionOutcome> for ConversionResult {
    /// Collapse per-point outcomes into columns, failures becoming NaN rows.
    fn from_iter<I: IntoIterator<Item = ConversionOutcome>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut result = ConversionResult::with_capacity(iter.size_hint().0);
        for outcome in iter {
            result.push(outcome.unwrap_or(ConvertedPoint::NAN));
        }
        result
    }
}

/// Run the transform primitive over every point of a validated batch.
///
/// The instant is established exactly once, before the first point. A failure to establish
/// it aborts the call; a failure on one point only turns that point into a NaN row.
///
/// Arguments
/// ---------
/// * `transform`: the stateful transform primitive
/// * `batch`: latitudes already checked/clamped and longitudes wrapped
/// * `instant`: epoch of the conversion
/// * `flags`: conversion options handed unchanged to every point
///
/// Return
/// ----------
/// * one outcome per input point, in input order
pub fn dispatch_outcomes<T: CoordinateTransform + ?Sized>(
    transform: &mut T,
    batch: &PointBatch,
    instant: &Instant,
    flags: ConversionFlags,
) -> Result<Vec<ConversionOutcome>, AacgmError> {
    transform.establish_instant(instant)?;

    Ok(batch
        .points()
        .enumerate()
        .map(|(index, (lat, lon, alt))| {
            let outcome = transform.transform_point(lat, lon, alt, flags);
            if let Err(failure) = &outcome {
                tracing::warn!(index, lat, lon, alt, %failure, "point conversion failed");
            }
            outcome
        })
        .collect())
}

/// [`dispatch_outcomes`] with failures mapped to NaN rows.
pub fn dispatch<T: CoordinateTransform + ?Sized>(
    transform: &mut T,
    batch: &PointBatch,
    instant: &Instant,
    flags: ConversionFlags,
) -> Result<ConversionResult, AacgmError> {
    Ok(dispatch_outcomes(transform, batch, instant, flags)?
        .into_iter()
        .collect())
}
