//! # Coordinate inputs and broadcasting
//!
//! Latitude, longitude and altitude may each be given as a scalar, a 1-D sequence or a
//! (rejected) multi-dimensional array. [`PointBatch::normalize`] broadcasts them to three
//! equal-length vectors:
//!
//! 0. an array whose element count differs from its shape → [`AacgmError::InconsistentArrayShape`],
//! 1. all scalars → a batch of length one (an informational hint is logged),
//! 2. scalars and length-1 arrays are broadcast to the shape of the other arrays,
//! 3. arrays of different shapes (none of length one) → [`AacgmError::MismatchedInputArrays`],
//! 4. any remaining shape with more than one dimension → [`AacgmError::MultiDimensionalInput`].

use itertools::izip;
use nalgebra::{DMatrix, DVector};

use crate::{
    aacgm_errors::AacgmError,
    constants::{Degree, Kilometer},
};

/// One coordinate argument as received at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordInput {
    Scalar(f64),
    /// Row-major values with their shape; `shape.len()` is the dimensionality.
    Array { shape: Vec<usize>, values: Vec<f64> },
}

impl CoordInput {
    pub fn shape(&self) -> Option<&[usize]> {
        match self {
            CoordInput::Scalar(_) => None,
            CoordInput::Array { shape, .. } => Some(shape),
        }
    }

    /// Number of elements; 1 for a scalar.
    pub fn len(&self) -> usize {
        match self {
            CoordInput::Scalar(_) => 1,
            CoordInput::Array { values, .. } => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scalar, or array holding exactly one element: both broadcast freely.
    fn is_unit(&self) -> bool {
        match self {
            CoordInput::Scalar(_) => true,
            CoordInput::Array { values, .. } => values.len() == 1,
        }
    }

    fn broadcast(self, len: usize) -> Vec<f64> {
        match self {
            CoordInput::Scalar(value) => vec![value; len],
            CoordInput::Array { values, .. } if values.len() == 1 => vec![values[0]; len],
            CoordInput::Array { values, .. } => values,
        }
    }
}

impl From<f64> for CoordInput {
    fn from(value: f64) -> Self {
        CoordInput::Scalar(value)
    }
}

impl From<i32> for CoordInput {
    fn from(value: i32) -> Self {
        CoordInput::Scalar(f64::from(value))
    }
}

impl From<Vec<f64>> for CoordInput {
    fn from(values: Vec<f64>) -> Self {
        CoordInput::Array {
            shape: vec![values.len()],
            values,
        }
    }
}

impl From<&[f64]> for CoordInput {
    fn from(values: &[f64]) -> Self {
        values.to_vec().into()
    }
}

impl<const N: usize> From<[f64; N]> for CoordInput {
    fn from(values: [f64; N]) -> Self {
        values.to_vec().into()
    }
}

impl From<DVector<f64>> for CoordInput {
    fn from(values: DVector<f64>) -> Self {
        values.as_slice().into()
    }
}

impl From<Vec<Vec<f64>>> for CoordInput {
    /// Nested rows are read as a 2-D array shaped after the first row; ragged rows are
    /// rejected by [`PointBatch::normalize`].
    fn from(rows: Vec<Vec<f64>>) -> Self {
        let ncols = rows.first().map_or(0, Vec::len);
        CoordInput::Array {
            shape: vec![rows.len(), ncols],
            values: rows.into_iter().flatten().collect(),
        }
    }
}

impl From<DMatrix<f64>> for CoordInput {
    fn from(matrix: DMatrix<f64>) -> Self {
        let shape = vec![matrix.nrows(), matrix.ncols()];
        CoordInput::Array {
            shape,
            values: matrix.transpose().as_slice().to_vec(),
        }
    }
}

/// Three equal-length 1-D sequences of latitude, longitude and altitude.
#[derive(Debug, Clone, PartialEq)]
pub struct PointBatch {
    lat: Vec<Degree>,
    lon: Vec<Degree>,
    alt: Vec<Kilometer>,
}

impl PointBatch {
    /// Broadcast heterogeneous scalar/array inputs to a common 1-D shape.
    ///
    /// Arguments
    /// ---------
    /// * `lat`, `lon`, `alt`: scalar or array inputs, in degrees and kilometers
    ///
    /// Return
    /// ------
    /// * the broadcast batch, or an [`AacgmError`] for mismatched or multi-dimensional inputs
    pub fn normalize(
        lat: impl Into<CoordInput>,
        lon: impl Into<CoordInput>,
        alt: impl Into<CoordInput>,
    ) -> Result<Self, AacgmError> {
        let (lat, lon, alt) = (lat.into(), lon.into(), alt.into());
        let inputs = [&lat, &lon, &alt];

        for input in inputs {
            if let CoordInput::Array { shape, values } = input {
                if shape.iter().product::<usize>() != values.len() {
                    return Err(AacgmError::InconsistentArrayShape {
                        shape: shape.clone(),
                        len: values.len(),
                    });
                }
            }
        }

        if inputs.iter().all(|input| input.shape().is_none()) {
            tracing::info!("for a single location, consider using convert_latlon");
        }

        // Shape every non-unit argument must share
        let mut target: Option<&[usize]> = None;
        for input in inputs.iter().filter(|input| !input.is_unit()) {
            let shape = input.shape().unwrap_or(&[]);
            match target {
                None => target = Some(shape),
                Some(expected) if expected != shape => {
                    tracing::error!("mismatched input arrays");
                    return Err(AacgmError::MismatchedInputArrays {
                        lat: lat.shape().map(<[usize]>::to_vec).unwrap_or_default(),
                        lon: lon.shape().map(<[usize]>::to_vec).unwrap_or_default(),
                        alt: alt.shape().map(<[usize]>::to_vec).unwrap_or_default(),
                    });
                }
                Some(_) => {}
            }
        }

        // Without a non-unit argument the largest unit shape wins, e.g. [[1.0]] stays 2-D.
        let shape = target.map(<[usize]>::to_vec).unwrap_or_else(|| {
            inputs
                .iter()
                .filter_map(|input| input.shape())
                .max_by_key(|shape| shape.len())
                .map(<[usize]>::to_vec)
                .unwrap_or_else(|| vec![1])
        });

        if shape.len() > 1 {
            return Err(AacgmError::MultiDimensionalInput { ndim: shape.len() });
        }

        let len = shape.first().copied().unwrap_or(1);
        Ok(PointBatch {
            lat: lat.broadcast(len),
            lon: lon.broadcast(len),
            alt: alt.broadcast(len),
        })
    }

    /// A batch holding exactly one point.
    pub fn single(lat: Degree, lon: Degree, alt: Kilometer) -> Self {
        PointBatch {
            lat: vec![lat],
            lon: vec![lon],
            alt: vec![alt],
        }
    }

    pub fn len(&self) -> usize {
        self.lat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lat.is_empty()
    }

    pub fn lat(&self) -> &[Degree] {
        &self.lat
    }

    pub fn lon(&self) -> &[Degree] {
        &self.lon
    }

    pub fn alt(&self) -> &[Kilometer] {
        &self.alt
    }

    pub(crate) fn lat_mut(&mut self) -> &mut [Degree] {
        &mut self.lat
    }

    pub(crate) fn lon_mut(&mut self) -> &mut [Degree] {
        &mut self.lon
    }

    /// Iterate over `(lat, lon, alt)` triples in input order.
    pub fn points(&self) -> impl Iterator<Item = (Degree, Degree, Kilometer)> + '_ {
        izip!(&self.lat, &self.lon, &self.alt).map(|(&lat, &lon, &alt)| (lat, lon, alt))
    }
}
