//! # IGRF dipole coefficients and dipole axis
//!
//! The centred-dipole part of the International Geomagnetic Reference Field is described by
//! three Gauss coefficients, `g10`, `g11` and `h11`. The IGRF table gives one snapshot every
//! five years plus a secular-variation rate valid after the last snapshot.
//!
//! This module parses those three rows out of a standard IGRF coefficient file
//! ([`GaussCoefficientSeries::from_file`]) and evaluates the unit vector pointing at the
//! northern dipole pole for a given [`Instant`] ([`dipole_axis`]).
//!
//! ## File layout
//!
//! ```text
//! # comments ...
//! c/s   DGRF    DGRF   ...   IGRF      SV
//! g/h n m 1900.0 1905.0 ... 2015.0 2015-20
//! g  1  0 -31543 -31464 ... -29442.0   10.3
//! g  1  1  -2298  -2298 ...  -1501.0   18.1
//! h  1  1   5922   5909 ...   4797.1  -26.6
//! ...
//! ```
//!
//! ## Time interpolation
//!
//! * inside `[first epoch, last epoch]`: piecewise linear interpolation between snapshots,
//! * anywhere else: linear extrapolation from the last snapshot with the secular variation.
//!
//! The table is read-only once loaded and may be shared between threads behind an `Arc`.

use camino::Utf8Path;
use nalgebra::{Matrix3, Vector3};
use std::str::FromStr;

use crate::{aacgm_errors::AacgmError, constants::FractionalYear, time::Instant};

/// One IGRF snapshot of the dipole Gauss coefficients (nT).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DipoleCoefficients {
    pub g10: f64,
    pub g11: f64,
    pub h11: f64,
}

impl DipoleCoefficients {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        DipoleCoefficients {
            g10: self.g10 + (other.g10 - self.g10) * t,
            g11: self.g11 + (other.g11 - self.g11) * t,
            h11: self.h11 + (other.h11 - self.h11) * t,
        }
    }

    /// Dipole field strength `B0 = sqrt(g10² + g11² + h11²)`.
    pub fn strength(&self) -> f64 {
        (self.g10.powi(2) + self.g11.powi(2) + self.h11.powi(2)).sqrt()
    }
}

/// Dipole coefficients for every epoch of an IGRF table, plus the secular variation.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussCoefficientSeries {
    epochs: Vec<FractionalYear>,
    snapshots: Vec<DipoleCoefficients>,
    secular_variation: DipoleCoefficients,
}

impl GaussCoefficientSeries {
    /// Build a series from already parsed values.
    ///
    /// Epochs must be strictly increasing and match the number of snapshots.
    pub fn new(
        epochs: Vec<FractionalYear>,
        snapshots: Vec<DipoleCoefficients>,
        secular_variation: DipoleCoefficients,
    ) -> Result<Self, AacgmError> {
        if epochs.is_empty() {
            return Err(AacgmError::EmptyCoefficientSeries);
        }
        if epochs.len() != snapshots.len() {
            return Err(AacgmError::IgrfParseError(format!(
                "{} epochs for {} coefficient snapshots",
                epochs.len(),
                snapshots.len()
            )));
        }
        if epochs.windows(2).any(|w| w[1] <= w[0]) {
            return Err(AacgmError::IgrfParseError(
                "epochs are not strictly increasing".into(),
            ));
        }
        Ok(GaussCoefficientSeries {
            epochs,
            snapshots,
            secular_variation,
        })
    }

    /// Read the dipole rows of an IGRF coefficient file.
    pub fn from_file(path: &Utf8Path) -> Result<Self, AacgmError> {
        if !path.exists() {
            return Err(AacgmError::IgrfFileNotFound(path.to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        GaussCoefficientSeries::parse(&content)
    }

    /// Parse the content of an IGRF coefficient file.
    pub fn parse(content: &str) -> Result<Self, AacgmError> {
        let rows: Vec<Vec<&str>> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| line.split_whitespace().collect())
            .collect();

        let header = rows
            .iter()
            .find(|tokens| tokens.first() == Some(&"g/h"))
            .ok_or_else(|| AacgmError::IgrfParseError("missing 'g/h n m' header".into()))?;

        // The last column label is the secular-variation interval (e.g. "2015-20")
        if header.len() < 5 {
            return Err(AacgmError::IgrfParseError(
                "header holds no model epoch".into(),
            ));
        }
        let epochs = header[3..header.len() - 1]
            .iter()
            .map(|label| parse_value(label))
            .collect::<Result<Vec<f64>, _>>()?;

        let g10 = coefficient_row(&rows, "g", "1", "0", epochs.len())?;
        let g11 = coefficient_row(&rows, "g", "1", "1", epochs.len())?;
        let h11 = coefficient_row(&rows, "h", "1", "1", epochs.len())?;

        let snapshots = (0..epochs.len())
            .map(|i| DipoleCoefficients {
                g10: g10[i],
                g11: g11[i],
                h11: h11[i],
            })
            .collect();

        let n = epochs.len();
        GaussCoefficientSeries::new(
            epochs,
            snapshots,
            DipoleCoefficients {
                g10: g10[n],
                g11: g11[n],
                h11: h11[n],
            },
        )
    }

    pub fn epochs(&self) -> &[FractionalYear] {
        &self.epochs
    }

    pub fn first_epoch(&self) -> FractionalYear {
        self.epochs[0]
    }

    pub fn last_epoch(&self) -> FractionalYear {
        self.epochs[self.epochs.len() - 1]
    }

    pub fn secular_variation(&self) -> DipoleCoefficients {
        self.secular_variation
    }

    /// Dipole coefficients at a decimal year.
    ///
    /// Interpolated between the two bracketing snapshots inside the table range,
    /// extrapolated from the last snapshot with the secular variation outside of it.
    pub fn coefficients_at(&self, year: FractionalYear) -> DipoleCoefficients {
        let last = self.snapshots[self.snapshots.len() - 1];

        if year < self.first_epoch() || year > self.last_epoch() {
            let dyear = year - self.last_epoch();
            let sv = self.secular_variation;
            return DipoleCoefficients {
                g10: last.g10 + sv.g10 * dyear,
                g11: last.g11 + sv.g11 * dyear,
                h11: last.h11 + sv.h11 * dyear,
            };
        }

        // index of the first epoch strictly after `year`
        let upper = self.epochs.partition_point(|&epoch| epoch <= year);
        if upper == self.epochs.len() {
            return last;
        }
        let lower = upper - 1;
        let t = (year - self.epochs[lower]) / (self.epochs[upper] - self.epochs[lower]);
        self.snapshots[lower].lerp(&self.snapshots[upper], t)
    }
}

fn parse_value(token: &str) -> Result<f64, AacgmError> {
    f64::from_str(token)
        .map_err(|_| AacgmError::IgrfParseError(format!("invalid numeric value '{token}'")))
}

fn coefficient_row(
    rows: &[Vec<&str>],
    kind: &str,
    n: &str,
    m: &str,
    n_epochs: usize,
) -> Result<Vec<f64>, AacgmError> {
    let row = rows
        .iter()
        .find(|tokens| tokens.len() >= 3 && tokens[0] == kind && tokens[1] == n && tokens[2] == m)
        .ok_or_else(|| AacgmError::IgrfParseError(format!("missing '{kind} {n} {m}' row")))?;

    let values = row[3..]
        .iter()
        .map(|token| parse_value(token))
        .collect::<Result<Vec<f64>, _>>()?;

    if values.len() != n_epochs + 1 {
        return Err(AacgmError::IgrfParseError(format!(
            "'{kind} {n} {m}' row has {} values, expected {} epochs and one secular variation",
            values.len(),
            n_epochs
        )));
    }
    Ok(values)
}

/// Unit vector (geocentric Cartesian) pointing at the northern dipole pole.
///
/// Arguments
/// ---------
/// * `instant`: epoch of the field; only its date is used (see [`Instant::fractional_year`])
/// * `series`: the IGRF dipole coefficients
///
/// Return
/// ------
/// * `-(g11, h11, g10) / B0`, a unit vector valid for this epoch only
pub fn dipole_axis(instant: &Instant, series: &GaussCoefficientSeries) -> Vector3<f64> {
    let coeffs = series.coefficients_at(instant.fractional_year());
    -Vector3::new(coeffs.g11, coeffs.h11, coeffs.g10) / coeffs.strength()
}

/// Rotation from geocentric Cartesian coordinates to the dipole-aligned frame.
///
/// The rows of the matrix are the frame axes expressed in geocentric coordinates:
/// `z` is the dipole axis, `y = normalize(ẑ × z)` with ẑ the geographic north pole, and
/// `x = y × z` completes the right-handed frame.
pub fn dipole_frame(axis: &Vector3<f64>) -> Matrix3<f64> {
    let z_e = axis.normalize();
    let y_e = Vector3::z().cross(&z_e).normalize();
    let x_e = y_e.cross(&z_e);
    Matrix3::from_rows(&[x_e.transpose(), y_e.transpose(), z_e.transpose()])
}

#[cfg(test)]
pub(crate) mod igrf_test {
    use super::*;
    use approx::assert_relative_eq;

    pub(crate) const IGRF12_DIPOLE: &str = "\
# 12th Generation International Geomagnetic Reference Field, dipole terms only
c/s   DGRF    DGRF    IGRF      SV
g/h n m 2005.0 2010.0 2015.0 2015-20
g  1  0 -29554.63 -29496.57 -29442.0  10.3
g  1  1  -1669.05  -1586.42  -1501.0  18.1
h  1  1   5077.99   4944.26   4797.1 -26.6
g  2  0  -2337.24  -2396.06  -2445.3 -8.7
";

    pub(crate) fn series() -> GaussCoefficientSeries {
        GaussCoefficientSeries::parse(IGRF12_DIPOLE).unwrap()
    }

    #[test]
    fn test_parse_table() {
        let series = series();
        assert_eq!(series.epochs(), &[2005.0, 2010.0, 2015.0]);
        assert_eq!(
            series.secular_variation(),
            DipoleCoefficients {
                g10: 10.3,
                g11: 18.1,
                h11: -26.6
            }
        );
        assert_eq!(series.coefficients_at(2010.0).g10, -29496.57);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            GaussCoefficientSeries::parse("g 1 0 1.0 2.0"),
            Err(AacgmError::IgrfParseError(_))
        ));

        let missing_row = "g/h n m 2010.0 2015.0 2015-20\ng 1 0 1 2 3\ng 1 1 1 2 3\n";
        assert_eq!(
            GaussCoefficientSeries::parse(missing_row),
            Err(AacgmError::IgrfParseError("missing 'h 1 1' row".into()))
        );

        let short_row = "g/h n m 2010.0 2015.0 2015-20\ng 1 0 1 2\ng 1 1 1 2 3\nh 1 1 1 2 3\n";
        assert!(GaussCoefficientSeries::parse(short_row).is_err());

        let bad_value = "g/h n m 2010.0 2015.0 2015-20\ng 1 0 1 x 3\ng 1 1 1 2 3\nh 1 1 1 2 3\n";
        assert_eq!(
            GaussCoefficientSeries::parse(bad_value),
            Err(AacgmError::IgrfParseError("invalid numeric value 'x'".into()))
        );

        let unordered = "g/h n m 2015.0 2010.0 2015-20\ng 1 0 1 2 3\ng 1 1 1 2 3\nh 1 1 1 2 3\n";
        assert!(GaussCoefficientSeries::parse(unordered).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = GaussCoefficientSeries::from_file(Utf8Path::new("does/not/exist.txt")).unwrap_err();
        assert_eq!(err, AacgmError::IgrfFileNotFound("does/not/exist.txt".into()));
    }

    #[test]
    fn test_interpolation_and_extrapolation() {
        let series = series();

        let mid = series.coefficients_at(2012.5);
        assert_relative_eq!(mid.g10, (-29496.57 - 29442.0) / 2.0, epsilon = 1e-9);
        assert_relative_eq!(mid.h11, (4944.26 + 4797.1) / 2.0, epsilon = 1e-9);

        let after = series.coefficients_at(2017.0);
        assert_relative_eq!(after.g10, -29442.0 + 2.0 * 10.3, epsilon = 1e-9);
        assert_relative_eq!(after.g11, -1501.0 + 2.0 * 18.1, epsilon = 1e-9);

        // before the table the secular variation is still applied from the last epoch
        let before = series.coefficients_at(2000.0);
        assert_relative_eq!(before.g10, -29442.0 - 15.0 * 10.3, epsilon = 1e-9);
    }

    #[test]
    fn test_dipole_axis_2015() {
        let instant = Instant::from_date(2015, 1, 1).unwrap();
        let axis = dipole_axis(&instant, &series());

        assert_relative_eq!(axis.x, 0.050253, epsilon = 1e-5);
        assert_relative_eq!(axis.y, -0.160608, epsilon = 1e-5);
        assert_relative_eq!(axis.z, 0.985738, epsilon = 1e-5);
    }

    #[test]
    fn test_dipole_axis_is_unit() {
        let series = series();
        for (year, month) in [(1990, 3), (2005, 1), (2011, 6), (2015, 12), (2019, 9), (2050, 1)] {
            let instant = Instant::from_date(year, month, 15).unwrap();
            assert_relative_eq!(dipole_axis(&instant, &series).norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_dipole_frame_is_rotation() {
        let instant = Instant::from_date(2015, 1, 1).unwrap();
        let axis = dipole_axis(&instant, &series());
        let frame = dipole_frame(&axis);

        assert_relative_eq!(frame * frame.transpose(), Matrix3::identity(), epsilon = 1e-12);
        assert_relative_eq!(frame.determinant(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(frame * axis, Vector3::z(), epsilon = 1e-12);
    }
}
