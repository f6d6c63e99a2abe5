//! # Constants and type definitions for aacgm-wrap
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Geophysical constants (reference Earth radius, WGS-84 eccentricity)
//! - Validity limits of the AACGM-v2 coefficients and of the subsolar almanac formula
//! - Unit conversions (degrees ↔ radians, hours ↔ degrees)
//! - Core type aliases used across the crate

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// Number of seconds in a day (leap seconds are ignored everywhere in this crate)
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Degrees of longitude swept by one hour of local time
pub const DEG_PER_HOUR: f64 = 15.0;

/// Reference Earth radius used by the AACGM-v2 and IGRF models, in kilometers
pub const RE: f64 = 6371.2;

/// First eccentricity squared of the WGS-84 ellipsoid
pub const WGS84_E2: f64 = 0.006694379990141317;

/// Altitude above which the AACGM-v2 coefficients are no longer valid
pub const MAX_COEFF_ALTITUDE: Kilometer = 2000.0;

/// Latitude magnitude tolerated (and clamped to ±90°) to absorb floating round-off
pub const MAX_LATITUDE_TOLERANCE: Degree = 90.1;

/// Validity range of the Astronomical Almanac subsolar formula, inclusive
pub const SUBSOLAR_FIRST_YEAR: i32 = 1601;
pub const SUBSOLAR_LAST_YEAR: i32 = 2100;

/// Number of years past the last IGRF epoch the secular variation may be extrapolated
pub const IGRF_EXTRAPOLATION_YEARS: f64 = 5.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Distance in Earth radii
pub type EarthRadii = f64;
/// Local time in hours
pub type Hour = f64;
/// Decimal year (e.g. 2015.5)
pub type FractionalYear = f64;
