//! # Conversion environment
//!
//! [`AacgmEnv`] gathers the run-time configuration shared by every conversion:
//!
//! ```text
//! AacgmEnv
//! ├── igrf_coeffs         (IGRF coefficient table, env var IGRF_COEFFS)
//! ├── coeff_prefix        (AACGM-v2 coefficient file prefix, env var AACGM_v2_DAT_PREFIX)
//! └── max_coeff_altitude  (coefficient validity ceiling, 2000 km)
//! ```
//!
//! The coefficient prefix is only read by transform implementations that load the AACGM-v2
//! coefficient files; this crate carries it so a single environment describes the whole setup.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use aacgm_wrap::env_state::AacgmEnv;
//!
//! let env = AacgmEnv::from_env().with_max_coeff_altitude(1500.0);
//! println!("IGRF table: {}", env.igrf_coeffs);
//! ```

use camino::Utf8PathBuf;

use crate::constants::{Kilometer, MAX_COEFF_ALTITUDE};

pub const IGRF_COEFFS_VAR: &str = "IGRF_COEFFS";
pub const AACGM_DAT_PREFIX_VAR: &str = "AACGM_v2_DAT_PREFIX";

const DEFAULT_IGRF_COEFFS: &str = "igrf12coeffs.txt";
const DEFAULT_COEFF_PREFIX: &str = "aacgm_coeffs/aacgm_coeffs-12-";

#[derive(Debug, Clone, PartialEq)]
pub struct AacgmEnv {
    pub igrf_coeffs: Utf8PathBuf,
    /// Prefix of the AACGM-v2 coefficient files, read by native-library transforms only.
    pub coeff_prefix: Utf8PathBuf,
    pub max_coeff_altitude: Kilometer,
}

impl Default for AacgmEnv {
    fn default() -> Self {
        AacgmEnv {
            igrf_coeffs: Utf8PathBuf::from(DEFAULT_IGRF_COEFFS),
            coeff_prefix: Utf8PathBuf::from(DEFAULT_COEFF_PREFIX),
            max_coeff_altitude: MAX_COEFF_ALTITUDE,
        }
    }
}

impl AacgmEnv {
    /// Read the coefficient locations from the process environment.
    ///
    /// Unset or non UTF-8 variables fall back to the packaged defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = AacgmEnv::default();
        AacgmEnv {
            igrf_coeffs: lookup(IGRF_COEFFS_VAR)
                .map(Utf8PathBuf::from)
                .unwrap_or(defaults.igrf_coeffs),
            coeff_prefix: lookup(AACGM_DAT_PREFIX_VAR)
                .map(Utf8PathBuf::from)
                .unwrap_or(defaults.coeff_prefix),
            max_coeff_altitude: defaults.max_coeff_altitude,
        }
    }

    pub fn with_igrf_coeffs(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.igrf_coeffs = path.into();
        self
    }

    pub fn with_coeff_prefix(mut self, prefix: impl Into<Utf8PathBuf>) -> Self {
        self.coeff_prefix = prefix.into();
        self
    }

    pub fn with_max_coeff_altitude(mut self, altitude: Kilometer) -> Self {
        self.max_coeff_altitude = altitude;
        self
    }
}
