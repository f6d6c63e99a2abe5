//! # Conversion option bit-mask
//!
//! AACGM-v2 conversions are driven by a small integer bit-mask. The mask is only ever
//! built from human-readable tokens ([`ConversionFlags::from_string`]) or from booleans
//! ([`ConversionFlags::from_booleans`]); raw integers are never accepted.
//!
//! | token        | bit | meaning                                           |
//! |--------------|-----|---------------------------------------------------|
//! | `G2A`        | 0   | geographic (geodetic) → AACGM-v2 (default)        |
//! | `A2G`        | 1   | AACGM-v2 → geographic (geodetic)                  |
//! | `TRACE`      | 2   | use field-line tracing, not coefficients          |
//! | `ALLOWTRACE` | 4   | use tracing only above 2000 km                    |
//! | `BADIDEA`    | 8   | use coefficients above 2000 km                    |
//! | `GEOCENTRIC` | 16  | inputs/outputs are geocentric with Rₑ = 6371.2 km |
//!
//! Unrecognized tokens are dropped silently: `"G2A|FOO"` is the same as `"G2A"`.

use std::{convert::Infallible, fmt, str::FromStr};

use itertools::Itertools;

/// Immutable set of AACGM-v2 conversion options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ConversionFlags(u32);

impl ConversionFlags {
    pub const G2A: u32 = 0;
    pub const A2G: u32 = 1;
    pub const TRACE: u32 = 2;
    pub const ALLOWTRACE: u32 = 4;
    pub const BADIDEA: u32 = 8;
    pub const GEOCENTRIC: u32 = 16;

    const NAMED_BITS: [(&'static str, u32); 5] = [
        ("A2G", Self::A2G),
        ("TRACE", Self::TRACE),
        ("ALLOWTRACE", Self::ALLOWTRACE),
        ("BADIDEA", Self::BADIDEA),
        ("GEOCENTRIC", Self::GEOCENTRIC),
    ];

    /// Build the mask from a `|`-separated list of tokens.
    ///
    /// Arguments
    /// ---------
    /// * `code`: e.g. `"A2G|TRACE"`, case-insensitive, surrounding blanks ignored
    ///
    /// Return
    /// ------
    /// * The combined flags. Unknown tokens contribute nothing, so an empty or fully
    ///   invalid string yields the default `G2A` mask (value 0).
    pub fn from_string(code: &str) -> Self {
        let bits = code
            .split('|')
            .map(|token| token.trim().to_uppercase())
            .unique()
            .filter_map(|token| Self::token_bit(&token))
            .fold(0, |acc, bit| acc | bit);
        ConversionFlags(bits)
    }

    /// Build the mask from individual options; all `false` is `G2A`.
    pub fn from_booleans(
        a2g: bool,
        trace: bool,
        allowtrace: bool,
        badidea: bool,
        geocentric: bool,
    ) -> Self {
        let mut bits = if a2g { Self::A2G } else { Self::G2A };
        if trace {
            bits += Self::TRACE;
        }
        if allowtrace {
            bits += Self::ALLOWTRACE;
        }
        if badidea {
            bits += Self::BADIDEA;
        }
        if geocentric {
            bits += Self::GEOCENTRIC;
        }
        ConversionFlags(bits)
    }

    fn token_bit(token: &str) -> Option<u32> {
        if token == "G2A" {
            return Some(Self::G2A);
        }
        Self::NAMED_BITS
            .iter()
            .find(|(name, _)| *name == token)
            .map(|(_, bit)| *bit)
    }

    /// Integer value handed to the transform primitive.
    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, bit: u32) -> bool {
        self.0 & bit == bit
    }

    pub fn is_a2g(&self) -> bool {
        self.contains(Self::A2G)
    }

    pub fn is_geocentric(&self) -> bool {
        self.contains(Self::GEOCENTRIC)
    }

    /// True when one of `TRACE`, `ALLOWTRACE` or `BADIDEA` lifts the coefficient altitude ceiling.
    pub fn allows_high_altitude(&self) -> bool {
        self.0 & (Self::TRACE | Self::ALLOWTRACE | Self::BADIDEA) != 0
    }

    /// Same flags with the conversion direction forced to G2A.
    pub fn as_g2a(&self) -> Self {
        ConversionFlags(self.0 & !Self::A2G)
    }
}

impl FromStr for ConversionFlags {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ConversionFlags::from_string(s))
    }
}

impl fmt::Display for ConversionFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = if self.is_a2g() { "A2G" } else { "G2A" };
        let options = Self::NAMED_BITS
            .iter()
            .skip(1)
            .filter(|(_, bit)| self.contains(*bit))
            .map(|(name, _)| *name);
        write!(f, "{}", std::iter::once(direction).chain(options).join("|"))
    }
}

#[cfg(test)]
mod flags_test {
    use super::*;

    #[test]
    fn test_from_string_single_tokens() {
        assert_eq!(ConversionFlags::from_string("G2A").bits(), 0);
        assert_eq!(ConversionFlags::from_string("A2G").bits(), 1);
        assert_eq!(ConversionFlags::from_string("TRACE").bits(), 2);
        assert_eq!(ConversionFlags::from_string("ALLOWTRACE").bits(), 4);
        assert_eq!(ConversionFlags::from_string("BADIDEA").bits(), 8);
        assert_eq!(ConversionFlags::from_string("GEOCENTRIC").bits(), 16);
    }

    #[test]
    fn test_from_string_combined_and_lenient() {
        assert_eq!(ConversionFlags::from_string("a2g | trace").bits(), 3);
        assert_eq!(
            ConversionFlags::from_string("A2G|TRACE|ALLOWTRACE|BADIDEA|GEOCENTRIC").bits(),
            31
        );
        assert_eq!(ConversionFlags::from_string("").bits(), 0);
        assert_eq!(ConversionFlags::from_string("NOT-A-FLAG").bits(), 0);
        assert_eq!(ConversionFlags::from_string("G2A|FOO|TRACE").bits(), 2);
        // duplicated tokens only count once
        assert_eq!(ConversionFlags::from_string("TRACE|trace").bits(), 2);
    }

    #[test]
    fn test_from_booleans() {
        assert_eq!(
            ConversionFlags::from_booleans(false, false, false, false, false),
            ConversionFlags::default()
        );
        assert_eq!(
            ConversionFlags::from_booleans(true, false, false, false, false).bits(),
            1
        );
        assert_eq!(
            ConversionFlags::from_booleans(false, true, false, true, true).bits(),
            26
        );
        assert_eq!(
            ConversionFlags::from_booleans(true, true, true, true, true),
            ConversionFlags::from_string("A2G|TRACE|ALLOWTRACE|BADIDEA|GEOCENTRIC")
        );
    }

    #[test]
    fn test_predicates_and_display() {
        let flags: ConversionFlags = "A2G|BADIDEA".parse().unwrap();
        assert!(flags.is_a2g());
        assert!(flags.allows_high_altitude());
        assert!(!flags.is_geocentric());
        assert_eq!(flags.to_string(), "A2G|BADIDEA");
        assert_eq!(flags.as_g2a().to_string(), "G2A|BADIDEA");
        assert!(!ConversionFlags::from_string("G2A|GEOCENTRIC").allows_high_altitude());
    }
}
