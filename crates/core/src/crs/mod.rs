//! Coordinate reference identifiers
//!
//! Greencover never reprojects. A CRS is only an identifier that must match
//! exactly between every grid and polygon combined in one computation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coordinate reference system identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Crs {
    /// An EPSG code
    Epsg(u32),
    /// Any other identifier (WKT, PROJ string, authority code), compared verbatim
    Custom(String),
}

impl Crs {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Crs::Epsg(code)
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Crs::Epsg(4326)
    }

    /// Get EPSG code if known
    pub fn epsg(&self) -> Option<u32> {
        match self {
            Crs::Epsg(code) => Some(*code),
            Crs::Custom(_) => None,
        }
    }

    /// Canonical string identifier, e.g. `EPSG:32633`
    pub fn identifier(&self) -> String {
        match self {
            Crs::Epsg(code) => format!("EPSG:{}", code),
            Crs::Custom(s) => s.clone(),
        }
    }
}

impl FromStr for Crs {
    type Err = String;

    /// Parses `EPSG:<code>` (case-insensitive). Anything else non-empty is kept
    /// as a custom identifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("empty CRS identifier".to_string());
        }
        if let Some((authority, code)) = trimmed.split_once(':') {
            if authority.eq_ignore_ascii_case("epsg") {
                return code
                    .trim()
                    .parse::<u32>()
                    .map(Crs::Epsg)
                    .map_err(|_| format!("invalid EPSG code: {}", code));
            }
        }
        Ok(Crs::Custom(trimmed.to_string()))
    }
}

impl TryFrom<String> for Crs {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Crs> for String {
    fn from(crs: Crs) -> Self {
        crs.identifier()
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crs_epsg() {
        let crs = Crs::from_epsg(4326);
        assert_eq!(crs.epsg(), Some(4326));
        assert_eq!(crs.identifier(), "EPSG:4326");
        assert_eq!(crs, Crs::wgs84());
    }

    #[test]
    fn test_crs_parse() {
        assert_eq!("epsg:32633".parse::<Crs>().unwrap(), Crs::Epsg(32633));
        assert_eq!(
            "ESRI:102003".parse::<Crs>().unwrap(),
            Crs::Custom("ESRI:102003".into())
        );
        assert!("EPSG:abc".parse::<Crs>().is_err());
        assert!("  ".parse::<Crs>().is_err());
    }

    #[test]
    fn test_crs_custom_not_equal_to_epsg() {
        let a = Crs::Custom("+proj=longlat +datum=WGS84".into());
        assert_ne!(a, Crs::wgs84());
    }
}
