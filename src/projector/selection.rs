use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_COUNTRY: &str = "Japan";

/// Map viewport / region selector value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Region {
    #[serde(rename = "north america")]
    NorthAmerica,
    #[serde(rename = "south america")]
    SouthAmerica,
    #[serde(rename = "europe")]
    Europe,
    #[serde(rename = "asia")]
    Asia,
    #[serde(rename = "africa")]
    Africa,
    #[default]
    #[serde(rename = "world")]
    World,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::NorthAmerica,
        Region::SouthAmerica,
        Region::Europe,
        Region::Asia,
        Region::Africa,
        Region::World,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NorthAmerica => "north america",
            Self::SouthAmerica => "south america",
            Self::Europe => "europe",
            Self::Asia => "asia",
            Self::Africa => "africa",
            Self::World => "world",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "unknown region '{0}' (expected one of: north america, south america, europe, asia, africa, world)"
)]
pub struct UnknownRegion(pub String);

impl FromStr for Region {
    type Err = UnknownRegion;

    /// Case-insensitive; `_` and `-` stand in for the space ("north_america").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s
            .to_ascii_lowercase()
            .replace(['_', '-'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        Region::ALL
            .into_iter()
            .find(|region| region.as_str() == wanted)
            .ok_or_else(|| UnknownRegion(s.to_string()))
    }
}

impl TryFrom<String> for Region {
    type Error = UnknownRegion;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Current UI state: the typed country and the region selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Selection {
    pub country: String,
    pub region: Region,
}

impl Default for Selection {
    fn default() -> Self {
        Selection {
            country: DEFAULT_COUNTRY.to_string(),
            region: Region::default(),
        }
    }
}

impl Selection {
    pub fn new(country: impl Into<String>, region: Region) -> Self {
        Selection {
            country: country.into(),
            region,
        }
    }

    pub fn country(country: impl Into<String>) -> Self {
        Selection {
            country: country.into(),
            ..Selection::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_parses_loose_spellings() {
        assert_eq!("north_america".parse::<Region>(), Ok(Region::NorthAmerica));
        assert_eq!("South-America".parse::<Region>(), Ok(Region::SouthAmerica));
        assert_eq!("  EUROPE ".parse::<Region>(), Ok(Region::Europe));
        assert_eq!("world".parse::<Region>(), Ok(Region::World));
        assert!("oceania".parse::<Region>().is_err());
    }

    #[test]
    fn unknown_region_names_the_input_and_the_choices() {
        let err = "oceania".parse::<Region>().unwrap_err();
        assert_eq!(err, UnknownRegion("oceania".to_string()));
        let message = err.to_string();
        assert!(message.starts_with("unknown region 'oceania'"));
        assert!(message.contains("north america"));
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn region_serializes_with_spaces() {
        let json = serde_json::to_string(&Region::NorthAmerica).unwrap();
        assert_eq!(json, "\"north america\"");
        let back: Region = serde_json::from_str("\"north_america\"").unwrap();
        assert_eq!(back, Region::NorthAmerica);
    }

    #[test]
    fn selection_defaults_to_japan_on_world() {
        let selection = Selection::default();
        assert_eq!(selection.country, "Japan");
        assert_eq!(selection.region, Region::World);
    }
}
