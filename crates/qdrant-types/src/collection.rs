//! Collection descriptors.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Distance metric used to rank search results in a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distance {
    /// Euclidean distance (default)
    #[default]
    Euclid,
    /// Dot product
    Dot,
    /// Cosine similarity
    Cosine,
}

impl Distance {
    /// Map a metric name to a distance.
    ///
    /// Matching is case-insensitive: `"DOT"` selects [`Distance::Dot`],
    /// `"COSINE"` selects [`Distance::Cosine`]. Any other name, including the
    /// empty string, selects the default [`Distance::Euclid`].
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "DOT" => Distance::Dot,
            "COSINE" => Distance::Cosine,
            _ => Distance::Euclid,
        }
    }
}

impl From<&str> for Distance {
    fn from(name: &str) -> Self {
        Distance::from_name(name)
    }
}

impl From<String> for Distance {
    fn from(name: String) -> Self {
        Distance::from_name(&name)
    }
}

impl FromStr for Distance {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Distance::from_name(s))
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Euclid => write!(f, "euclid"),
            Distance::Dot => write!(f, "dot"),
            Distance::Cosine => write!(f, "cosine"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names() {
        assert_eq!(Distance::from_name("DOT"), Distance::Dot);
        assert_eq!(Distance::from_name("COSINE"), Distance::Cosine);
    }

    #[test]
    fn test_names_are_case_insensitive() {
        assert_eq!(Distance::from_name("dot"), Distance::Dot);
        assert_eq!(Distance::from_name("Cosine"), Distance::Cosine);
    }

    #[test]
    fn test_unknown_names_default_to_euclid() {
        assert_eq!(Distance::from_name(""), Distance::Euclid);
        assert_eq!(Distance::from_name("EUCLID"), Distance::Euclid);
        assert_eq!(Distance::from_name("manhattan"), Distance::Euclid);
        assert_eq!(Distance::default(), Distance::Euclid);
    }

    #[test]
    fn test_parse_and_display() {
        let parsed: Distance = "cosine".parse().unwrap();
        assert_eq!(parsed, Distance::Cosine);
        assert_eq!(Distance::Dot.to_string(), "dot");
        assert_eq!(Distance::from(String::from("DOT")), Distance::Dot);
    }
}
