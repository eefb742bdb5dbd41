use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Auxiliary metadata, written to a separate data file keyed by book
/// identifier so the core list stays small.
///
/// Maps are ordered so that serializing the same library twice produces the
/// same bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extended {
    /// Calibre comments (usually HTML)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
    /// Calibre rating: 0 to 10, two points per star
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    /// Size of the largest format file, in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    /// External identifiers such as `isbn`, `amazon` or `goodreads`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub identifiers: BTreeMap<String, String>,
    /// Any other fields returned by the library (custom columns and the like),
    /// copied through unchanged.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}
impl Extended {
    /// Rating as a number of stars, e.g. `7` becomes `"3.5"`.
    pub fn stars(&self) -> Option<String> {
        self.rating.filter(|r| *r > 0).map(|r| match r % 2 {
            0 => format!("{}", r / 2),
            _ => format!("{}.5", r / 2),
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None)]
    #[case(Some(0), None)]
    #[case(Some(7), Some("3.5"))]
    #[case(Some(10), Some("5"))]
    fn test_stars(#[case] rating: Option<u8>, #[case] expected: Option<&str>) {
        let extended = Extended { rating, ..Default::default() };
        assert_eq!(extended.stars().as_deref(), expected);
    }

    #[test]
    fn test_empty_fields_are_omitted() {
        let json = serde_json::to_string(&Extended::default()).unwrap();
        assert_eq!(json, "{}");
        let extended = Extended { publisher: Some("Gollancz".into()), ..Default::default() };
        assert_eq!(serde_json::to_string(&extended).unwrap(), r#"{"publisher":"Gollancz"}"#);
    }
}
