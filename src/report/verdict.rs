//! Compact verdict lines for the mail filter.
//!
//! The line format, field order and key names are read by an MTA content
//! filter and must not change:
//!
//! ```text
//! Varist-RC=0 Rating="<flag>" Result=<result> Detections=<d1,d2,...>
//! Varist-RC=1 Rating=UNKNOWN Result=<reason> Detections=
//! ```

use crate::aggregate::collect_detections;
use crate::core::ScanResult;

use std::fmt;

/// Ratings below this value are reported as clean.
pub const CLEAN_BELOW: f64 = 0.0001;

/// Ratings at or above this value are reported as a virus.
pub const VIRUS_AT: f64 = 99.9;

/// The `Result=` field of a successful verdict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RatingResult {
    /// Highest rating below [`CLEAN_BELOW`].
    Clean,

    /// Highest rating at or above [`VIRUS_AT`].
    Virus,

    /// Anything in between, rendered rounded to an integer.
    Score(f64),
}

impl RatingResult {
    /// Classifies the highest rating of a document.
    pub fn from_rating(rating: f64) -> Self {
        if rating < CLEAN_BELOW {
            Self::Clean
        } else if rating >= VIRUS_AT {
            Self::Virus
        } else {
            Self::Score(rating)
        }
    }
}

impl fmt::Display for RatingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clean => write!(f, "HA-CLEAN"),
            Self::Virus => write!(f, "HA-VIRUS"),
            Self::Score(rating) => write!(f, "{:.0}", rating),
        }
    }
}

/// One rendered outcome for a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// The document was decoded and scored.
    Scored {
        /// Rating flag from the summary description.
        rating_flag: String,
        /// Classified highest rating.
        result: RatingResult,
        /// Formatted detections, `["none"]` when there are none.
        detections: Vec<String>,
    },

    /// No score could be produced.
    Failed {
        /// Short machine-readable reason, e.g. `ParseError`.
        reason: String,
    },
}

impl Verdict {
    /// Reason used when a record body cannot be decoded.
    pub const PARSE_ERROR: &'static str = "ParseError";

    /// Scores a decoded document.
    pub fn from_scan(scan: &ScanResult) -> Self {
        let root = &scan.root_object;
        Self::Scored {
            rating_flag: scan.rating_flag().to_string(),
            result: RatingResult::from_rating(root.max_rating()),
            detections: collect_detections(root),
        }
    }

    /// Creates a failure verdict with the given reason.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    /// Creates the verdict for an undecodable record.
    pub fn parse_error() -> Self {
        Self::failed(Self::PARSE_ERROR)
    }

    /// Returns the `Varist-RC` value.
    pub fn return_code(&self) -> u8 {
        match self {
            Self::Scored { .. } => 0,
            Self::Failed { .. } => 1,
        }
    }

    /// Returns `true` if the document was scored.
    pub fn is_scored(&self) -> bool {
        matches!(self, Self::Scored { .. })
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Varist-RC={} ", self.return_code())?;
        match self {
            Self::Scored {
                rating_flag,
                result,
                detections,
            } => write!(
                f,
                "Rating=\"{}\" Result={} Detections={}",
                rating_flag,
                result,
                detections.join(",")
            ),
            Self::Failed { reason } => write!(f, "Rating=UNKNOWN Result={} Detections=", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Indicator, IndicatorCategory, ObjectNode};

    #[test]
    fn test_rating_boundaries() {
        assert_eq!(RatingResult::from_rating(0.0), RatingResult::Clean);
        assert_eq!(RatingResult::from_rating(0.00005), RatingResult::Clean);
        assert_eq!(RatingResult::from_rating(-3.0), RatingResult::Clean);
        assert_eq!(RatingResult::from_rating(99.9), RatingResult::Virus);
        assert_eq!(RatingResult::from_rating(250.0), RatingResult::Virus);

        assert_eq!(RatingResult::from_rating(45.4).to_string(), "45");
        assert_eq!(RatingResult::from_rating(45.6).to_string(), "46");
        assert_eq!(RatingResult::from_rating(0.0001).to_string(), "0");
        assert_eq!(RatingResult::from_rating(99.89).to_string(), "100");
    }

    #[test]
    fn test_empty_document_is_clean() {
        let scan = ScanResult::from_json("{}").unwrap();
        assert_eq!(
            Verdict::from_scan(&scan).to_string(),
            "Varist-RC=0 Rating=\"\" Result=HA-CLEAN Detections=none"
        );
    }

    #[test]
    fn test_scored_verdict_with_detection() {
        let mut scan = ScanResult::default();
        scan.summary_description.rating_flag = "malicious".into();
        let detected =
            IndicatorCategory::new("Detected").with_indicator(Indicator::new("Trojan.X", "sample"));
        scan.root_object = ObjectNode::new("mail").with_rating(10.0).with_child(
            ObjectNode::new("invoice.exe")
                .with_rating(30.0)
                .with_category(detected),
        );

        let verdict = Verdict::from_scan(&scan);
        assert!(verdict.is_scored());
        assert_eq!(verdict.return_code(), 0);
        assert_eq!(
            verdict.to_string(),
            "Varist-RC=0 Rating=\"malicious\" Result=30 Detections=Type=Trojan.X name=sample"
        );
    }

    #[test]
    fn test_multiple_detections_are_comma_joined() {
        let mut scan = ScanResult::default();
        scan.root_object = ObjectNode::new("mail").with_rating(100.0).with_category(
            IndicatorCategory::new("Detected")
                .with_indicator(Indicator::new("A", "a"))
                .with_indicator(Indicator::new("B", "b")),
        );

        assert_eq!(
            Verdict::from_scan(&scan).to_string(),
            "Varist-RC=0 Rating=\"\" Result=HA-VIRUS Detections=Type=A name=a,Type=B name=b"
        );
    }

    #[test]
    fn test_failed_verdict() {
        let verdict = Verdict::parse_error();
        assert_eq!(verdict.return_code(), 1);
        assert_eq!(
            verdict.to_string(),
            "Varist-RC=1 Rating=UNKNOWN Result=ParseError Detections="
        );
        assert_eq!(
            Verdict::failed("MissingParameters").to_string(),
            "Varist-RC=1 Rating=UNKNOWN Result=MissingParameters Detections="
        );
    }
}
