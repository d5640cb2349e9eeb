use serde::{Deserialize, Serialize};
use std::fmt;

/// Quality flag codes used by the ECCC National Climate Archive.
///
/// See <https://climate.weather.gc.ca/doc/Technical_Documentation.pdf>.
/// An empty flag cell means the value carries no flag and is modelled as
/// `Option::<EcccFlag>::None` rather than a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EcccFlag {
    NotReviewed,
    IncompleteData,
    Accumulated,
    MultipleOccurrenceEstimated,
    AmountUncertain,
    Estimated,
    AccumulatedEstimated,
    OccurrenceUncertain,
    Missing,
    MissingAboveZero,
    MultipleOccurrence,
    Trace,
    MissingBelowZero,
    NotAvailable,
}

impl EcccFlag {
    pub const ALL: [EcccFlag; 14] = [
        EcccFlag::NotReviewed,
        EcccFlag::IncompleteData,
        EcccFlag::Accumulated,
        EcccFlag::MultipleOccurrenceEstimated,
        EcccFlag::AmountUncertain,
        EcccFlag::Estimated,
        EcccFlag::AccumulatedEstimated,
        EcccFlag::OccurrenceUncertain,
        EcccFlag::Missing,
        EcccFlag::MissingAboveZero,
        EcccFlag::MultipleOccurrence,
        EcccFlag::Trace,
        EcccFlag::MissingBelowZero,
        EcccFlag::NotAvailable,
    ];

    /// Parse a flag cell. Returns `None` for tokens outside the archive vocabulary.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            "†" => Some(EcccFlag::NotReviewed),
            "^" => Some(EcccFlag::IncompleteData),
            "A" => Some(EcccFlag::Accumulated),
            "B" => Some(EcccFlag::MultipleOccurrenceEstimated),
            "C" => Some(EcccFlag::AmountUncertain),
            "E" => Some(EcccFlag::Estimated),
            "F" => Some(EcccFlag::AccumulatedEstimated),
            "L" => Some(EcccFlag::OccurrenceUncertain),
            "M" => Some(EcccFlag::Missing),
            "N" => Some(EcccFlag::MissingAboveZero),
            "S" => Some(EcccFlag::MultipleOccurrence),
            "T" => Some(EcccFlag::Trace),
            "Y" => Some(EcccFlag::MissingBelowZero),
            "NA" => Some(EcccFlag::NotAvailable),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            EcccFlag::NotReviewed => "†",
            EcccFlag::IncompleteData => "^",
            EcccFlag::Accumulated => "A",
            EcccFlag::MultipleOccurrenceEstimated => "B",
            EcccFlag::AmountUncertain => "C",
            EcccFlag::Estimated => "E",
            EcccFlag::AccumulatedEstimated => "F",
            EcccFlag::OccurrenceUncertain => "L",
            EcccFlag::Missing => "M",
            EcccFlag::MissingAboveZero => "N",
            EcccFlag::MultipleOccurrence => "S",
            EcccFlag::Trace => "T",
            EcccFlag::MissingBelowZero => "Y",
            EcccFlag::NotAvailable => "NA",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            EcccFlag::NotReviewed => {
                "Data that is not subject to review by the National Climate Archives"
            }
            EcccFlag::IncompleteData => "The value displayed is based on incomplete data",
            EcccFlag::Accumulated => "Accumulated",
            EcccFlag::MultipleOccurrenceEstimated => "More than one occurrence and estimated",
            EcccFlag::AmountUncertain => "Precipitation occurred, amount uncertain",
            EcccFlag::Estimated => "Estimated",
            EcccFlag::AccumulatedEstimated => "Accumulated and estimated",
            EcccFlag::OccurrenceUncertain => "Precipitation may or may not have occurred",
            EcccFlag::Missing => "Missing",
            EcccFlag::MissingAboveZero => "Temperature missing but known to be > 0",
            EcccFlag::MultipleOccurrence => "More than one occurrence",
            EcccFlag::Trace => "Trace",
            EcccFlag::MissingBelowZero => "Temperature missing but known to be < 0",
            EcccFlag::NotAvailable => "Not Available",
        }
    }

    /// Flags that mark the value itself as absent.
    pub fn marks_missing(&self) -> bool {
        matches!(
            self,
            EcccFlag::Missing
                | EcccFlag::MissingAboveZero
                | EcccFlag::MissingBelowZero
                | EcccFlag::NotAvailable
        )
    }
}

impl fmt::Display for EcccFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A flag cell as read from a source file. Tokens outside the archive
/// vocabulary are kept verbatim so they are written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagCell {
    #[default]
    Empty,
    Known(EcccFlag),
    Unknown(String),
}

impl FlagCell {
    pub fn read(raw: &str) -> Self {
        let token = raw.trim();
        if token.is_empty() {
            return FlagCell::Empty;
        }
        match EcccFlag::parse(token) {
            Some(flag) => FlagCell::Known(flag),
            None => FlagCell::Unknown(token.to_string()),
        }
    }

    pub fn flag(&self) -> Option<EcccFlag> {
        match self {
            FlagCell::Known(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FlagCell::Empty)
    }

    /// The cell text to persist.
    pub fn code(&self) -> &str {
        match self {
            FlagCell::Empty => "",
            FlagCell::Known(flag) => flag.code(),
            FlagCell::Unknown(token) => token,
        }
    }
}

impl From<Option<EcccFlag>> for FlagCell {
    fn from(flag: Option<EcccFlag>) -> Self {
        flag.map_or(FlagCell::Empty, FlagCell::Known)
    }
}
