use crate::case_id::CaseIdError;
use std::fmt;
use std::str::FromStr;

/// Literal tag expected between the case number and the year
pub const RD_TAG: &str = "RD";

/// Earliest accepted year
pub const MIN_YEAR: u16 = 2000;

/// Latest accepted year
pub const MAX_YEAR: u16 = 2100;

const MAX_NUMBER_DIGITS: usize = 5;
const YEAR_DIGITS: usize = 4;

/// A validated `NUMBER/RD/YEAR` case identifier
///
/// Instances can only be obtained through [`CaseId::parse`] (or `FromStr`),
/// so holding one guarantees the shape and the year range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CaseId {
    raw: String,
    year: u16,
}

impl CaseId {
    /// Parses and validates a case identifier
    ///
    /// The input is taken verbatim; callers are expected to trim user input.
    ///
    /// # Examples
    ///
    /// ```
    /// use decree_scout::case_id::CaseId;
    ///
    /// let id = CaseId::parse("123/RD/2023").unwrap();
    /// assert_eq!(id.year(), 2023);
    /// assert!(CaseId::parse("123/XX/2023").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, CaseIdError> {
        let parts: Vec<&str> = raw.split('/').collect();
        let [number, tag, year] = parts.as_slice() else {
            return Err(CaseIdError::Shape);
        };

        if *tag != RD_TAG {
            return Err(CaseIdError::Shape);
        }

        if number.is_empty() || number.len() > MAX_NUMBER_DIGITS || !all_ascii_digits(number) {
            return Err(CaseIdError::Number(number.to_string()));
        }

        if year.len() != YEAR_DIGITS || !all_ascii_digits(year) {
            return Err(CaseIdError::YearDigits(year.to_string()));
        }

        // Four ASCII digits always fit in a u16
        let year: u16 = year
            .parse()
            .map_err(|_| CaseIdError::YearDigits(year.to_string()))?;

        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(CaseIdError::YearOutOfRange(year));
        }

        Ok(Self {
            raw: raw.to_string(),
            year,
        })
    }

    /// The year of the bulletin this case belongs to
    pub fn year(&self) -> u16 {
        self.year
    }

    /// The identifier exactly as it appears in the bulletin
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn all_ascii_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

impl FromStr for CaseId {
    type Err = CaseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl AsRef<str> for CaseId {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}
