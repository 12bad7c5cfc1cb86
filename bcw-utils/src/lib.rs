//! Shared utility functions for BCW crates.

/// Date utility functions
pub mod dates {
    use chrono::{NaiveDate, NaiveDateTime};

    /// Canonical date format of the weather exports: "YYYY-MM-DD"
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    const DATE_FORMATS: [&str; 3] = [DATE_FORMAT, "%Y/%m/%d", "%d/%m/%Y"];
    const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

    /// Best-effort date parsing.
    ///
    /// Accepts "YYYY-MM-DD", "YYYY/MM/DD", "DD/MM/YYYY" and full timestamps
    /// such as "2021-03-04 00:00:00". Returns `None` when nothing matches.
    pub fn parse_date_lenient(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
            .or_else(|| {
                DATETIME_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                    .map(|dt| dt.date())
            })
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_parse_date_lenient() {
            let expected = NaiveDate::from_ymd_opt(2021, 3, 4);
            assert_eq!(parse_date_lenient("2021-03-04"), expected);
            assert_eq!(parse_date_lenient(" 2021/03/04 "), expected);
            assert_eq!(parse_date_lenient("04/03/2021"), expected);
            assert_eq!(parse_date_lenient("2021-03-04 00:00:00"), expected);
        }

        #[test]
        fn test_parse_date_lenient_rejects_garbage() {
            assert_eq!(parse_date_lenient(""), None);
            assert_eq!(parse_date_lenient("not a date"), None);
            assert_eq!(parse_date_lenient("2021-13-01"), None);
        }
    }
}

/// Numeric coercion of raw spreadsheet and CSV cells
pub mod numeric {
    /// Placeholders that mean "no value" in the source exports.
    const MISSING_MARKERS: [&str; 8] = ["-", "--", "---", "null", "n/a", "na", "nan", "*"];

    /// Coerce a raw cell into a finite `f64`.
    ///
    /// Blank cells, missing-value markers, text and non-finite numbers all
    /// coerce to `None`. Decimal commas ("1234,5") and dotted thousands with a
    /// decimal comma ("1.234,5") are accepted.
    pub fn coerce_f64(raw: &str) -> Option<f64> {
        if is_missing(raw) {
            return None;
        }
        let trimmed = raw.trim();
        let parsed = match trimmed.parse::<f64>() {
            Ok(v) => Some(v),
            Err(_) => parse_decimal_comma(trimmed),
        };
        parsed.filter(|v| v.is_finite())
    }

    /// True for blank cells and missing-value markers.
    pub fn is_missing(raw: &str) -> bool {
        let trimmed = raw.trim();
        trimmed.is_empty() || MISSING_MARKERS.contains(&trimmed.to_lowercase().as_str())
    }

    fn parse_decimal_comma(s: &str) -> Option<f64> {
        let comma = s.rfind(',')?;
        if let Some(dot) = s.rfind('.') {
            if dot > comma {
                return None;
            }
        }
        let normalized = s.replace('.', "").replace(',', ".");
        normalized.parse::<f64>().ok()
    }

}
