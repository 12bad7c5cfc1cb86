use bcw_core::cotton::{sanitize, RegionYearArea};
use log::info;
use serde::Serialize;
use std::collections::BTreeMap;

/// Total planted area of one year across all regions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalTrend {
    pub year: i32,
    pub planted_area: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HistoricalSeries {
    /// Ascending by year.
    pub years: Vec<HistoricalTrend>,
    /// Cotton records removed by sanitizing.
    pub dropped: usize,
}

/// Sum planted area per year.
pub fn analyze_historical_trends(cotton: &[RegionYearArea]) -> HistoricalSeries {
    let sanitized = sanitize(cotton);
    let mut totals: BTreeMap<i32, f64> = BTreeMap::new();
    for record in &sanitized.records {
        *totals.entry(record.year).or_insert(0.0) += record.planted_area;
    }
    let years: Vec<HistoricalTrend> = totals
        .into_iter()
        .map(|(year, planted_area)| HistoricalTrend { year, planted_area })
        .collect();
    info!("analysis: historical trend covers {} years", years.len());
    HistoricalSeries {
        years,
        dropped: sanitized.dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::area;

    #[test]
    fn test_sums_by_year() {
        let series = analyze_historical_trends(&[
            area("A", 2020, 10.0),
            area("B", 2020, 5.0),
            area("A", 2021, 7.0),
        ]);
        assert_eq!(
            series.years,
            vec![
                HistoricalTrend {
                    year: 2020,
                    planted_area: 15.0
                },
                HistoricalTrend {
                    year: 2021,
                    planted_area: 7.0
                },
            ]
        );
    }

    #[test]
    fn test_years_ascend_even_when_input_does_not() {
        let series = analyze_historical_trends(&[
            area("A", 2001, 1.0),
            area("A", 1999, 9.0),
            area("A", 2000, 3.0),
        ]);
        let years: Vec<i32> = series.years.iter().map(|y| y.year).collect();
        assert_eq!(years, vec![1999, 2000, 2001]);
    }

    #[test]
    fn test_empty_input() {
        let series = analyze_historical_trends(&[]);
        assert!(series.years.is_empty());
        assert_eq!(series.dropped, 0);
    }
}
