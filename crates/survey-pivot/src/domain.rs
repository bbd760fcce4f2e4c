//! Answer domain analysis: median split, median offset, continuity check.
//!
//! Every function here expects codes sorted ascending and distinct, which is
//! what [`ValueDomain::analysis_codes`] yields. Output maps are keyed by the
//! code's decimal text so they can be matched against raw answer cells.

use std::collections::BTreeMap;

use survey_model::{PivotWarning, PivotSettings, ValueDomain};

/// Median split of a domain: positions below the middle map to 1, positions
/// above it to 0, and the middle position of an odd-length domain to 0.5.
pub fn count_negative_map(codes: &[i64]) -> BTreeMap<String, f64> {
    debug_assert!(codes.windows(2).all(|pair| pair[0] < pair[1]));
    let n = codes.len();
    let half = n / 2;
    codes
        .iter()
        .enumerate()
        .map(|(idx, code)| {
            let value = if idx < half {
                1.0
            } else if n % 2 == 1 && idx == half {
                0.5
            } else {
                0.0
            };
            (code.to_string(), value)
        })
        .collect()
}

/// Median of sorted codes: the middle element, or the mean of the two
/// central elements.
pub fn median(codes: &[i64]) -> Option<f64> {
    let n = codes.len();
    if n == 0 {
        return None;
    }
    if n % 2 == 1 {
        Some(codes[n / 2] as f64)
    } else {
        Some((codes[n / 2 - 1] as f64 + codes[n / 2] as f64) / 2.0)
    }
}

/// Offset of each code from the domain median, rounded away from it.
///
/// `[1, 2, 3, 4]` has median 2.5 and maps to `{1: -2, 2: -1, 3: 1, 4: 2}`.
pub fn normalized_by_median_map(codes: &[i64]) -> BTreeMap<String, i64> {
    let Some(median) = median(codes) else {
        return BTreeMap::new();
    };
    codes
        .iter()
        .map(|&code| {
            let offset = code as f64 - median;
            let value = if offset < 0.0 {
                offset.floor()
            } else if offset > 0.0 {
                offset.ceil()
            } else {
                0.0
            };
            (code.to_string(), value as i64)
        })
        .collect()
}

/// First anomaly in a domain: a code at or below zero, or a gap between
/// neighbouring codes. Scanning stops at the first finding.
pub fn continuity_warning(question: &str, codes: &[i64]) -> Option<PivotWarning> {
    for (idx, &code) in codes.iter().enumerate() {
        if code <= 0 {
            return Some(PivotWarning::NonPositiveCode {
                question: question.to_string(),
                code,
            });
        }
        if idx > 0 && code - codes[idx - 1] != 1 {
            return Some(PivotWarning::DomainDiscontinuity {
                question: question.to_string(),
                previous: codes[idx - 1],
                next: code,
            });
        }
    }
    None
}

/// Derived answer properties of one question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainAnalysis {
    pub count_negative: BTreeMap<String, f64>,
    pub normalized_by_median: BTreeMap<String, i64>,
    pub warning: Option<PivotWarning>,
}

impl DomainAnalysis {
    /// Analyses a question's domain after dropping excluded labels.
    ///
    /// A missing or empty domain yields empty maps and no warning.
    pub fn of(question: &str, domain: Option<&ValueDomain>, settings: &PivotSettings) -> Self {
        let Some(domain) = domain else {
            return Self::default();
        };
        let codes = domain.analysis_codes(|label| settings.is_excluded_label(label));
        Self {
            count_negative: count_negative_map(&codes),
            normalized_by_median: normalized_by_median_map(&codes),
            warning: continuity_warning(question, &codes),
        }
    }

    /// Median-split value for a raw answer; 0 when the answer is not in the
    /// analysed domain.
    pub fn count_negative_for(&self, raw: Option<&str>) -> f64 {
        code_key(raw)
            .and_then(|key| self.count_negative.get(&key))
            .copied()
            .unwrap_or(0.0)
    }

    /// Median offset for a raw answer; 0 when the answer is not in the
    /// analysed domain.
    pub fn normalized_by_median_for(&self, raw: Option<&str>) -> i64 {
        code_key(raw)
            .and_then(|key| self.normalized_by_median.get(&key))
            .copied()
            .unwrap_or(0)
    }
}

/// Map key for raw answer text, read the same way as label lookups so
/// `"05"` and `"5"` meet the same entry.
fn code_key(raw: Option<&str>) -> Option<String> {
    raw?.trim().parse::<i64>().ok().map(|code| code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_pairs<V: Copy>(map: &BTreeMap<String, V>, codes: &[i64]) -> Vec<V> {
        codes.iter().map(|c| map[&c.to_string()]).collect()
    }

    #[test]
    fn test_count_negative_odd() {
        let codes = [1, 2, 3, 4, 5];
        let map = count_negative_map(&codes);
        assert_eq!(as_pairs(&map, &codes), vec![1.0, 1.0, 0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_count_negative_even() {
        let codes = [1, 2, 3, 4];
        let map = count_negative_map(&codes);
        assert_eq!(as_pairs(&map, &codes), vec![1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_count_negative_single_and_empty() {
        assert_eq!(as_pairs(&count_negative_map(&[7]), &[7]), vec![0.5]);
        assert!(count_negative_map(&[]).is_empty());
    }

    #[test]
    fn test_normalized_even() {
        let codes = [1, 2, 3, 4];
        let map = normalized_by_median_map(&codes);
        assert_eq!(as_pairs(&map, &codes), vec![-2, -1, 1, 2]);
    }

    #[test]
    fn test_normalized_odd() {
        let codes = [1, 2, 3, 4, 5];
        let map = normalized_by_median_map(&codes);
        assert_eq!(as_pairs(&map, &codes), vec![-2, -1, 0, 1, 2]);
    }

    #[test]
    fn test_normalized_with_gap() {
        // median of [1, 2, 10] is 2
        let codes = [1, 2, 10];
        let map = normalized_by_median_map(&codes);
        assert_eq!(as_pairs(&map, &codes), vec![-1, 0, 8]);
        assert!(normalized_by_median_map(&[]).is_empty());
    }

    #[test]
    fn test_continuity_ok() {
        assert_eq!(continuity_warning("Q1", &[1, 2, 3]), None);
        assert_eq!(continuity_warning("Q1", &[]), None);
    }

    #[test]
    fn test_continuity_non_positive_first_code() {
        assert_eq!(
            continuity_warning("Q1", &[0, 1, 2]),
            Some(PivotWarning::NonPositiveCode {
                question: "Q1".to_string(),
                code: 0
            })
        );
    }

    #[test]
    fn test_continuity_reports_first_gap_only() {
        assert_eq!(
            continuity_warning("Q2", &[1, 2, 4, 9]),
            Some(PivotWarning::DomainDiscontinuity {
                question: "Q2".to_string(),
                previous: 2,
                next: 4
            })
        );
    }

    #[test]
    fn test_analysis_drops_excluded_labels() {
        let mut domain = ValueDomain::new();
        domain.insert(1, "Agree");
        domain.insert(2, "Neutral");
        domain.insert(3, "Disagree");
        domain.insert(9, "Don't know");
        let settings =
            PivotSettings::default().with_exclude_from_analysis(vec!["don't know".to_string()]);

        let analysis = DomainAnalysis::of("Q1", Some(&domain), &settings);

        assert_eq!(analysis.count_negative.len(), 3);
        assert_eq!(analysis.count_negative_for(Some("1")), 1.0);
        assert_eq!(analysis.count_negative_for(Some("2")), 0.5);
        assert_eq!(analysis.count_negative_for(Some("9")), 0.0);
        assert_eq!(analysis.normalized_by_median_for(Some("3")), 1);
        assert_eq!(analysis.normalized_by_median_for(Some("9")), 0);
        assert_eq!(analysis.warning, None);
    }

    #[test]
    fn test_analysis_reads_padded_codes() {
        let mut domain = ValueDomain::new();
        for code in 1..=5 {
            domain.insert(code, format!("Level {code}"));
        }
        let analysis = DomainAnalysis::of("Q1", Some(&domain), &PivotSettings::default());

        assert_eq!(analysis.count_negative_for(Some("01")), 1.0);
        assert_eq!(analysis.normalized_by_median_for(Some(" 05")), 2);
        assert_eq!(analysis.count_negative_for(Some("003")), 0.5);
        assert_eq!(analysis.normalized_by_median_for(Some("x5")), 0);
    }

    #[test]
    fn test_analysis_without_domain() {
        let analysis = DomainAnalysis::of("Q1", None, &PivotSettings::default());
        assert_eq!(analysis.count_negative_for(Some("1")), 0.0);
        assert_eq!(analysis.normalized_by_median_for(None), 0);
    }
}
