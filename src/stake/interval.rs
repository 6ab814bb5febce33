// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Modifier selection windows.
//!
//! The selection interval is split into 64 sections that grow from
//! `modifier_interval / ratio` (section 0) to `modifier_interval`
//! (section 63). All arithmetic is truncating i64 division.

use crate::config::{StakeParams, SELECTION_SECTIONS};

/// Length in seconds of selection section `section` (0..64).
pub fn section_interval(params: &StakeParams, section: usize) -> i64 {
    assert!(section < SELECTION_SECTIONS, "selection section {section} out of range");
    let remaining = (SELECTION_SECTIONS - 1 - section) as i64;
    params.modifier_interval * 63 / (63 + remaining * (params.modifier_interval_ratio - 1))
}

/// Sum of all 64 section lengths.
pub fn selection_interval(params: &StakeParams) -> i64 {
    (0..SELECTION_SECTIONS).map(|s| section_interval(params, s)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn params(modifier_interval: i64) -> StakeParams {
        StakeParams { modifier_interval, ..StakeParams::default() }
    }

    #[test]
    fn test_section_bounds() {
        let p = params(21600);
        assert_eq!(section_interval(&p, 0), 7200);
        assert_eq!(section_interval(&p, 1), 7277);
        assert_eq!(section_interval(&p, 32), 10886);
        assert_eq!(section_interval(&p, 62), 20935);
        assert_eq!(section_interval(&p, 63), 21600);
    }

    #[test]
    fn test_selection_interval_totals() {
        assert_eq!(selection_interval(&params(21600)), 761920);
        assert_eq!(selection_interval(&params(600)), 21135);
        assert_eq!(selection_interval(&params(1200)), 42301);
    }

    #[test]
    #[should_panic]
    fn test_section_out_of_range() {
        section_interval(&params(600), 64);
    }

    proptest! {
        #[test]
        fn proptest_total_is_literal_sum(interval in 1i64..1_000_000, ratio in 1i64..16) {
            let p = StakeParams { modifier_interval: interval, modifier_interval_ratio: ratio, ..StakeParams::default() };
            let mut expected = 0i64;
            for s in 0..64i64 {
                expected += interval * 63 / (63 + (63 - s) * (ratio - 1));
            }
            prop_assert_eq!(selection_interval(&p), expected);
        }

        #[test]
        fn proptest_sections_non_decreasing(interval in 1i64..1_000_000, ratio in 1i64..16) {
            let p = StakeParams { modifier_interval: interval, modifier_interval_ratio: ratio, ..StakeParams::default() };
            for s in 1..64usize {
                prop_assert!(section_interval(&p, s) >= section_interval(&p, s - 1));
            }
            prop_assert_eq!(section_interval(&p, 63), interval);
        }
    }
}
