use std::collections::BTreeSet;

use super::model::{Dataset, Department};

// ---------------------------------------------------------------------------
// Filter selection: which values are selected per category
// ---------------------------------------------------------------------------

/// Per-category selection state.
///
/// Semantics are select-to-include everywhere: a record passes when its year
/// AND its term are in the respective sets, and department totals are summed
/// only for the departments in `departments`. An empty set selects nothing.
/// Values that do not occur in the dataset are allowed and simply match no
/// records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub years: BTreeSet<i64>,
    pub terms: BTreeSet<String>,
    pub departments: BTreeSet<Department>,
}

impl FilterSelection {
    /// A selection covering the whole dataset (all values selected), the
    /// default state after loading a file.
    pub fn select_all_of(dataset: &Dataset) -> Self {
        FilterSelection {
            years: dataset.years.clone(),
            terms: dataset.terms.clone(),
            departments: Department::ALL.iter().copied().collect(),
        }
    }

    /// True when no year or no term is selected, i.e. the filtered subset is
    /// empty by construction.
    pub fn selects_nothing(&self) -> bool {
        self.years.is_empty() || self.terms.is_empty()
    }
}

/// Return indices of records passing the year and term filters.
///
/// Department selection deliberately does not participate here: it narrows
/// the department breakdown, not the record subset (see `data::aggregate`).
pub fn filtered_indices(dataset: &Dataset, selection: &FilterSelection) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            selection.years.contains(&rec.year) && selection.terms.contains(&rec.term)
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;
    use std::collections::BTreeMap;

    fn record(year: i64, term: &str) -> Record {
        Record {
            year,
            term: term.to_string(),
            retention_rate: 80.0,
            satisfaction_score: 70.0,
            enrolled_total: 10,
            enrolled_by_department: BTreeMap::new(),
        }
    }

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            record(2020, "Fall"),
            record(2020, "Spring"),
            record(2021, "Fall"),
            record(2021, "Spring"),
        ])
    }

    #[test]
    fn default_selection_passes_everything() {
        let ds = dataset();
        let sel = FilterSelection::select_all_of(&ds);
        assert_eq!(filtered_indices(&ds, &sel), vec![0, 1, 2, 3]);
        assert!(!sel.selects_nothing());
    }

    #[test]
    fn year_and_term_filters_combine_with_and() {
        let ds = dataset();
        let mut sel = FilterSelection::select_all_of(&ds);
        sel.years = [2021].into_iter().collect();
        sel.terms = ["Fall".to_string()].into_iter().collect();
        assert_eq!(filtered_indices(&ds, &sel), vec![2]);
    }

    #[test]
    fn empty_set_selects_nothing() {
        let ds = dataset();
        let mut sel = FilterSelection::select_all_of(&ds);
        sel.terms.clear();
        assert!(sel.selects_nothing());
        assert!(filtered_indices(&ds, &sel).is_empty());
    }

    #[test]
    fn unknown_values_match_no_records() {
        let ds = dataset();
        let mut sel = FilterSelection::select_all_of(&ds);
        sel.years = [1999].into_iter().collect();
        assert!(filtered_indices(&ds, &sel).is_empty());
    }

    #[test]
    fn department_selection_does_not_restrict_records() {
        let ds = dataset();
        let mut sel = FilterSelection::select_all_of(&ds);
        sel.departments.clear();
        assert_eq!(filtered_indices(&ds, &sel).len(), 4);
    }
}
