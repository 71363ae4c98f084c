use crate::color::department_colors;
use crate::data::aggregate::{aggregate, AggregateResult};
use crate::data::filter::FilterSelection;
use crate::data::model::{Dataset, Department};

use eframe::egui::Color32;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// The dataset is loaded once and owned here; `aggregates` is a cache of the
/// pure pipeline output and is fully rebuilt by [`AppState::recompute`] after
/// every dataset or filter change.
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// Current include-filter selection.
    pub selection: FilterSelection,

    /// Pipeline output for (dataset, selection); empty result until a file
    /// is loaded.
    pub aggregates: AggregateResult,

    /// Stable per-department chart colors.
    pub dept_colors: [(Department, Color32); 4],

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            selection: FilterSelection::default(),
            aggregates: AggregateResult::empty(),
            dept_colors: department_colors(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset and reset filters to all-selected.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.selection = FilterSelection::select_all_of(&dataset);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.recompute();
    }

    /// Rebuild the cached aggregates after any selection change.
    pub fn recompute(&mut self) {
        self.aggregates = match &self.dataset {
            Some(ds) => aggregate(ds, &self.selection),
            None => AggregateResult::empty(),
        };
    }

    /// Toggle one year in the selection.
    pub fn toggle_year(&mut self, year: i64) {
        if !self.selection.years.remove(&year) {
            self.selection.years.insert(year);
        }
        self.recompute();
    }

    /// Toggle one term in the selection.
    pub fn toggle_term(&mut self, term: &str) {
        if !self.selection.terms.remove(term) {
            self.selection.terms.insert(term.to_string());
        }
        self.recompute();
    }

    /// Toggle one department in the selection.
    pub fn toggle_department(&mut self, dept: Department) {
        if !self.selection.departments.remove(&dept) {
            self.selection.departments.insert(dept);
        }
        self.recompute();
    }

    /// Select all years.
    pub fn select_all_years(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selection.years = ds.years.clone();
        }
        self.recompute();
    }

    /// Deselect all years.
    pub fn select_no_years(&mut self) {
        self.selection.years.clear();
        self.recompute();
    }

    /// Select all terms.
    pub fn select_all_terms(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selection.terms = ds.terms.clone();
        }
        self.recompute();
    }

    /// Deselect all terms.
    pub fn select_no_terms(&mut self) {
        self.selection.terms.clear();
        self.recompute();
    }

    /// Select all departments.
    pub fn select_all_departments(&mut self) {
        self.selection.departments = Department::ALL.iter().copied().collect();
        self.recompute();
    }

    /// Deselect all departments.
    pub fn select_no_departments(&mut self) {
        self.selection.departments.clear();
        self.recompute();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;
    use std::collections::BTreeMap;

    fn dataset() -> Dataset {
        let record = |year, term: &str, enrolled| Record {
            year,
            term: term.to_string(),
            retention_rate: 85.0,
            satisfaction_score: 75.0,
            enrolled_total: enrolled,
            enrolled_by_department: BTreeMap::new(),
        };
        Dataset::from_records(vec![
            record(2020, "Fall", 100),
            record(2021, "Fall", 50),
        ])
    }

    #[test]
    fn set_dataset_selects_everything_and_recomputes() {
        let mut state = AppState::default();
        state.set_dataset(dataset());

        assert_eq!(state.selection.years.len(), 2);
        assert_eq!(state.selection.departments.len(), 4);
        assert_eq!(state.aggregates.total_enrolled, 150);
    }

    #[test]
    fn toggling_a_year_refreshes_aggregates() {
        let mut state = AppState::default();
        state.set_dataset(dataset());

        state.toggle_year(2020);
        assert_eq!(state.aggregates.total_enrolled, 50);

        state.toggle_year(2020);
        assert_eq!(state.aggregates.total_enrolled, 150);
    }

    #[test]
    fn deselecting_all_terms_yields_the_empty_result() {
        let mut state = AppState::default();
        state.set_dataset(dataset());

        state.select_no_terms();
        assert!(state.aggregates.is_empty());
        assert!(state.aggregates.avg_retention.is_nan());
    }
}
