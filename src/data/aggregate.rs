use std::collections::BTreeMap;

use super::filter::{filtered_indices, FilterSelection};
use super::model::{Dataset, Department};

// ---------------------------------------------------------------------------
// AggregateResult – everything the dashboard displays
// ---------------------------------------------------------------------------

/// KPIs and chart series derived from one (dataset, selection) pair.
///
/// A pure function of its inputs: [`aggregate`] rebuilds the whole struct on
/// every call and never patches a previous result. When the filtered subset
/// is empty the means are NaN, the sum is 0, the trend series are empty and
/// every selected department reports a zero total.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    /// Mean retention rate (%) over the filtered records; NaN when empty.
    pub avg_retention: f64,
    /// Mean satisfaction score (%) over the filtered records; NaN when empty.
    pub avg_satisfaction: f64,
    /// Total enrollment over the filtered records.
    pub total_enrolled: u64,
    /// (year, mean retention) per distinct year present, ascending.
    pub retention_by_year: Vec<(i64, f64)>,
    /// (year, mean satisfaction) per distinct year present, ascending.
    pub satisfaction_by_year: Vec<(i64, f64)>,
    /// (department, summed enrollment) for each selected department, in
    /// [`Department::ALL`] order.
    pub department_totals: Vec<(Department, u64)>,
    /// Number of records that passed the filter.
    pub record_count: usize,
}

impl AggregateResult {
    /// The result of aggregating no records at all (no dataset loaded).
    pub fn empty() -> Self {
        AggregateResult {
            avg_retention: f64::NAN,
            avg_satisfaction: f64::NAN,
            total_enrolled: 0,
            retention_by_year: Vec::new(),
            satisfaction_by_year: Vec::new(),
            department_totals: Vec::new(),
            record_count: 0,
        }
    }

    /// Whether the filtered subset was empty (means are NaN in that case).
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    /// Summed enrollment across the department breakdown.
    pub fn department_grand_total(&self) -> u64 {
        self.department_totals.iter().map(|(_, n)| n).sum()
    }
}

/// Per-group running mean state.
#[derive(Default)]
struct MeanAcc {
    sum: f64,
    count: u64,
}

impl MeanAcc {
    fn push(&mut self, v: f64) {
        self.sum += v;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Run the full filter-and-aggregate pipeline.
///
/// One pass over the records passing the year/term filter accumulates the
/// KPI sums, the per-year means and the per-department totals. Department
/// selection narrows only `department_totals`; the KPIs and year trends
/// always cover every department column of the filtered records.
pub fn aggregate(dataset: &Dataset, selection: &FilterSelection) -> AggregateResult {
    let indices = filtered_indices(dataset, selection);
    if indices.is_empty() {
        // Selected departments still appear in the breakdown, with zeros.
        return AggregateResult {
            department_totals: selected_totals(selection, &BTreeMap::new()),
            ..AggregateResult::empty()
        };
    }

    let mut retention = MeanAcc::default();
    let mut satisfaction = MeanAcc::default();
    let mut total_enrolled: u64 = 0;

    // BTreeMap keys give the ascending-year ordering of the trend series.
    let mut retention_by_year: BTreeMap<i64, MeanAcc> = BTreeMap::new();
    let mut satisfaction_by_year: BTreeMap<i64, MeanAcc> = BTreeMap::new();

    let mut dept_sums: BTreeMap<Department, u64> = BTreeMap::new();

    for &idx in &indices {
        let rec = &dataset.records[idx];

        retention.push(rec.retention_rate);
        satisfaction.push(rec.satisfaction_score);
        total_enrolled += rec.enrolled_total;

        retention_by_year
            .entry(rec.year)
            .or_default()
            .push(rec.retention_rate);
        satisfaction_by_year
            .entry(rec.year)
            .or_default()
            .push(rec.satisfaction_score);

        for &dept in &selection.departments {
            *dept_sums.entry(dept).or_default() += rec.department_enrolled(dept);
        }
    }

    AggregateResult {
        avg_retention: retention.mean(),
        avg_satisfaction: satisfaction.mean(),
        total_enrolled,
        retention_by_year: retention_by_year
            .iter()
            .map(|(&year, acc)| (year, acc.mean()))
            .collect(),
        satisfaction_by_year: satisfaction_by_year
            .iter()
            .map(|(&year, acc)| (year, acc.mean()))
            .collect(),
        department_totals: selected_totals(selection, &dept_sums),
        record_count: indices.len(),
    }
}

/// One (department, total) entry per selected department, in
/// [`Department::ALL`] order. Departments absent from `sums` report zero.
fn selected_totals(
    selection: &FilterSelection,
    sums: &BTreeMap<Department, u64>,
) -> Vec<(Department, u64)> {
    Department::ALL
        .iter()
        .copied()
        .filter(|d| selection.departments.contains(d))
        .map(|d| (d, sums.get(&d).copied().unwrap_or(0)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;

    fn record(
        year: i64,
        term: &str,
        retention: f64,
        satisfaction: f64,
        enrolled: u64,
        depts: [u64; 4],
    ) -> Record {
        Record {
            year,
            term: term.to_string(),
            retention_rate: retention,
            satisfaction_score: satisfaction,
            enrolled_total: enrolled,
            enrolled_by_department: Department::ALL
                .iter()
                .copied()
                .zip(depts.into_iter())
                .collect(),
        }
    }

    /// Two records, 2020 and 2021, both Fall.
    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            record(2020, "Fall", 80.0, 70.0, 100, [60, 40, 0, 0]),
            record(2021, "Fall", 90.0, 85.0, 50, [20, 10, 10, 10]),
        ])
    }

    #[test]
    fn full_selection_scenario() {
        let ds = dataset();
        let sel = FilterSelection::select_all_of(&ds);
        let agg = aggregate(&ds, &sel);

        assert_eq!(agg.avg_retention, 85.0);
        assert_eq!(agg.avg_satisfaction, 77.5);
        assert_eq!(agg.total_enrolled, 150);
        assert_eq!(agg.record_count, 2);
        assert_eq!(agg.retention_by_year, vec![(2020, 80.0), (2021, 90.0)]);
        assert_eq!(agg.satisfaction_by_year, vec![(2020, 70.0), (2021, 85.0)]);
        assert_eq!(
            agg.department_totals,
            vec![
                (Department::Engineering, 80),
                (Department::Business, 50),
                (Department::Arts, 10),
                (Department::Science, 10),
            ]
        );
        // With all departments selected the breakdown covers every student.
        assert_eq!(agg.department_grand_total(), agg.total_enrolled);
    }

    #[test]
    fn single_year_selection() {
        let ds = dataset();
        let mut sel = FilterSelection::select_all_of(&ds);
        sel.years = [2020].into_iter().collect();
        let agg = aggregate(&ds, &sel);

        assert_eq!(agg.total_enrolled, 100);
        assert_eq!(agg.retention_by_year, vec![(2020, 80.0)]);
        assert_eq!(agg.satisfaction_by_year.len(), 1);
    }

    #[test]
    fn empty_subset_degrades_gracefully() {
        let ds = dataset();
        let mut sel = FilterSelection::select_all_of(&ds);
        sel.terms.clear();
        let agg = aggregate(&ds, &sel);

        assert!(agg.is_empty());
        assert!(agg.avg_retention.is_nan());
        assert!(agg.avg_satisfaction.is_nan());
        assert_eq!(agg.total_enrolled, 0);
        assert!(agg.retention_by_year.is_empty());
        assert!(agg.satisfaction_by_year.is_empty());
        // Every selected department still gets a row, all zero.
        assert_eq!(
            agg.department_totals,
            vec![
                (Department::Engineering, 0),
                (Department::Business, 0),
                (Department::Arts, 0),
                (Department::Science, 0),
            ]
        );
    }

    #[test]
    fn empty_subset_keeps_zero_totals_for_selected_departments() {
        let ds = dataset();
        let mut sel = FilterSelection::select_all_of(&ds);
        sel.years.clear();
        sel.departments = [Department::Business].into_iter().collect();
        let agg = aggregate(&ds, &sel);

        assert!(agg.is_empty());
        assert_eq!(agg.department_totals, vec![(Department::Business, 0)]);
        assert_eq!(agg.department_grand_total(), 0);
    }

    #[test]
    fn total_enrolled_matches_manual_sum() {
        let ds = dataset();
        let sel = FilterSelection::select_all_of(&ds);
        let agg = aggregate(&ds, &sel);

        let expected: u64 = filtered_indices(&ds, &sel)
            .into_iter()
            .map(|i| ds.records[i].enrolled_total)
            .sum();
        assert_eq!(agg.total_enrolled, expected);
    }

    #[test]
    fn means_stay_in_percentage_range() {
        let ds = dataset();
        let sel = FilterSelection::select_all_of(&ds);
        let agg = aggregate(&ds, &sel);
        assert!((0.0..=100.0).contains(&agg.avg_retention));
        assert!((0.0..=100.0).contains(&agg.avg_satisfaction));
    }

    #[test]
    fn trend_years_are_unique_and_ascending() {
        let ds = Dataset::from_records(vec![
            record(2022, "Fall", 88.0, 75.0, 40, [10, 10, 10, 10]),
            record(2020, "Fall", 80.0, 70.0, 40, [10, 10, 10, 10]),
            record(2022, "Spring", 92.0, 79.0, 40, [10, 10, 10, 10]),
            record(2021, "Fall", 84.0, 72.0, 40, [10, 10, 10, 10]),
        ]);
        let sel = FilterSelection::select_all_of(&ds);
        let agg = aggregate(&ds, &sel);

        let years: Vec<i64> = agg.retention_by_year.iter().map(|&(y, _)| y).collect();
        assert_eq!(years, vec![2020, 2021, 2022]);
        // 2022 has two records, so its trend value is their mean.
        assert_eq!(agg.retention_by_year[2], (2022, 90.0));
    }

    #[test]
    fn department_selection_narrows_breakdown_only() {
        let ds = dataset();
        let mut sel = FilterSelection::select_all_of(&ds);
        sel.departments = [Department::Engineering, Department::Science]
            .into_iter()
            .collect();
        let agg = aggregate(&ds, &sel);

        // KPIs are untouched by the department selection.
        assert_eq!(agg.avg_retention, 85.0);
        assert_eq!(agg.total_enrolled, 150);
        // The breakdown only covers the selected departments, ALL-ordered.
        assert_eq!(
            agg.department_totals,
            vec![(Department::Engineering, 80), (Department::Science, 10)]
        );
    }

    #[test]
    fn aggregation_is_idempotent() {
        let ds = dataset();
        let mut sel = FilterSelection::select_all_of(&ds);
        sel.years = [2021].into_iter().collect();
        assert_eq!(aggregate(&ds, &sel), aggregate(&ds, &sel));
    }
}
