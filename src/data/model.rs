use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Department – the fixed set of enrollment breakdown categories
// ---------------------------------------------------------------------------

/// One of the four department enrollment columns of the source table.
/// `Ord` follows the declaration order, which is also the column order of the
/// source file and the display order of every department breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Department {
    Engineering,
    Business,
    Arts,
    Science,
}

impl Department {
    /// Canonical ordering used for iteration and display.
    pub const ALL: [Department; 4] = [
        Department::Engineering,
        Department::Business,
        Department::Arts,
        Department::Science,
    ];

    /// Header of the corresponding column in the source table.
    pub fn column_name(&self) -> &'static str {
        match self {
            Department::Engineering => "Engineering Enrolled",
            Department::Business => "Business Enrolled",
            Department::Arts => "Arts Enrolled",
            Department::Science => "Science Enrolled",
        }
    }

    /// Short label for filter widgets and chart legends.
    pub fn label(&self) -> &'static str {
        match self {
            Department::Engineering => "Engineering",
            Department::Business => "Business",
            Department::Arts => "Arts",
            Department::Science => "Science",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the source table
// ---------------------------------------------------------------------------

/// One year/term observation. Percentages are kept as 0–100 values, the way
/// the source file stores them.
#[derive(Debug, Clone)]
pub struct Record {
    pub year: i64,
    pub term: String,
    pub retention_rate: f64,
    pub satisfaction_score: f64,
    pub enrolled_total: u64,
    /// Per-department enrollment counts; every [`Department`] has an entry.
    pub enrolled_by_department: BTreeMap<Department, u64>,
}

impl Record {
    /// Enrollment count for one department column (0 if absent).
    pub fn department_enrolled(&self, dept: Department) -> u64 {
        self.enrolled_by_department.get(&dept).copied().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed unique-value indexes.
/// Loaded once per session and immutable afterwards; filtering and
/// aggregation borrow it.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All records (rows), in file order.
    pub records: Vec<Record>,
    /// Sorted set of distinct years present.
    pub years: BTreeSet<i64>,
    /// Sorted set of distinct terms present.
    pub terms: BTreeSet<String>,
}

impl Dataset {
    /// Build the unique-value indexes from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut years = BTreeSet::new();
        let mut terms = BTreeSet::new();

        for rec in &records {
            years.insert(rec.year);
            terms.insert(rec.term.clone());
        }

        Dataset {
            records,
            years,
            terms,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
