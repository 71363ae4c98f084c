use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Row {
    year: i64,
    term: &'static str,
    retention: f64,
    satisfaction: f64,
    engineering: i64,
    business: i64,
    arts: i64,
    science: i64,
}

impl Row {
    fn enrolled(&self) -> i64 {
        self.engineering + self.business + self.arts + self.science
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let years: Vec<i64> = (2018..=2024).collect();
    let terms = ["Spring", "Fall"];

    // Slow upward drift in retention/satisfaction, department mixes around a
    // fixed base with per-term noise.
    let mut rows = Vec::new();
    for (i, &year) in years.iter().enumerate() {
        for &term in &terms {
            let drift = i as f64 * 0.8;
            let fall_boost = if term == "Fall" { 1.5 } else { 0.0 };

            let retention = (78.0 + drift + rng.gauss(0.0, 1.2)).clamp(0.0, 100.0);
            let satisfaction = (72.0 + drift + fall_boost + rng.gauss(0.0, 1.8)).clamp(0.0, 100.0);

            let dept = |base: f64, rng: &mut SimpleRng| -> i64 {
                rng.gauss(base * (1.0 + i as f64 * 0.03), base * 0.05)
                    .round()
                    .max(0.0) as i64
            };

            rows.push(Row {
                year,
                term,
                retention: (retention * 100.0).round() / 100.0,
                satisfaction: (satisfaction * 100.0).round() / 100.0,
                engineering: dept(420.0, &mut rng),
                business: dept(350.0, &mut rng),
                arts: dept(260.0, &mut rng),
                science: dept(310.0, &mut rng),
            });
        }
    }

    write_csv(&rows, "university_student_data.csv");
    write_parquet(&rows, "university_student_data.parquet");

    println!(
        "Wrote {} records ({} years x {} terms) to university_student_data.{{csv,parquet}}",
        rows.len(),
        years.len(),
        terms.len()
    );
}

fn write_csv(rows: &[Row], path: &str) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create CSV file");
    writer
        .write_record([
            "Year",
            "Term",
            "Retention Rate (%)",
            "Student Satisfaction (%)",
            "Enrolled",
            "Engineering Enrolled",
            "Business Enrolled",
            "Arts Enrolled",
            "Science Enrolled",
        ])
        .expect("Failed to write CSV header");

    for row in rows {
        writer
            .write_record([
                row.year.to_string(),
                row.term.to_string(),
                row.retention.to_string(),
                row.satisfaction.to_string(),
                row.enrolled().to_string(),
                row.engineering.to_string(),
                row.business.to_string(),
                row.arts.to_string(),
                row.science.to_string(),
            ])
            .expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV");
}

fn write_parquet(rows: &[Row], path: &str) {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Year", DataType::Int64, false),
        Field::new("Term", DataType::Utf8, false),
        Field::new("Retention Rate (%)", DataType::Float64, false),
        Field::new("Student Satisfaction (%)", DataType::Float64, false),
        Field::new("Enrolled", DataType::Int64, false),
        Field::new("Engineering Enrolled", DataType::Int64, false),
        Field::new("Business Enrolled", DataType::Int64, false),
        Field::new("Arts Enrolled", DataType::Int64, false),
        Field::new("Science Enrolled", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.year).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.term).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.retention).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.satisfaction).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.enrolled()).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.engineering).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.business).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.arts).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.science).collect::<Vec<_>>(),
            )),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}
