use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use crate::color::color_for;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Central panel – KPI row and the three charts
// ---------------------------------------------------------------------------

/// Render the dashboard: KPI readouts, retention trend, satisfaction bars,
/// department share of enrollment.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view enrollment data  (File → Open…)");
        });
        return;
    }

    kpi_row(ui, state);
    ui.separator();

    let chart_height = (ui.available_height() - ui.spacing().item_spacing.y * 2.0) / 3.0;
    retention_trend(ui, state, chart_height);
    satisfaction_bars(ui, state, chart_height);
    department_share(ui, state, chart_height);
}

// ---------------------------------------------------------------------------
// KPI row
// ---------------------------------------------------------------------------

fn kpi_row(ui: &mut Ui, state: &AppState) {
    let agg = &state.aggregates;

    // NaN means the filtered subset is empty; show a placeholder instead.
    let fmt_pct = |v: f64| {
        if v.is_nan() {
            "--".to_string()
        } else {
            format!("{v:.2} %")
        }
    };

    ui.columns(3, |cols| {
        kpi(&mut cols[0], "Avg Retention", &fmt_pct(agg.avg_retention));
        kpi(
            &mut cols[1],
            "Avg Satisfaction",
            &fmt_pct(agg.avg_satisfaction),
        );
        kpi(
            &mut cols[2],
            "Total Enrolled",
            &agg.total_enrolled.to_string(),
        );
    });

    if agg.is_empty() {
        // Distinguish "nothing ticked" from filters that match no records.
        let msg = if state.selection.selects_nothing() {
            "No data selected."
        } else {
            "No records match the current filters."
        };
        ui.label(RichText::new(msg).italics().weak());
    }
}

fn kpi(ui: &mut Ui, label: &str, value: &str) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).heading().strong());
    });
}

// ---------------------------------------------------------------------------
// Chart 1 – retention trend by year (line)
// ---------------------------------------------------------------------------

fn retention_trend(ui: &mut Ui, state: &AppState, height: f32) {
    let points: PlotPoints = state
        .aggregates
        .retention_by_year
        .iter()
        .map(|&(year, rate)| [year as f64, rate])
        .collect();

    Plot::new("retention_trend")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Retention Rate (%)")
        .include_y(0.0)
        .include_y(100.0)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .name("Mean retention")
                    .color(Color32::LIGHT_BLUE)
                    .width(2.0),
            );
        });
}

// ---------------------------------------------------------------------------
// Chart 2 – satisfaction by year (bars)
// ---------------------------------------------------------------------------

fn satisfaction_bars(ui: &mut Ui, state: &AppState, height: f32) {
    let bars: Vec<Bar> = state
        .aggregates
        .satisfaction_by_year
        .iter()
        .map(|&(year, score)| Bar::new(year as f64, score).name(year.to_string()).width(0.6))
        .collect();

    Plot::new("satisfaction_by_year")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Satisfaction (%)")
        .include_y(0.0)
        .include_y(100.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name("Mean satisfaction")
                    .color(Color32::from_rgb(120, 180, 120)),
            );
        });
}

// ---------------------------------------------------------------------------
// Chart 3 – department share of enrollment (bars with percentages)
// ---------------------------------------------------------------------------

fn department_share(ui: &mut Ui, state: &AppState, height: f32) {
    let agg = &state.aggregates;
    let grand_total = agg.department_grand_total();

    let bars: Vec<Bar> = agg
        .department_totals
        .iter()
        .enumerate()
        .map(|(i, &(dept, total))| {
            let share = if grand_total == 0 {
                0.0
            } else {
                total as f64 / grand_total as f64 * 100.0
            };
            Bar::new(i as f64, share)
                .name(format!("{dept}: {total} ({share:.1} %)"))
                .width(0.6)
                .fill(color_for(&state.dept_colors, dept))
        })
        .collect();

    Plot::new("department_share")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Department")
        .y_axis_label("Share of enrollment (%)")
        .include_y(0.0)
        .show(ui, |plot_ui| {
            // One chart per bar so each department gets its own legend color.
            for bar in bars {
                let name = bar.name.clone();
                let color = bar.fill;
                plot_ui.bar_chart(BarChart::new(vec![bar]).name(name).color(color));
            }
        });
}
