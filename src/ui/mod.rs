/// UI layer: filter panels and the central KPI/chart dashboard.
pub mod charts;
pub mod panels;
