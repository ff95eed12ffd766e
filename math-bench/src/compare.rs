//! Accuracy versus cost comparison of the two methods
//!
//! Reads the FEM and PINN result files of an output directory, prints a
//! table and writes two scatter plots: relative L2 error against
//! solve/training time and against evaluation time.

use crate::error::{BenchError, Result};
use crate::report::{self, FEM_RESULTS_FILE, FemEntry, PINN_EVALUATION_FILE, PinnEvaluation};
use plotly::{
    Layout, Plot, Scatter,
    common::{Marker, MarkerSymbol, Mode, Title},
    layout::{Axis, AxisType},
};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const SOLVING_TIME_PLOT: &str = "solving_time-error.html";
pub const EVALUATION_TIME_PLOT: &str = "evaluation_time-error.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Fem,
    Pinn,
}

/// One configuration of either method
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub method: Method,
    pub label: String,
    pub l2_rel: f64,
    /// FEM solve time or PINN training time (Adam + L-BFGS), seconds
    pub time_solve: f64,
    pub time_eval: f64,
}

impl ComparisonRow {
    fn from_fem(n: &str, e: &FemEntry) -> Self {
        Self {
            method: Method::Fem,
            label: format!("FEM, n={n}"),
            l2_rel: e.l2_rel,
            time_solve: e.time_solve,
            time_eval: e.time_eval,
        }
    }

    fn from_pinn(e: &PinnEvaluation) -> Self {
        Self {
            method: Method::Pinn,
            label: format!("PINNs, {:?}", e.arch),
            l2_rel: e.l2_rel,
            time_solve: e.time_total,
            time_eval: e.time_eval,
        }
    }
}

/// Load every row found in `dir`
///
/// A missing result file for one method is skipped with a warning; if neither
/// exists the error is returned.
pub fn load_rows(dir: impl AsRef<Path>) -> Result<Vec<ComparisonRow>> {
    let dir = dir.as_ref();
    let fem_path = dir.join(FEM_RESULTS_FILE);
    let pinn_path = dir.join(PINN_EVALUATION_FILE);

    if !fem_path.exists() && !pinn_path.exists() {
        return Err(BenchError::io(
            dir,
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("neither {FEM_RESULTS_FILE} nor {PINN_EVALUATION_FILE} found"),
            ),
        ));
    }

    let mut rows = Vec::new();
    if fem_path.exists() {
        let entries: Vec<(String, FemEntry)> = report::read_entries(&fem_path)?;
        rows.extend(entries.iter().map(|(n, e)| ComparisonRow::from_fem(n, e)));
    } else {
        log::warn!("{} not found, comparing PINN results only", fem_path.display());
    }
    if pinn_path.exists() {
        let entries: Vec<(String, PinnEvaluation)> = report::read_entries(&pinn_path)?;
        rows.extend(entries.iter().map(|(_, e)| ComparisonRow::from_pinn(e)));
    } else {
        log::warn!("{} not found, comparing FEM results only", pinn_path.display());
    }
    Ok(rows)
}

/// Fixed-width text table of comparison rows
pub struct Table<'a>(pub &'a [ComparisonRow]);

impl fmt::Display for Table<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<24} {:>12} {:>14} {:>14}",
            "configuration", "l2_rel", "solve/train s", "eval s"
        )?;
        writeln!(f, "{}", "-".repeat(67))?;
        for row in self.0 {
            writeln!(
                f,
                "{:<24} {:>12.4e} {:>14.6} {:>14.6}",
                row.label, row.l2_rel, row.time_solve, row.time_eval
            )?;
        }
        Ok(())
    }
}

pub fn format_table(rows: &[ComparisonRow]) -> String {
    Table(rows).to_string()
}

fn scatter_plot(rows: &[ComparisonRow], time: impl Fn(&ComparisonRow) -> f64, y_title: &str, title: &str) -> Plot {
    let mut plot = Plot::new();
    for row in rows {
        let symbol = match row.method {
            Method::Fem => MarkerSymbol::TriangleUp,
            Method::Pinn => MarkerSymbol::Circle,
        };
        let trace = Scatter::new(vec![row.l2_rel], vec![time(row)])
            .mode(Mode::Markers)
            .name(&row.label)
            .marker(Marker::new().size(12).symbol(symbol));
        plot.add_trace(trace);
    }

    let layout = Layout::new()
        .title(Title::with_text(title))
        .x_axis(
            Axis::new()
                .title(Title::with_text("Relative L2 Error"))
                .type_(AxisType::Log),
        )
        .y_axis(Axis::new().title(Title::with_text(y_title)).type_(AxisType::Log));
    plot.set_layout(layout);
    plot
}

/// Write both scatter plots into `fig_dir`, returning their paths
pub fn write_plots(rows: &[ComparisonRow], fig_dir: impl AsRef<Path>) -> Result<(PathBuf, PathBuf)> {
    let fig_dir = fig_dir.as_ref();
    fs::create_dir_all(fig_dir).map_err(|e| BenchError::io(fig_dir, e))?;

    let solving = fig_dir.join(SOLVING_TIME_PLOT);
    let html = scatter_plot(
        rows,
        |r| r.time_solve,
        "Training / Solving Time (seconds)",
        "Relative L2 Error vs. Training/Solving Time",
    )
    .to_html();
    report::write_text_atomic(&solving, &html)?;

    let evaluation = fig_dir.join(EVALUATION_TIME_PLOT);
    let html = scatter_plot(
        rows,
        |r| r.time_eval,
        "Evaluation Time (seconds)",
        "Relative L2 Error vs. Evaluation Time",
    )
    .to_html();
    report::write_text_atomic(&evaluation, &html)?;

    log::info!("wrote {} and {}", solving.display(), evaluation.display());
    Ok((solving, evaluation))
}
