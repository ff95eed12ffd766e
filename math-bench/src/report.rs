//! JSON result files
//!
//! Files are rewritten after every configuration through a temporary file
//! and a rename, so a reader never sees a truncated document. Entry keys keep
//! configuration order.

use crate::adapter::Phase;
use crate::driver::BenchmarkReport;
use crate::error::{BenchError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const FEM_RESULTS_FILE: &str = "FEM_results.json";
pub const PINN_PREDICTIONS_FILE: &str = "PINNs_predictions.json";
pub const PINN_EVALUATION_FILE: &str = "PINNs_evaluation.json";

/// One mesh size in `FEM_results.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FemEntry {
    pub u_pred: Vec<f64>,
    pub time_solve: f64,
    pub time_eval: f64,
    pub l2_rel: f64,
    pub trials: usize,
}

/// One architecture in `PINNs_predictions.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinnPrediction {
    pub u_pred: Vec<f64>,
    pub x: Vec<f64>,
    pub u_true: Vec<f64>,
}

/// One architecture in `PINNs_evaluation.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinnEvaluation {
    pub arch: Vec<usize>,
    pub time_adam: f64,
    pub time_lbfgs: f64,
    pub time_total: f64,
    pub time_eval: f64,
    pub l2_rel: f64,
    pub l2_rel_var: f64,
    pub trials: usize,
}

/// Serializes `(key, value)` pairs as a JSON object without reordering them
struct Ordered<'a, T>(&'a [(String, T)]);

impl<T: Serialize> Serialize for Ordered<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

/// `FEM_results.json` entries keyed by element count
pub fn fem_entries(report: &BenchmarkReport<usize>) -> Vec<(String, FemEntry)> {
    report
        .entries
        .iter()
        .map(|(n, s)| {
            let entry = FemEntry {
                u_pred: s.u_pred.clone(),
                time_solve: s.mean_time(Phase::Solve),
                time_eval: s.mean_time(Phase::Eval),
                l2_rel: s.l2_rel,
                trials: s.trials(),
            };
            (n.to_string(), entry)
        })
        .collect()
}

/// PINN prediction and evaluation entries keyed by position in the report
pub fn pinn_entries(
    report: &BenchmarkReport<Vec<usize>>,
) -> (Vec<(String, PinnPrediction)>, Vec<(String, PinnEvaluation)>) {
    report
        .entries
        .iter()
        .enumerate()
        .map(|(idx, (arch, s))| {
            let key = idx.to_string();
            let prediction = PinnPrediction {
                u_pred: s.u_pred.clone(),
                x: report.points.clone(),
                u_true: report.ground_truth.clone(),
            };
            let time_adam = s.mean_time(Phase::Adam);
            let time_lbfgs = s.mean_time(Phase::Lbfgs);
            let evaluation = PinnEvaluation {
                arch: arch.clone(),
                time_adam,
                time_lbfgs,
                time_total: time_adam + time_lbfgs,
                time_eval: s.mean_time(Phase::Eval),
                l2_rel: s.l2_rel,
                l2_rel_var: s.l2_rel_var,
                trials: s.trials(),
            };
            ((key.clone(), prediction), (key, evaluation))
        })
        .unzip()
}

/// Write `FEM_results.json` into `dir`
pub fn write_fem_results(dir: impl AsRef<Path>, report: &BenchmarkReport<usize>) -> Result<PathBuf> {
    let path = dir.as_ref().join(FEM_RESULTS_FILE);
    write_json_atomic(&path, &Ordered(&fem_entries(report)))?;
    log::debug!("wrote {} ({} entries)", path.display(), report.len());
    Ok(path)
}

/// Write `PINNs_predictions.json` and `PINNs_evaluation.json` into `dir`
///
/// Both documents are staged before either is renamed into place, so a
/// failed write leaves the previous pair untouched.
pub fn write_pinn_results(
    dir: impl AsRef<Path>,
    report: &BenchmarkReport<Vec<usize>>,
) -> Result<(PathBuf, PathBuf)> {
    let dir = dir.as_ref();
    let (predictions, evaluations) = pinn_entries(report);
    let predictions_path = dir.join(PINN_PREDICTIONS_FILE);
    let evaluation_path = dir.join(PINN_EVALUATION_FILE);

    let predictions_tmp = stage_json(&predictions_path, &Ordered(&predictions))?;
    let evaluation_tmp = match stage_json(&evaluation_path, &Ordered(&evaluations)) {
        Ok(tmp) => tmp,
        Err(e) => {
            discard(&predictions_tmp);
            return Err(e);
        }
    };
    if let Err(e) = commit(&predictions_tmp, &predictions_path) {
        discard(&predictions_tmp);
        discard(&evaluation_tmp);
        return Err(e);
    }
    commit(&evaluation_tmp, &evaluation_path).inspect_err(|_| discard(&evaluation_tmp))?;

    log::debug!("wrote {} and {}", predictions_path.display(), evaluation_path.display());
    Ok((predictions_path, evaluation_path))
}

/// Pretty-print `value` to `path` via a sibling temporary file
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let tmp = stage_json(path, value)?;
    commit(&tmp, path).inspect_err(|_| discard(&tmp))
}

/// Write `text` to `path` via a sibling temporary file
pub fn write_text_atomic(path: &Path, text: &str) -> Result<()> {
    let tmp = stage(path, |writer, tmp| {
        writer
            .write_all(text.as_bytes())
            .map_err(|e| BenchError::io(tmp, e))
    })?;
    commit(&tmp, path).inspect_err(|_| discard(&tmp))
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Fill the temporary sibling of `path` and return its location
fn stage<F>(path: &Path, fill: F) -> Result<PathBuf>
where
    F: FnOnce(&mut BufWriter<File>, &Path) -> Result<()>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| BenchError::io(parent, e))?;
    }

    let tmp = temporary_path(path);
    let file = File::create(&tmp).map_err(|e| BenchError::io(&tmp, e))?;
    let mut writer = BufWriter::new(file);
    let written = fill(&mut writer, &tmp)
        .and_then(|()| writer.flush().map_err(|e| BenchError::io(&tmp, e)));
    drop(writer);
    match written {
        Ok(()) => Ok(tmp),
        Err(e) => {
            discard(&tmp);
            Err(e)
        }
    }
}

fn stage_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<PathBuf> {
    stage(path, |writer, tmp| {
        serde_json::to_writer_pretty(writer, value).map_err(|e| BenchError::json(tmp, e))
    })
}

fn commit(tmp: &Path, path: &Path) -> Result<()> {
    fs::rename(tmp, path).map_err(|e| BenchError::io(path, e))
}

fn discard(tmp: &Path) {
    if let Err(e) = fs::remove_file(tmp) {
        log::warn!("could not remove {}: {e}", tmp.display());
    }
}

/// Read a result file back, entries sorted by their numeric key
pub fn read_entries<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<(String, T)>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| BenchError::io(path, e))?;
    let map: BTreeMap<String, T> =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| BenchError::json(path, e))?;
    let mut entries: Vec<(String, T)> = map.into_iter().collect();
    entries.sort_by_key(|(k, _)| k.parse::<u64>().unwrap_or(u64::MAX));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::ConfigurationSummary;
    use serde_json::Value;
    use tempfile::tempdir;

    fn summary(l2: f64, times: Vec<(Phase, f64)>) -> ConfigurationSummary {
        ConfigurationSummary {
            mean_times: times,
            l2_rel: l2,
            l2_rel_var: l2 / 10.0,
            u_pred: vec![0.0, 0.4, 0.37],
            trial_times: vec![0.1, 0.2],
        }
    }

    fn fem_report() -> BenchmarkReport<usize> {
        let mut report = BenchmarkReport::new(vec![0.0, 0.5, 1.0], vec![0.0, 0.39, 0.37]);
        for n in [512, 64, 1024] {
            let s = summary(1.0 / n as f64, vec![(Phase::Solve, 0.01), (Phase::Eval, 0.002)]);
            report.entries.push((n, s));
        }
        report
    }

    #[test]
    fn test_fem_file_format_keeps_configuration_order() {
        let dir = tempdir().unwrap();
        let path = write_fem_results(dir.path().join("results"), &fem_report()).unwrap();
        let text = fs::read_to_string(&path).unwrap();

        let first = text.find("\"512\"").unwrap();
        let second = text.find("\"64\"").unwrap();
        let third = text.find("\"1024\"").unwrap();
        assert!(first < second && second < third);

        let json: Value = serde_json::from_str(&text).unwrap();
        let entry = &json["64"];
        for key in ["u_pred", "time_solve", "time_eval", "l2_rel", "trials"] {
            assert!(entry.get(key).is_some(), "missing {key}");
        }
        assert_eq!(entry["trials"], 2);
        assert_eq!(entry["time_eval"], 0.002);
        assert!(!dir.path().join("results").join("FEM_results.json.tmp").exists());
    }

    #[test]
    fn test_pinn_files_format() {
        let dir = tempdir().unwrap();
        let mut report = BenchmarkReport::new(vec![0.0, 1.0], vec![0.0, 0.37]);
        let times = vec![(Phase::Adam, 3.0), (Phase::Lbfgs, 1.5), (Phase::Eval, 0.001)];
        report.entries.push((vec![1, 1], summary(0.2, times.clone())));
        report.entries.push((vec![8], summary(0.01, times)));

        let (pred_path, eval_path) = write_pinn_results(dir.path(), &report).unwrap();
        let preds: Value = serde_json::from_str(&fs::read_to_string(pred_path).unwrap()).unwrap();
        let evals: Value = serde_json::from_str(&fs::read_to_string(eval_path).unwrap()).unwrap();

        assert_eq!(preds["0"]["x"], serde_json::json!([0.0, 1.0]));
        assert_eq!(preds["1"]["u_true"], serde_json::json!([0.0, 0.37]));
        assert_eq!(evals["0"]["arch"], serde_json::json!([1, 1]));
        assert_eq!(evals["1"]["arch"], serde_json::json!([8]));
        assert_eq!(evals["1"]["time_total"], 4.5);
        for key in ["time_adam", "time_lbfgs", "time_eval", "l2_rel", "l2_rel_var", "trials"] {
            assert!(evals["0"].get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn test_read_entries_sorts_numerically() {
        let dir = tempdir().unwrap();
        let path = write_fem_results(dir.path(), &fem_report()).unwrap();
        let entries: Vec<(String, FemEntry)> = read_entries(&path).unwrap();
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["64", "512", "1024"]);
        assert_eq!(entries[0].1.trials, 2);
    }

    #[test]
    fn test_rewrite_replaces_previous_file() {
        let dir = tempdir().unwrap();
        let mut report = fem_report();
        write_fem_results(dir.path(), &report).unwrap();
        report.entries.truncate(1);
        let path = write_fem_results(dir.path(), &report).unwrap();
        let entries: Vec<(String, FemEntry)> = read_entries(&path).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_unwritable_directory_is_io_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();
        let err = write_fem_results(blocker.join("results"), &fem_report()).unwrap_err();
        assert!(err.is_io_error());
    }

    #[test]
    fn test_failed_pinn_write_keeps_previous_pair() {
        let dir = tempdir().unwrap();
        let times = vec![(Phase::Adam, 1.0), (Phase::Lbfgs, 0.5), (Phase::Eval, 0.001)];
        let mut report = BenchmarkReport::new(vec![0.0, 1.0], vec![0.0, 0.37]);
        report.entries.push((vec![4], summary(0.1, times.clone())));
        let (pred_path, eval_path) = write_pinn_results(dir.path(), &report).unwrap();
        let previous = fs::read_to_string(&pred_path).unwrap();

        fs::create_dir(dir.path().join("PINNs_evaluation.json.tmp")).unwrap();
        report.entries.push((vec![8, 8], summary(0.01, times)));
        let err = write_pinn_results(dir.path(), &report).unwrap_err();
        assert!(err.is_io_error());

        assert_eq!(fs::read_to_string(&pred_path).unwrap(), previous);
        assert!(!dir.path().join("PINNs_predictions.json.tmp").exists());
        let evaluations: Vec<(String, PinnEvaluation)> = read_entries(&eval_path).unwrap();
        assert_eq!(evaluations.len(), 1);
    }

    #[test]
    fn test_text_write_replaces_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fig").join("plot.html");
        write_text_atomic(&path, "<html>first</html>").unwrap();
        write_text_atomic(&path, "<html>second</html>").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<html>second</html>");
        assert!(!dir.path().join("fig").join("plot.html.tmp").exists());
    }
}
