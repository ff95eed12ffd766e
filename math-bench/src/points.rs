//! Evaluation point sets
//!
//! Every configuration of a run is scored on the same points, loaded once
//! from a JSON file that holds either a bare array or `{"x": [...]}`.

use crate::error::{BenchError, Result};
use crate::problem::domain;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum PointsFile {
    Plain(Vec<f64>),
    Keyed { x: Vec<f64> },
}

/// Ordered, validated sample of the problem domain
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationPoints {
    values: Vec<f64>,
}

impl EvaluationPoints {
    /// Validate a point list: non-empty, finite and inside the domain
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(BenchError::points("point set is empty"));
        }
        let (a, b) = domain();
        if let Some((i, x)) = values
            .iter()
            .enumerate()
            .find(|&(_, x)| !x.is_finite() || *x < a || *x > b)
        {
            return Err(BenchError::points(format!(
                "point #{i} = {x} is not a finite value in [{a}, {b}]"
            )));
        }
        Ok(Self { values })
    }

    /// `n + 1` equally spaced points covering the domain, end points included
    pub fn uniform(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(BenchError::points("a uniform grid needs at least one interval"));
        }
        Self::new(uniform_grid(n))
    }

    /// Load points from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            BenchError::points(format!("cannot open {}: {e}", path.display()))
        })?;
        let parsed: PointsFile = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            BenchError::points(format!("cannot parse {}: {e}", path.display()))
        })?;
        let values = match parsed {
            PointsFile::Plain(values) | PointsFile::Keyed { x: values } => values,
        };
        let points = Self::new(values)?;
        log::info!("loaded {} evaluation points from {}", points.len(), path.display());
        Ok(points)
    }

    /// Write the points as a pretty JSON array, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| BenchError::io(parent, e))?;
        }
        let file = File::create(path).map_err(|e| BenchError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.values)
            .map_err(|e| BenchError::json(path, e))?;
        writer.flush().map_err(|e| BenchError::io(path, e))?;
        Ok(())
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// `n + 1` equally spaced points on [0, 1], both end points included exactly
pub fn uniform_grid(n: usize) -> Vec<f64> {
    if n == 0 {
        return vec![0.0];
    }
    (0..=n).map(|i| i as f64 / n as f64).collect()
}
