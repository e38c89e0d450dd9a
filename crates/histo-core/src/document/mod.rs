//! JSON documents describing a single-spectrum workspace.

mod text;

pub use text::{normalize_text_artifact, write_text_artifact};

use crate::domain::{HistoError, HistoResult, XMode, YMode};
use crate::histogram::{Histogram, HistogramBuffer};
use crate::workspace::Workspace1D;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Serialized form of a [`Workspace1D`].
///
/// Non-finite values in any array are written as `null` and read back as NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceDocument {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub spectrum_number: i32,
    #[serde(default)]
    pub detector_ids: Vec<i32>,
    #[serde(default)]
    pub x_mode: XMode,
    pub y_mode: YMode,
    #[serde(with = "nullable_values")]
    pub x: Vec<f64>,
    #[serde(with = "nullable_values")]
    pub y: Vec<f64>,
    #[serde(with = "nullable_values")]
    pub e: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty", with = "nullable_values")]
    pub dx: Vec<f64>,
}

impl WorkspaceDocument {
    /// Captures the workspace's histogram view; event data is binned first.
    pub fn from_workspace(workspace: &Workspace1D) -> HistoResult<Self> {
        let histogram = workspace.histogram()?;
        let info = workspace.spectrum().info();
        Ok(Self {
            title: workspace.title().to_string(),
            spectrum_number: info.spectrum_number(),
            detector_ids: info.detector_ids().iter().copied().collect(),
            x_mode: histogram.x_mode(),
            y_mode: histogram.y_mode(),
            x: histogram.x().to_vec(),
            y: histogram.y().to_vec(),
            e: histogram.e().to_vec(),
            dx: histogram.dx().to_vec(),
        })
    }

    pub fn into_workspace(self) -> HistoResult<Workspace1D> {
        let dx = (!self.dx.is_empty()).then(|| HistogramBuffer::new(self.dx));
        let histogram =
            Histogram::from_parts(self.x_mode, self.y_mode, self.x, self.y, self.e, dx)?;
        let mut workspace = Workspace1D::from_histogram(histogram)?.with_title(self.title);
        let info = workspace.spectrum_mut().info_mut();
        info.set_spectrum_number(self.spectrum_number);
        info.add_detector_ids(self.detector_ids);
        Ok(workspace)
    }

    pub fn from_json(content: &str) -> HistoResult<Self> {
        serde_json::from_str(content).map_err(|error| {
            HistoError::invalid_argument(
                "DOCUMENT.PARSE",
                format!("invalid workspace document: {error}"),
            )
        })
    }

    pub fn to_json(&self) -> HistoResult<String> {
        serde_json::to_string_pretty(self).map_err(|error| {
            HistoError::invalid_argument(
                "DOCUMENT.SERIALIZE",
                format!("failed to serialize workspace document: {error}"),
            )
        })
    }
}

pub fn load_workspace(path: &Path) -> HistoResult<Workspace1D> {
    let content = fs::read_to_string(path).map_err(|error| {
        HistoError::io(
            "DOCUMENT.READ",
            format!("failed to read '{}': {error}", path.display()),
        )
    })?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "loaded workspace document");
    WorkspaceDocument::from_json(&content)?.into_workspace()
}

pub fn save_workspace(path: &Path, workspace: &Workspace1D) -> HistoResult<()> {
    let content = WorkspaceDocument::from_workspace(workspace)?.to_json()?;
    write_text_artifact(path, &content).map_err(|error| {
        HistoError::io(
            "DOCUMENT.WRITE",
            format!("failed to write '{}': {error}", path.display()),
        )
    })?;
    tracing::debug!(path = %path.display(), "saved workspace document");
    Ok(())
}

mod nullable_values {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|value| value.is_finite().then_some(*value)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        let values = Vec::<Option<f64>>::deserialize(deserializer)?;
        Ok(values
            .into_iter()
            .map(|value| value.unwrap_or(f64::NAN))
            .collect())
    }
}
