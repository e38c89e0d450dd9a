//! Workspaces: the unit passed between algorithms by name.

mod triple;

pub use triple::{Triple, TripleIter};

use crate::domain::{HistoResult, XMode, YMode};
use crate::histogram::Histogram;
use crate::spectrum::{HistogramSpectrum, Spectrum};
use std::any::Any;
use std::borrow::Cow;
use std::fmt::Debug;
use std::sync::Arc;

/// Block size reported by a workspace that holds no data yet.
///
/// Consumers compare against this value to mean "no uniform block size is
/// known"; keep it at `1_000_000_000`.
pub const UNBOUNDED_BLOCKSIZE: usize = 1_000_000_000;

/// Behaviour shared by every concrete workspace type.
pub trait Workspace: Any + Debug + Send + Sync {
    /// Name of the concrete workspace type.
    fn id(&self) -> &'static str;

    fn title(&self) -> &str;

    fn size(&self) -> usize;

    fn blocksize(&self) -> usize;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// A workspace owning exactly one spectrum.
///
/// Cloning copies the spectrum by value; histogram buffers beneath it stay
/// shared until one side writes to them.
#[derive(Debug, Clone, PartialEq)]
pub struct Workspace1D {
    title: String,
    spectrum: Spectrum,
}

impl Workspace1D {
    pub fn new(x_mode: XMode, y_mode: YMode) -> HistoResult<Self> {
        Ok(Self::from_spectrum(HistogramSpectrum::new(x_mode, y_mode)?))
    }

    pub fn from_spectrum(spectrum: impl Into<Spectrum>) -> Self {
        Self {
            title: String::new(),
            spectrum: spectrum.into(),
        }
    }

    pub fn from_histogram(histogram: Histogram) -> HistoResult<Self> {
        Ok(Self::from_spectrum(HistogramSpectrum::from_histogram(histogram)?))
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn spectrum(&self) -> &Spectrum {
        &self.spectrum
    }

    pub fn spectrum_mut(&mut self) -> &mut Spectrum {
        &mut self.spectrum
    }

    /// Histogram view of the owned spectrum.
    pub fn histogram(&self) -> HistoResult<Histogram> {
        self.spectrum.histogram()
    }

    /// Number of Y values in the spectrum.
    pub fn size(&self) -> usize {
        self.spectrum.size()
    }

    /// Length of each data block, or [`UNBOUNDED_BLOCKSIZE`] while empty.
    pub fn blocksize(&self) -> usize {
        match self.size() {
            0 => UNBOUNDED_BLOCKSIZE,
            size => size,
        }
    }

    /// Replaces this workspace's contents with a copy of `other`.
    pub fn assign_from(&mut self, other: &Self) {
        self.clone_from(other);
    }

    /// Iterates over `(x, y, e)` per bin; X is the left bin edge for bin-edge data.
    pub fn iter(&self) -> HistoResult<TripleIter<'_>> {
        let histogram = match &self.spectrum {
            Spectrum::Histogram(spectrum) => Cow::Borrowed(spectrum.histogram()),
            Spectrum::Event(spectrum) => Cow::Owned(spectrum.histogram()?),
        };
        Ok(TripleIter::new(histogram))
    }
}

impl Workspace for Workspace1D {
    fn id(&self) -> &'static str {
        "Workspace1D"
    }

    fn title(&self) -> &str {
        Workspace1D::title(self)
    }

    fn size(&self) -> usize {
        Workspace1D::size(self)
    }

    fn blocksize(&self) -> usize {
        Workspace1D::blocksize(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{UNBOUNDED_BLOCKSIZE, Workspace, Workspace1D};
    use crate::domain::{XMode, YMode};
    use crate::histogram::Histogram;
    use crate::spectrum::{EventSpectrum, Spectrum};

    fn populated() -> Workspace1D {
        let histogram = Histogram::from_parts(
            XMode::BinEdges,
            YMode::Counts,
            [0.0, 1.0, 2.0, 3.0],
            [1.0, 2.0, 3.0],
            [1.0, 1.41, 1.73],
            None,
        )
        .expect("histogram should build");
        Workspace1D::from_histogram(histogram)
            .expect("workspace should build")
            .with_title("run 42")
    }

    fn y_values(workspace: &Workspace1D) -> Vec<f64> {
        workspace.histogram().expect("histogram view").y().to_vec()
    }

    #[test]
    fn empty_workspace_reports_unbounded_blocksize() {
        let workspace =
            Workspace1D::new(XMode::BinEdges, YMode::Counts).expect("workspace should build");
        assert_eq!(workspace.size(), 0);
        assert_eq!(workspace.blocksize(), UNBOUNDED_BLOCKSIZE);
        assert_eq!(UNBOUNDED_BLOCKSIZE, 1_000_000_000);
    }

    #[test]
    fn blocksize_tracks_size_once_populated() {
        let histogram =
            Histogram::from_parts(XMode::Points, YMode::Counts, [0.5], [4.0], [2.0], None)
                .expect("histogram should build");
        let workspace = Workspace1D::from_histogram(histogram).expect("workspace should build");
        assert_eq!(workspace.size(), 1);
        assert_eq!(workspace.blocksize(), 1);
        assert_eq!(populated().blocksize(), 3);
    }

    #[test]
    fn clone_and_assignment_are_independent_copies() {
        let original = populated();
        let mut copy = original.clone();
        let mut assigned =
            Workspace1D::new(XMode::Points, YMode::Frequencies).expect("workspace should build");
        assigned.assign_from(&original);
        assert_eq!(assigned, original);

        copy.spectrum_mut().clear_data();
        assigned
            .spectrum_mut()
            .apply_bin_weight(0, 1.0)
            .expect("bin 0 exists");

        assert_eq!(y_values(&original), vec![1.0, 2.0, 3.0]);
        assert_eq!(y_values(&copy), vec![0.0, 0.0, 0.0]);
        assert_eq!(y_values(&assigned), vec![0.0, 2.0, 3.0]);
        assert_eq!(assigned.title(), "run 42");
    }

    #[test]
    fn triples_walk_every_bin() {
        let workspace = populated();
        let triples = workspace
            .iter()
            .expect("histogram backed")
            .map(|triple| (triple.x, triple.y, triple.e))
            .collect::<Vec<_>>();
        assert_eq!(
            triples,
            vec![(0.0, 1.0, 1.0), (1.0, 2.0, 1.41), (2.0, 3.0, 1.73)]
        );
    }

    #[test]
    fn triple_count_matches_the_shortest_array() {
        let mut workspace = populated();
        workspace
            .spectrum_mut()
            .as_histogram_mut()
            .expect("histogram backed")
            .histogram_mut()
            .set_e([0.5]);

        let triples = workspace.iter().expect("histogram backed");
        assert_eq!(triples.len(), 1);
        assert_eq!(triples.count(), 1);
    }

    #[test]
    fn event_backed_workspace_iterates_binned_data() {
        let mut events = EventSpectrum::new([0.0, 1.0, 2.0]);
        events.add_event(1.25);
        let workspace = Workspace1D::from_spectrum(Spectrum::from(events));

        assert_eq!(workspace.size(), 2);
        let ys = workspace
            .iter()
            .expect("events bin")
            .map(|triple| triple.y)
            .collect::<Vec<_>>();
        assert_eq!(ys, vec![0.0, 1.0]);
    }

    #[test]
    fn workspace_trait_exposes_identity_and_downcast() {
        let workspace = populated();
        let dynamic: &dyn Workspace = &workspace;
        assert_eq!(dynamic.id(), "Workspace1D");
        assert_eq!(dynamic.title(), "run 42");
        assert_eq!(dynamic.blocksize(), 3);
        assert!(dynamic.as_any().downcast_ref::<Workspace1D>().is_some());
    }
}
