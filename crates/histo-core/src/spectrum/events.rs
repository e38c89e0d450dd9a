use super::{HistogramSpectrum, SpectrumInfo, SpectrumSource};
use crate::domain::{HistoError, HistoResult, XMode, YMode};
use crate::histogram::{Histogram, HistogramBuffer, masked_value};

/// A single detected neutron, carrying its weight and squared uncertainty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedEvent {
    pub tof: f64,
    pub weight: f64,
    pub error_squared: f64,
}

impl WeightedEvent {
    pub const fn new(tof: f64) -> Self {
        Self {
            tof,
            weight: 1.0,
            error_squared: 1.0,
        }
    }

    pub const fn weighted(tof: f64, weight: f64, error_squared: f64) -> Self {
        Self {
            tof,
            weight,
            error_squared,
        }
    }
}

/// Spectrum that keeps raw events and histograms them on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSpectrum {
    info: SpectrumInfo,
    events: Vec<WeightedEvent>,
    bin_edges: HistogramBuffer,
}

impl EventSpectrum {
    pub fn new(bin_edges: impl Into<HistogramBuffer>) -> Self {
        Self {
            info: SpectrumInfo::default(),
            events: Vec::new(),
            bin_edges: bin_edges.into(),
        }
    }

    pub fn info(&self) -> &SpectrumInfo {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut SpectrumInfo {
        &mut self.info
    }

    pub fn events(&self) -> &[WeightedEvent] {
        &self.events
    }

    pub fn add_event(&mut self, tof: f64) {
        self.events.push(WeightedEvent::new(tof));
    }

    pub fn add_weighted_event(&mut self, tof: f64, weight: f64, error_squared: f64) {
        self.events
            .push(WeightedEvent::weighted(tof, weight, error_squared));
    }

    pub fn bin_edges(&self) -> &HistogramBuffer {
        &self.bin_edges
    }

    pub fn set_bin_edges(&mut self, bin_edges: impl Into<HistogramBuffer>) {
        self.bin_edges = bin_edges.into();
    }

    /// Number of bins described by the bin edges.
    pub fn size(&self) -> usize {
        self.bin_edges.len().saturating_sub(1)
    }

    /// Bins the events on this spectrum's own bin edges.
    pub fn histogram(&self) -> HistoResult<Histogram> {
        self.histogram_on(&self.bin_edges)
    }

    fn histogram_on(&self, edges: &HistogramBuffer) -> HistoResult<Histogram> {
        let edges = if edges.len() < 2 {
            HistogramBuffer::default()
        } else {
            edges.clone()
        };
        let bins = edges.len().saturating_sub(1);
        let mut counts = vec![0.0; bins];
        let mut errors_squared = vec![0.0; bins];

        for event in &self.events {
            if let Some(bin) = bin_index(edges.get(), event.tof) {
                counts[bin] += event.weight;
                errors_squared[bin] += event.error_squared;
            }
        }

        let errors = errors_squared.into_iter().map(f64::sqrt).collect::<Vec<_>>();
        Histogram::from_parts(XMode::BinEdges, YMode::Counts, edges, counts, errors, None)
    }

    /// Removes every event; the bin edges stay.
    pub fn clear_data(&mut self) {
        self.events.clear();
    }

    /// Scales the weight of every event falling into `bin_index`.
    pub fn apply_bin_weight(&mut self, bin_index: usize, weight: f64) -> HistoResult<()> {
        if !(0.0..=1.0).contains(&weight) {
            return Err(HistoError::invalid_argument(
                "SPECTRUM.BIN_WEIGHT",
                format!("bin weight {weight} is outside [0, 1]"),
            ));
        }
        let size = self.size();
        if bin_index >= size {
            return Err(HistoError::index("SPECTRUM.BIN_INDEX", bin_index, size));
        }
        if weight == 0.0 {
            return Ok(());
        }

        let (low, high) = (self.bin_edges.get()[bin_index], self.bin_edges.get()[bin_index + 1]);
        for event in self
            .events
            .iter_mut()
            .filter(|event| event.tof >= low && event.tof < high)
        {
            event.weight = masked_value(event.weight, weight);
            event.error_squared = masked_value(event.error_squared, 1.0 - (1.0 - weight).powi(2));
        }
        Ok(())
    }
}

impl SpectrumSource for EventSpectrum {
    fn copy_data_into_histogram(&self, sink: &mut HistogramSpectrum) -> HistoResult<()> {
        let target = sink.histogram();
        if target.x_mode() != XMode::BinEdges {
            return Err(HistoError::logic(
                "SPECTRUM.UNSUPPORTED_COPY",
                "events can only be binned into a histogram with bin edges",
            ));
        }
        let binned = self.histogram_on(target.shared_x())?;
        sink.set_histogram(binned)
    }

    fn copy_data_into_events(&self, sink: &mut EventSpectrum) -> HistoResult<()> {
        sink.events = self.events.clone();
        sink.bin_edges = self.bin_edges.clone();
        Ok(())
    }
}

/// Half-open bin lookup: `edges[i] <= tof < edges[i + 1]`.
fn bin_index(edges: &[f64], tof: f64) -> Option<usize> {
    let (first, last) = (*edges.first()?, *edges.last()?);
    if !(first..last).contains(&tof) {
        return None;
    }
    Some(edges.partition_point(|edge| *edge <= tof) - 1)
}
