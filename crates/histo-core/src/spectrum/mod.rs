//! Histogram-backed and event-backed spectra.
//!
//! Copying data between spectra is double dispatched: the sink asks the
//! source to copy itself into the sink's concrete representation, so the
//! source decides whether that is a plain histogram assignment or a binning
//! step.

mod events;

pub use events::{EventSpectrum, WeightedEvent};

use crate::domain::{HistoError, HistoResult, XMode, YMode};
use crate::histogram::{Histogram, check_and_sanitize};
use std::collections::BTreeSet;

/// Spectrum number and the detectors that contribute to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpectrumInfo {
    spectrum_number: i32,
    detector_ids: BTreeSet<i32>,
}

impl SpectrumInfo {
    pub fn new(spectrum_number: i32) -> Self {
        Self {
            spectrum_number,
            detector_ids: BTreeSet::new(),
        }
    }

    pub const fn spectrum_number(&self) -> i32 {
        self.spectrum_number
    }

    pub fn set_spectrum_number(&mut self, spectrum_number: i32) {
        self.spectrum_number = spectrum_number;
    }

    pub fn detector_ids(&self) -> &BTreeSet<i32> {
        &self.detector_ids
    }

    pub fn add_detector_id(&mut self, detector_id: i32) {
        self.detector_ids.insert(detector_id);
    }

    pub fn add_detector_ids(&mut self, detector_ids: impl IntoIterator<Item = i32>) {
        self.detector_ids.extend(detector_ids);
    }

    pub fn has_detector_id(&self, detector_id: i32) -> bool {
        self.detector_ids.contains(&detector_id)
    }

    pub fn clear_detector_ids(&mut self) {
        self.detector_ids.clear();
    }
}

/// Something whose data can be materialized into either spectrum representation.
pub trait SpectrumSource {
    fn copy_data_into_histogram(&self, sink: &mut HistogramSpectrum) -> HistoResult<()>;

    fn copy_data_into_events(&self, sink: &mut EventSpectrum) -> HistoResult<()>;
}

/// Spectrum that stores its data directly as a [`Histogram`].
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSpectrum {
    info: SpectrumInfo,
    histogram: Histogram,
}

impl HistogramSpectrum {
    pub fn new(x_mode: XMode, y_mode: YMode) -> HistoResult<Self> {
        Ok(Self {
            info: SpectrumInfo::default(),
            histogram: Histogram::new(x_mode, y_mode)?,
        })
    }

    pub fn from_histogram(histogram: Histogram) -> HistoResult<Self> {
        check_and_sanitize(&histogram)?;
        Ok(Self {
            info: SpectrumInfo::default(),
            histogram,
        })
    }

    pub fn info(&self) -> &SpectrumInfo {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut SpectrumInfo {
        &mut self.info
    }

    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    pub fn histogram_mut(&mut self) -> &mut Histogram {
        &mut self.histogram
    }

    pub fn set_histogram(&mut self, histogram: Histogram) -> HistoResult<()> {
        check_and_sanitize(&histogram)?;
        self.histogram = histogram;
        Ok(())
    }

    pub fn copy_data_from(&mut self, source: &impl SpectrumSource) -> HistoResult<()> {
        source.copy_data_into_histogram(self)
    }

    pub fn size(&self) -> usize {
        self.histogram.size()
    }

    pub fn clear_data(&mut self) {
        self.histogram.clear_data();
    }

    pub fn apply_bin_weight(&mut self, bin_index: usize, weight: f64) -> HistoResult<()> {
        self.histogram.apply_bin_weight(bin_index, weight)
    }
}

impl SpectrumSource for HistogramSpectrum {
    fn copy_data_into_histogram(&self, sink: &mut HistogramSpectrum) -> HistoResult<()> {
        sink.histogram = self.histogram.clone();
        Ok(())
    }

    fn copy_data_into_events(&self, _sink: &mut EventSpectrum) -> HistoResult<()> {
        Err(HistoError::logic(
            "SPECTRUM.UNSUPPORTED_COPY",
            "histogram data cannot be copied into an event list",
        ))
    }
}

/// The closed set of spectrum representations.
#[derive(Debug, Clone, PartialEq)]
pub enum Spectrum {
    Histogram(HistogramSpectrum),
    Event(EventSpectrum),
}

impl Spectrum {
    /// Replaces this spectrum's data with `source`'s, converting as the source requires.
    ///
    /// Spectrum number and detector IDs of `self` are left untouched.
    pub fn copy_data_from(&mut self, source: &Spectrum) -> HistoResult<()> {
        source.copy_data_into(self)
    }

    pub fn copy_data_into(&self, sink: &mut Spectrum) -> HistoResult<()> {
        tracing::trace!(
            source = self.kind(),
            sink = sink.kind(),
            "copying spectrum data"
        );
        match sink {
            Self::Histogram(sink) => self.copy_data_into_histogram(sink),
            Self::Event(sink) => self.copy_data_into_events(sink),
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Histogram(_) => "histogram",
            Self::Event(_) => "event",
        }
    }

    pub fn info(&self) -> &SpectrumInfo {
        match self {
            Self::Histogram(spectrum) => spectrum.info(),
            Self::Event(spectrum) => spectrum.info(),
        }
    }

    pub fn info_mut(&mut self) -> &mut SpectrumInfo {
        match self {
            Self::Histogram(spectrum) => spectrum.info_mut(),
            Self::Event(spectrum) => spectrum.info_mut(),
        }
    }

    pub fn spectrum_number(&self) -> i32 {
        self.info().spectrum_number()
    }

    pub fn size(&self) -> usize {
        match self {
            Self::Histogram(spectrum) => spectrum.size(),
            Self::Event(spectrum) => spectrum.size(),
        }
    }

    /// Histogram view of the data; event spectra are binned on their bin edges.
    pub fn histogram(&self) -> HistoResult<Histogram> {
        match self {
            Self::Histogram(spectrum) => Ok(spectrum.histogram().clone()),
            Self::Event(spectrum) => spectrum.histogram(),
        }
    }

    pub fn as_histogram(&self) -> Option<&HistogramSpectrum> {
        match self {
            Self::Histogram(spectrum) => Some(spectrum),
            Self::Event(_) => None,
        }
    }

    pub fn as_histogram_mut(&mut self) -> Option<&mut HistogramSpectrum> {
        match self {
            Self::Histogram(spectrum) => Some(spectrum),
            Self::Event(_) => None,
        }
    }

    pub fn as_events(&self) -> Option<&EventSpectrum> {
        match self {
            Self::Event(spectrum) => Some(spectrum),
            Self::Histogram(_) => None,
        }
    }

    pub fn clear_data(&mut self) {
        match self {
            Self::Histogram(spectrum) => spectrum.clear_data(),
            Self::Event(spectrum) => spectrum.clear_data(),
        }
    }

    pub fn apply_bin_weight(&mut self, bin_index: usize, weight: f64) -> HistoResult<()> {
        match self {
            Self::Histogram(spectrum) => spectrum.apply_bin_weight(bin_index, weight),
            Self::Event(spectrum) => spectrum.apply_bin_weight(bin_index, weight),
        }
    }
}

impl SpectrumSource for Spectrum {
    fn copy_data_into_histogram(&self, sink: &mut HistogramSpectrum) -> HistoResult<()> {
        match self {
            Self::Histogram(source) => source.copy_data_into_histogram(sink),
            Self::Event(source) => source.copy_data_into_histogram(sink),
        }
    }

    fn copy_data_into_events(&self, sink: &mut EventSpectrum) -> HistoResult<()> {
        match self {
            Self::Histogram(source) => source.copy_data_into_events(sink),
            Self::Event(source) => source.copy_data_into_events(sink),
        }
    }
}

impl From<HistogramSpectrum> for Spectrum {
    fn from(spectrum: HistogramSpectrum) -> Self {
        Self::Histogram(spectrum)
    }
}

impl From<EventSpectrum> for Spectrum {
    fn from(spectrum: EventSpectrum) -> Self {
        Self::Event(spectrum)
    }
}
