//! Shareable histogram data model for neutron and muon instrument data.
//!
//! Histogram arrays are reference counted and copied on write, histograms
//! carry counts or frequencies, spectra wrap either a histogram or an event
//! list, and workspaces are handed between algorithms through name-keyed,
//! type-checked properties.

pub mod document;
pub mod domain;
pub mod histogram;
pub mod property;
pub mod registry;
pub mod spectrum;
pub mod workspace;

pub use domain::{Direction, HistoError, HistoErrorCategory, HistoResult, XMode, YMode};
pub use histogram::{Histogram, HistogramBuffer, check_and_sanitize};
pub use property::{PropertyManager, WorkspaceProperty, WorkspaceRef};
pub use registry::{InMemoryWorkspaceRegistry, WorkspaceRegistry};
pub use spectrum::{EventSpectrum, HistogramSpectrum, Spectrum, SpectrumInfo, SpectrumSource};
pub use workspace::{UNBOUNDED_BLOCKSIZE, Workspace, Workspace1D};
