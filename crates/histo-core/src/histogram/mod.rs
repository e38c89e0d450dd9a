//! X/Y/E/Dx histogram container with counts/frequencies Y semantics.

pub mod buffer;

pub use buffer::HistogramBuffer;

use crate::domain::{HistoError, HistoResult, XMode, YMode};

/// One spectrum's worth of data: X bin edges or points, Y values, E
/// uncertainties and optional X resolution (Dx).
///
/// All four arrays live in [`HistogramBuffer`]s, so cloning a histogram is
/// cheap and mutation detaches only the buffer that is written to. The Y mode
/// is fixed at construction and decides which of the counts or frequencies
/// accessors are available.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    x_mode: XMode,
    y_mode: YMode,
    x: HistogramBuffer,
    y: Option<HistogramBuffer>,
    e: Option<HistogramBuffer>,
    dx: Option<HistogramBuffer>,
}

impl Histogram {
    /// Empty histogram with zero-length Y and E consistent with `y_mode`.
    pub fn new(x_mode: XMode, y_mode: YMode) -> HistoResult<Self> {
        if y_mode == YMode::Uninitialized {
            return Err(HistoError::logic(
                "HISTOGRAM.UNINITIALIZED_Y_MODE",
                "Y mode must be Counts or Frequencies",
            ));
        }

        let mut histogram = Self::with_x(x_mode, y_mode, HistogramBuffer::default());
        histogram.y = Some(HistogramBuffer::default());
        histogram.e = Some(HistogramBuffer::default());
        Ok(histogram)
    }

    /// Histogram holding only X data; Y and E stay unset until assigned.
    pub fn with_x(x_mode: XMode, y_mode: YMode, x: impl Into<HistogramBuffer>) -> Self {
        Self {
            x_mode,
            y_mode,
            x: x.into(),
            y: None,
            e: None,
            dx: None,
        }
    }

    /// Fully populated histogram; every size invariant is checked.
    pub fn from_parts(
        x_mode: XMode,
        y_mode: YMode,
        x: impl Into<HistogramBuffer>,
        y: impl Into<HistogramBuffer>,
        e: impl Into<HistogramBuffer>,
        dx: Option<HistogramBuffer>,
    ) -> HistoResult<Self> {
        let mut histogram = Self::new(x_mode, y_mode)?;
        histogram.x = x.into();
        histogram.y = Some(y.into());
        histogram.e = Some(e.into());
        histogram.dx = dx;
        histogram.validate()?;
        Ok(histogram)
    }

    pub const fn x_mode(&self) -> XMode {
        self.x_mode
    }

    pub const fn y_mode(&self) -> YMode {
        self.y_mode
    }

    /// Number of Y values.
    pub fn size(&self) -> usize {
        self.y().len()
    }

    /// Checks the co-sizing of X, Y, E and Dx.
    pub fn validate(&self) -> HistoResult<()> {
        let y_len = self.y().len();
        if let Some(e) = &self.e
            && self.y.is_some()
            && e.len() != y_len
        {
            return Err(HistoError::invalid_argument(
                "HISTOGRAM.YE_SIZE_MISMATCH",
                format!("Y has {y_len} values but E has {}", e.len()),
            ));
        }

        if !self.x_mode.accepts_x_len(self.x.len(), y_len) {
            let expected_x = self.x_mode.x_len_for(y_len);
            return Err(HistoError::invalid_argument(
                "HISTOGRAM.X_SIZE_MISMATCH",
                format!(
                    "{} X data needs {expected_x} values for {y_len} Y values, got {}",
                    self.x_mode,
                    self.x.len()
                ),
            ));
        }

        if let Some(dx) = &self.dx
            && !dx.is_empty()
            && dx.len() != self.x.len()
        {
            return Err(HistoError::invalid_argument(
                "HISTOGRAM.DX_SIZE_MISMATCH",
                format!("Dx has {} values but X has {}", dx.len(), self.x.len()),
            ));
        }

        Ok(())
    }

    pub fn x(&self) -> &[f64] {
        self.x.get()
    }

    pub fn y(&self) -> &[f64] {
        self.y.as_ref().map(HistogramBuffer::get).unwrap_or_default()
    }

    pub fn e(&self) -> &[f64] {
        self.e.as_ref().map(HistogramBuffer::get).unwrap_or_default()
    }

    pub fn dx(&self) -> &[f64] {
        self.dx.as_ref().map(HistogramBuffer::get).unwrap_or_default()
    }

    pub fn has_dx(&self) -> bool {
        self.dx.is_some()
    }

    pub fn shared_x(&self) -> &HistogramBuffer {
        &self.x
    }

    pub fn shared_y(&self) -> Option<&HistogramBuffer> {
        self.y.as_ref()
    }

    pub fn shared_e(&self) -> Option<&HistogramBuffer> {
        self.e.as_ref()
    }

    pub fn shared_dx(&self) -> Option<&HistogramBuffer> {
        self.dx.as_ref()
    }

    pub fn data_x(&mut self) -> &mut [f64] {
        self.x.get_mutable()
    }

    pub fn data_y(&mut self) -> HistoResult<&mut [f64]> {
        self.y
            .as_mut()
            .map(HistogramBuffer::get_mutable)
            .ok_or_else(|| null_buffer("HISTOGRAM.NULL_Y", "Y"))
    }

    pub fn data_e(&mut self) -> HistoResult<&mut [f64]> {
        self.e
            .as_mut()
            .map(HistogramBuffer::get_mutable)
            .ok_or_else(|| null_buffer("HISTOGRAM.NULL_E", "E"))
    }

    /// Writable Dx values; empty when no Dx buffer is attached.
    pub fn data_dx(&mut self) -> &mut [f64] {
        match self.dx.as_mut() {
            Some(dx) => dx.get_mutable(),
            None => &mut [],
        }
    }

    pub fn set_x(&mut self, x: impl Into<HistogramBuffer>) {
        self.x = x.into();
    }

    pub fn set_y(&mut self, y: impl Into<HistogramBuffer>) {
        self.y = Some(y.into());
    }

    pub fn set_e(&mut self, e: impl Into<HistogramBuffer>) {
        self.e = Some(e.into());
    }

    pub fn set_dx(&mut self, dx: Option<HistogramBuffer>) {
        self.dx = dx;
    }

    pub fn counts(&self) -> HistoResult<&[f64]> {
        self.require_mode(YMode::Counts, "counts")?;
        Ok(self.y())
    }

    pub fn count_standard_deviations(&self) -> HistoResult<&[f64]> {
        self.require_mode(YMode::Counts, "count standard deviations")?;
        Ok(self.e())
    }

    pub fn frequencies(&self) -> HistoResult<&[f64]> {
        self.require_mode(YMode::Frequencies, "frequencies")?;
        Ok(self.y())
    }

    pub fn frequency_standard_deviations(&self) -> HistoResult<&[f64]> {
        self.require_mode(YMode::Frequencies, "frequency standard deviations")?;
        Ok(self.e())
    }

    pub fn set_counts(&mut self, counts: impl Into<HistogramBuffer>) -> HistoResult<()> {
        self.require_mode(YMode::Counts, "counts")?;
        self.set_y(counts);
        Ok(())
    }

    pub fn set_count_standard_deviations(
        &mut self,
        deviations: impl Into<HistogramBuffer>,
    ) -> HistoResult<()> {
        self.require_mode(YMode::Counts, "count standard deviations")?;
        self.set_e(deviations);
        Ok(())
    }

    pub fn set_frequencies(&mut self, frequencies: impl Into<HistogramBuffer>) -> HistoResult<()> {
        self.require_mode(YMode::Frequencies, "frequencies")?;
        self.set_y(frequencies);
        Ok(())
    }

    pub fn set_frequency_standard_deviations(
        &mut self,
        deviations: impl Into<HistogramBuffer>,
    ) -> HistoResult<()> {
        self.require_mode(YMode::Frequencies, "frequency standard deviations")?;
        self.set_e(deviations);
        Ok(())
    }

    pub fn y_at(&self, index: usize) -> HistoResult<f64> {
        checked_value(self.y(), index, "HISTOGRAM.Y_INDEX")
    }

    pub fn e_at(&self, index: usize) -> HistoResult<f64> {
        checked_value(self.e(), index, "HISTOGRAM.E_INDEX")
    }

    pub fn set_y_at(&mut self, index: usize, value: f64) -> HistoResult<()> {
        let values = self.data_y()?;
        let len = values.len();
        let slot = values
            .get_mut(index)
            .ok_or_else(|| HistoError::index("HISTOGRAM.Y_INDEX", index, len))?;
        *slot = value;
        Ok(())
    }

    pub fn set_e_at(&mut self, index: usize, value: f64) -> HistoResult<()> {
        let values = self.data_e()?;
        let len = values.len();
        let slot = values
            .get_mut(index)
            .ok_or_else(|| HistoError::index("HISTOGRAM.E_INDEX", index, len))?;
        *slot = value;
        Ok(())
    }

    /// Zeroes every Y and E value, keeping sizes and X untouched.
    pub fn clear_data(&mut self) {
        for buffer in [self.y.as_mut(), self.e.as_mut()].into_iter().flatten() {
            buffer.get_mutable().fill(0.0);
        }
    }

    /// Masks one bin by scaling Y and E with `1 - weight`.
    ///
    /// NaN and infinite values become `0.0` instead of being scaled. A zero
    /// weight leaves the bin alone. Nothing is written unless both Y and E
    /// hold the bin.
    pub fn apply_bin_weight(&mut self, bin_index: usize, weight: f64) -> HistoResult<()> {
        if !(0.0..=1.0).contains(&weight) {
            return Err(HistoError::invalid_argument(
                "HISTOGRAM.BIN_WEIGHT",
                format!("bin weight {weight} is outside [0, 1]"),
            ));
        }
        check_and_sanitize(self)?;
        let size = self.size().min(self.e().len());
        if bin_index >= size {
            return Err(HistoError::index("HISTOGRAM.BIN_INDEX", bin_index, size));
        }
        if weight == 0.0 {
            return Ok(());
        }

        tracing::trace!(bin_index, weight, "applying bin weight");
        let y = &mut self.data_y()?[bin_index];
        *y = masked_value(*y, weight);
        let e = &mut self.data_e()?[bin_index];
        *e = masked_value(*e, weight);
        Ok(())
    }

    /// X expressed as bin edges, derived from points when necessary.
    pub fn bin_edges(&self) -> HistogramBuffer {
        match self.x_mode {
            XMode::BinEdges => self.x.clone(),
            XMode::Points => edges_from_points(self.x()),
        }
    }

    /// X expressed as points (bin centres for bin-edge data).
    pub fn points(&self) -> HistogramBuffer {
        match self.x_mode {
            XMode::Points => self.x.clone(),
            XMode::BinEdges => self.x().windows(2).map(|w| 0.5 * (w[0] + w[1])).collect(),
        }
    }

    pub fn bin_widths(&self) -> Vec<f64> {
        self.bin_edges().get().windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Copy of this histogram with Y and E expressed per unit X.
    pub fn to_frequencies(&self) -> HistoResult<Self> {
        self.convert_y_mode(YMode::Frequencies)
    }

    /// Copy of this histogram with Y and E integrated over each bin.
    pub fn to_counts(&self) -> HistoResult<Self> {
        self.convert_y_mode(YMode::Counts)
    }

    fn convert_y_mode(&self, target: YMode) -> HistoResult<Self> {
        check_and_sanitize(self)?;
        self.validate()?;
        if self.y_mode == target {
            return Ok(self.clone());
        }

        let widths = self.bin_widths();
        let scale: fn(f64, f64) -> f64 = match (self.y_mode, target) {
            (YMode::Counts, YMode::Frequencies) => |value, width| value / width,
            (YMode::Frequencies, YMode::Counts) => |value, width| value * width,
            _ => {
                return Err(HistoError::logic(
                    "HISTOGRAM.UNINITIALIZED_Y_MODE",
                    format!("cannot convert {} data to {target}", self.y_mode),
                ));
            }
        };
        let rescale = |values: &[f64]| -> HistogramBuffer {
            values
                .iter()
                .zip(&widths)
                .map(|(value, width)| scale(*value, *width))
                .collect()
        };

        Ok(Self {
            x_mode: self.x_mode,
            y_mode: target,
            x: self.x.clone(),
            y: Some(rescale(self.y())),
            e: Some(rescale(self.e())),
            dx: self.dx.clone(),
        })
    }

    fn require_mode(&self, mode: YMode, what: &str) -> HistoResult<()> {
        if self.y_mode == mode {
            Ok(())
        } else {
            Err(HistoError::logic(
                "HISTOGRAM.Y_MODE_MISMATCH",
                format!("{what} are not available for {} data", self.y_mode),
            ))
        }
    }
}

/// Makes sure a histogram handed in from outside has Y and E data.
pub fn check_and_sanitize(histogram: &Histogram) -> HistoResult<()> {
    if histogram.y.is_none() {
        return Err(null_buffer("HISTOGRAM.NULL_Y", "Y"));
    }
    if histogram.e.is_none() {
        return Err(null_buffer("HISTOGRAM.NULL_E", "E"));
    }
    Ok(())
}

pub(crate) fn masked_value(value: f64, weight: f64) -> f64 {
    if value.is_finite() {
        value * (1.0 - weight)
    } else {
        0.0
    }
}

fn null_buffer(code: &'static str, name: &str) -> HistoError {
    HistoError::invalid_argument(code, format!("invalid input: {name} data is not set"))
}

fn checked_value(values: &[f64], index: usize, code: &'static str) -> HistoResult<f64> {
    values
        .get(index)
        .copied()
        .ok_or_else(|| HistoError::index(code, index, values.len()))
}

fn edges_from_points(points: &[f64]) -> HistogramBuffer {
    match points {
        [] => HistogramBuffer::default(),
        [single] => HistogramBuffer::from([single - 0.5, single + 0.5]),
        [first, second, ..] => {
            let (penultimate, last) = (points[points.len() - 2], points[points.len() - 1]);
            let mut edges = Vec::with_capacity(points.len() + 1);
            edges.push(first - 0.5 * (second - first));
            edges.extend(points.windows(2).map(|w| 0.5 * (w[0] + w[1])));
            edges.push(last + 0.5 * (last - penultimate));
            HistogramBuffer::new(edges)
        }
    }
}
