pub mod errors;

pub use errors::{HistoError, HistoErrorCategory, HistoResult};

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// How the X buffer relates to the Y buffer of a histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum XMode {
    #[default]
    BinEdges,
    Points,
}

impl XMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BinEdges => "BinEdges",
            Self::Points => "Points",
        }
    }

    /// Expected X length for `y_len` Y values.
    pub const fn x_len_for(self, y_len: usize) -> usize {
        match self {
            Self::BinEdges => y_len + 1,
            Self::Points => y_len,
        }
    }

    /// Whether `x_len` X values fit `y_len` Y values. Bin-edge data without
    /// bins may also carry no edges at all.
    pub const fn accepts_x_len(self, x_len: usize, y_len: usize) -> bool {
        x_len == self.x_len_for(y_len)
            || (matches!(self, Self::BinEdges) && x_len == 0 && y_len == 0)
    }
}

/// Whether Y holds integrated counts per bin or counts per unit X.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum YMode {
    #[default]
    Uninitialized,
    Counts,
    Frequencies,
}

impl YMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "Uninitialized",
            Self::Counts => "Counts",
            Self::Frequencies => "Frequencies",
        }
    }
}

/// Data flow direction of a declared property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Input,
    Output,
    InOut,
}

impl Direction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Input => "Input",
            Self::Output => "Output",
            Self::InOut => "InOut",
        }
    }

    pub const fn accepts_input(self) -> bool {
        matches!(self, Self::Input | Self::InOut)
    }

    pub const fn produces_output(self) -> bool {
        matches!(self, Self::Output | Self::InOut)
    }
}

macro_rules! impl_display {
    ($($ty:ty),*) => {
        $(
            impl Display for $ty {
                fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                    f.write_str((*self).as_str())
                }
            }
        )*
    };
}

impl_display!(XMode, YMode, Direction);

impl FromStr for XMode {
    type Err = HistoError;

    fn from_str(value: &str) -> HistoResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "binedges" | "bin-edges" | "bin_edges" | "histogram" => Ok(Self::BinEdges),
            "points" | "point" => Ok(Self::Points),
            _ => Err(HistoError::invalid_argument(
                "MODE.UNKNOWN_X_MODE",
                format!("unrecognized X mode '{value}'"),
            )),
        }
    }
}

impl FromStr for YMode {
    type Err = HistoError;

    /// Only the two usable modes parse; `Uninitialized` is never accepted from text.
    fn from_str(value: &str) -> HistoResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "counts" => Ok(Self::Counts),
            "frequencies" => Ok(Self::Frequencies),
            _ => Err(HistoError::invalid_argument(
                "MODE.UNKNOWN_Y_MODE",
                format!("unrecognized Y mode '{value}'"),
            )),
        }
    }
}
