//! Representation modes.

use std::fmt;

/// How a layer is currently drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepresentationMode {
    /// One strip per channel.
    Open,
    /// One aggregated row for all channels.
    Closed,
}

impl fmt::Display for RepresentationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepresentationMode::Open => write!(f, "open"),
            RepresentationMode::Closed => write!(f, "closed"),
        }
    }
}

impl RepresentationMode {
    /// Mode for a `layerInitStatus`-style flag.
    pub fn from_open(is_open: bool) -> Self {
        if is_open {
            RepresentationMode::Open
        } else {
            RepresentationMode::Closed
        }
    }

    pub fn is_open(self) -> bool {
        self == RepresentationMode::Open
    }
}
