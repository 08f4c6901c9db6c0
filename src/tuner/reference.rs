//! Target pitches a tuner compares against.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{TunerError, TunerResult};

/// Open strings of a six-string guitar in standard tuning, low to high.
pub const STANDARD_GUITAR: [(&str, f64); 6] = [
    ("E2", 82.41),
    ("A2", 110.00),
    ("D3", 146.83),
    ("G3", 196.00),
    ("B3", 246.94),
    ("E4", 329.63),
];

/// A named target frequency.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReferencePitch {
    /// Note name (e.g. "A2")
    pub name: String,
    /// Frequency in Hz
    pub frequency: f64,
}

impl ReferencePitch {
    pub fn new(name: impl Into<String>, frequency: f64) -> Self {
        ReferencePitch {
            name: name.into(),
            frequency,
        }
    }
}

/// Reference pitches sorted by ascending frequency. Never empty, and fixed once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTable {
    pitches: Vec<ReferencePitch>,
}

impl Default for ReferenceTable {
    fn default() -> Self {
        Self::standard_guitar()
    }
}

impl ReferenceTable {
    /// Build a table from arbitrary pitches. Entries are sorted by frequency;
    /// entries with equal frequencies keep their given order.
    pub fn new(mut pitches: Vec<ReferencePitch>) -> TunerResult<Self> {
        if pitches.is_empty() {
            return Err(TunerError::EmptyReferenceTable);
        }
        if let Some(bad) = pitches
            .iter()
            .find(|p| !p.frequency.is_finite() || p.frequency <= 0.0)
        {
            return Err(TunerError::InvalidReferencePitch {
                name: bad.name.clone(),
                frequency: bad.frequency,
            });
        }
        pitches.sort_by(|a, b| a.frequency.total_cmp(&b.frequency));
        Ok(ReferenceTable { pitches })
    }

    pub fn standard_guitar() -> Self {
        ReferenceTable {
            pitches: STANDARD_GUITAR
                .iter()
                .map(|&(name, frequency)| ReferencePitch::new(name, frequency))
                .collect(),
        }
    }

    /// The pitch closest to `frequency` in Hz. On a tie the lower pitch wins.
    /// Frequencies that compare with nothing (NaN) map to the lowest pitch.
    pub fn nearest(&self, frequency: f64) -> &ReferencePitch {
        let distance = |pitch: &ReferencePitch| (frequency - pitch.frequency).abs();
        // `new` guarantees at least one entry.
        self.pitches[1..]
            .iter()
            .fold(&self.pitches[0], |nearest, pitch| {
                if distance(pitch) < distance(nearest) {
                    pitch
                } else {
                    nearest
                }
            })
    }

    pub fn get(&self, name: &str) -> Option<&ReferencePitch> {
        self.pitches.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReferencePitch> {
        self.pitches.iter()
    }

    pub fn len(&self) -> usize {
        self.pitches.len()
    }

    /// Always false; kept alongside [len][ReferenceTable::len].
    pub fn is_empty(&self) -> bool {
        self.pitches.is_empty()
    }
}
