use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{LayoutError, LayoutResult};

/// Genomic basepair position, 0-based. Intervals are half-open `[start, stop)`.
///
/// Signed so that clamping arithmetic near chromosome edges never underflows.
pub type Bp = i64;

/// A named genomic interval, the unit of jump requests and highlights.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locus {
    pub chrom: String,
    pub start: Bp,
    pub stop: Bp,
}

impl Locus {
    pub fn new(chrom: impl Into<String>, start: Bp, stop: Bp) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            stop,
        }
    }

    pub fn span(&self) -> Bp {
        self.stop - self.start
    }

    pub fn center(&self) -> Bp {
        (self.start + self.stop) / 2
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.stop)
    }
}

/// Which pixel axis a mapping hit landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitSpace {
    /// Index into the main region list.
    Region(usize),
    /// Index into the subpanel set.
    Subpanel(usize),
}

/// One genomic-to-pixel mapping result. A single genomic position can hit
/// the main axis and any number of subpanels at once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub space: HitSpace,
    pub px: f64,
    /// True when the position fell outside every region and was snapped to
    /// the nearest region boundary (gene-overlay intron handling).
    pub clamped: bool,
}

impl Hit {
    pub fn region(index: usize, px: f64) -> Self {
        Self {
            space: HitSpace::Region(index),
            px,
            clamped: false,
        }
    }

    pub fn subpanel(index: usize, px: f64) -> Self {
        Self {
            space: HitSpace::Subpanel(index),
            px,
            clamped: false,
        }
    }

    pub fn clamped(mut self) -> Self {
        self.clamped = true;
        self
    }
}

/// Interpretation of the visible axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordMode {
    /// Plain genomic distance.
    Genomic,
    /// Spliced gene-body view: the region list holds exon/CDS segments of
    /// one gene, and positions falling into the introns between them map to
    /// the nearest segment boundary instead of missing entirely.
    GeneOverlay {
        chrom: String,
        start: Bp,
        stop: Bp,
    },
}

/// Chromosome name -> length registry for one genome build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChromSizes {
    sizes: HashMap<String, Bp>,
}

impl ChromSizes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, chrom: impl Into<String>, len: Bp) {
        self.sizes.insert(chrom.into(), len);
    }

    pub fn contains(&self, chrom: &str) -> bool {
        self.sizes.contains_key(chrom)
    }

    pub fn len_of(&self, chrom: &str) -> LayoutResult<Bp> {
        self.sizes
            .get(chrom)
            .copied()
            .ok_or_else(|| LayoutError::unknown_chromosome(chrom))
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Bp)> for ChromSizes {
    fn from_iter<T: IntoIterator<Item = (S, Bp)>>(iter: T) -> Self {
        let mut out = Self::new();
        for (chrom, len) in iter {
            out.insert(chrom, len);
        }
        out
    }
}
