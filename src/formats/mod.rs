//! Format negotiation
//!
//! Callers name symbologies with loose string tags (`"qr"`, `"code-128"`,
//! `"EAN_13"`). This module folds them into one internal [`Symbology`]
//! enumeration and a [`FormatSet`] selector; [`tables`] then translates the
//! selector into whatever a particular vendor engine expects.

pub mod tables;

use std::fmt;

use tracing::debug;

/// Barcode encoding standard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbology {
    /// Code 128
    Code128,
    /// Code 39
    Code39,
    /// Code 93
    Code93,
    /// Codabar
    Codabar,
    /// EAN-13
    Ean13,
    /// EAN-8
    Ean8,
    /// Interleaved 2 of 5 (ITF-14)
    Itf,
    /// UPC-E
    UpcE,
    /// UPC-A
    UpcA,
    /// QR code
    Qr,
    /// PDF417
    Pdf417,
    /// Aztec
    Aztec,
    /// Data Matrix
    DataMatrix,
}

impl Symbology {
    /// Every symbology the crate can negotiate, in bit order
    pub const ALL: [Symbology; 13] = [
        Symbology::Code128,
        Symbology::Code39,
        Symbology::Code93,
        Symbology::Codabar,
        Symbology::Ean13,
        Symbology::Ean8,
        Symbology::Itf,
        Symbology::UpcE,
        Symbology::UpcA,
        Symbology::Qr,
        Symbology::Pdf417,
        Symbology::Aztec,
        Symbology::DataMatrix,
    ];

    /// Stable tag reported in results
    pub fn tag(&self) -> &'static str {
        match self {
            Symbology::Code128 => "code_128",
            Symbology::Code39 => "code_39",
            Symbology::Code93 => "code_93",
            Symbology::Codabar => "codabar",
            Symbology::Ean13 => "ean_13",
            Symbology::Ean8 => "ean_8",
            Symbology::Itf => "itf",
            Symbology::UpcE => "upc_e",
            Symbology::UpcA => "upc_a",
            Symbology::Qr => "qr",
            Symbology::Pdf417 => "pdf_417",
            Symbology::Aztec => "aztec",
            Symbology::DataMatrix => "data_matrix",
        }
    }

    /// Parse a caller tag.
    ///
    /// Case, surrounding whitespace and the hyphen/underscore spelling are
    /// ignored, so `"data-matrix"`, `"DATA_MATRIX"` and `"datamatrix"` all
    /// match. `"all"` is not a symbology and returns `None`; see
    /// [`FormatTag::parse`].
    pub fn from_tag(tag: &str) -> Option<Self> {
        let key = canonical_tag(tag);
        let symbology = match key.as_str() {
            "code_128" | "code128" => Symbology::Code128,
            "code_39" | "code39" => Symbology::Code39,
            "code_93" | "code93" => Symbology::Code93,
            "codabar" => Symbology::Codabar,
            "ean_13" | "ean13" => Symbology::Ean13,
            "ean_8" | "ean8" => Symbology::Ean8,
            "itf" | "itf_14" | "itf14" => Symbology::Itf,
            "upc_e" | "upce" => Symbology::UpcE,
            "upc_a" | "upca" => Symbology::UpcA,
            "qr" | "qr_code" | "qrcode" => Symbology::Qr,
            "pdf_417" | "pdf417" => Symbology::Pdf417,
            "aztec" => Symbology::Aztec,
            "data_matrix" | "datamatrix" => Symbology::DataMatrix,
            _ => return None,
        };
        Some(symbology)
    }

    /// True for linear (1D) symbologies
    pub fn is_linear(&self) -> bool {
        !matches!(
            self,
            Symbology::Qr | Symbology::Pdf417 | Symbology::Aztec | Symbology::DataMatrix
        )
    }

    fn bit(&self) -> u16 {
        1 << (*self as u16)
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

fn canonical_tag(tag: &str) -> String {
    tag.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// A single parsed request tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatTag {
    /// Enable every supported symbology
    All,
    /// Enable one symbology
    One(Symbology),
}

impl FormatTag {
    /// Parse a request tag, returning `None` for unrecognized spellings
    pub fn parse(tag: &str) -> Option<Self> {
        if canonical_tag(tag) == "all" {
            return Some(FormatTag::All);
        }
        Symbology::from_tag(tag).map(FormatTag::One)
    }
}

/// Set of enabled symbologies
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FormatSet {
    mask: u16,
}

impl FormatSet {
    const FULL_MASK: u16 = (1 << Symbology::ALL.len()) - 1;

    /// Empty set
    pub const fn empty() -> Self {
        Self { mask: 0 }
    }

    /// Every supported symbology
    pub const fn all() -> Self {
        Self {
            mask: Self::FULL_MASK,
        }
    }

    /// Set holding exactly one symbology
    pub fn only(symbology: Symbology) -> Self {
        Self {
            mask: symbology.bit(),
        }
    }

    /// Add a symbology
    pub fn insert(&mut self, symbology: Symbology) {
        self.mask |= symbology.bit();
    }

    /// Check membership
    pub fn contains(&self, symbology: Symbology) -> bool {
        self.mask & symbology.bit() != 0
    }

    /// Union of two sets
    pub fn union(&self, other: &FormatSet) -> FormatSet {
        FormatSet {
            mask: self.mask | other.mask,
        }
    }

    /// True when `self` contains every member of `other`
    pub fn is_superset(&self, other: &FormatSet) -> bool {
        self.mask & other.mask == other.mask
    }

    /// True when nothing is enabled
    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    /// True when every supported symbology is enabled
    pub fn is_all(&self) -> bool {
        self.mask == Self::FULL_MASK
    }

    /// Number of enabled symbologies
    pub fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    /// Enabled symbologies in bit order
    pub fn iter(&self) -> impl Iterator<Item = Symbology> + '_ {
        Symbology::ALL.into_iter().filter(|s| self.contains(*s))
    }
}

impl FromIterator<Symbology> for FormatSet {
    fn from_iter<I: IntoIterator<Item = Symbology>>(iter: I) -> Self {
        let mut set = FormatSet::empty();
        for symbology in iter {
            set.insert(symbology);
        }
        set
    }
}

impl fmt::Debug for FormatSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_all() {
            return f.write_str("FormatSet(all)");
        }
        f.debug_set().entries(self.iter().map(|s| s.tag())).finish()
    }
}

/// Translate a caller's format request into a [`FormatSet`].
///
/// An absent or empty request, or one containing `"all"`, enables every
/// supported symbology. Unknown tags are skipped. If nothing in the request
/// is recognized the result is also the full set, so an engine is never
/// handed an empty selector.
pub fn negotiate<S: AsRef<str>>(request: Option<&[S]>) -> FormatSet {
    let Some(tags) = request else {
        return FormatSet::all();
    };

    let mut set = FormatSet::empty();
    for raw in tags {
        let raw = raw.as_ref();
        match FormatTag::parse(raw) {
            Some(FormatTag::All) => return FormatSet::all(),
            Some(FormatTag::One(symbology)) => set.insert(symbology),
            None => debug!(tag = raw, "ignoring unrecognized barcode format"),
        }
    }

    if set.is_empty() {
        debug!("no recognized formats requested, enabling all");
        return FormatSet::all();
    }
    debug!(formats = ?set, "negotiated barcode formats");
    set
}
