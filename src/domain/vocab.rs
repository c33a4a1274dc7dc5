//! Controlled vocabularies and the packed vocabulary word
//!
//! Categorical fields of a sample (context, specimen, material) are mapped to
//! small integer codes from closed tables and packed into one 15-bit word that
//! fits a 16-bit point attribute. The source collection is mapped to its own
//! code, used as the point classification.

use serde::{Deserialize, Serialize};

/// Width of each packed field in bits
pub const FIELD_BITS: u16 = 5;

/// Mask for a single packed field
pub const FIELD_MASK: u16 = (1 << FIELD_BITS) - 1;

/// Source collection of a sample record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceCollection {
    /// Label absent or not in the vocabulary
    #[default]
    Unknown,
    Geome,
    Sesar,
    OpenContext,
    Smithsonian,
}

impl SourceCollection {
    /// Maps a source label (case-insensitive, trimmed) to a collection
    ///
    /// # Examples
    ///
    /// ```
    /// use icesium::domain::vocab::SourceCollection;
    ///
    /// assert_eq!(SourceCollection::from_label(" SESAR "), SourceCollection::Sesar);
    /// assert_eq!(SourceCollection::from_label("unheard-of"), SourceCollection::Unknown);
    /// ```
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "geome" => Self::Geome,
            "sesar" => Self::Sesar,
            "opencontext" => Self::OpenContext,
            "smithsonian" => Self::Smithsonian,
            _ => Self::Unknown,
        }
    }

    /// Integer code stored with the sample and exported as classification
    pub fn code(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Geome => 1,
            Self::Sesar => 2,
            Self::OpenContext => 3,
            Self::Smithsonian => 4,
        }
    }
}

/// A closed categorical vocabulary
#[derive(Debug)]
pub struct Vocabulary {
    /// Field name, used in log messages
    pub name: &'static str,
    terms: &'static [(&'static str, u8)],
}

impl Vocabulary {
    /// Code for a term, 0 when unknown
    pub fn code(&self, term: &str) -> u8 {
        let term = term.trim().to_lowercase();
        match self.terms.iter().find(|(label, _)| *label == term) {
            Some((_, code)) => *code,
            None => {
                tracing::trace!(vocabulary = self.name, term = %term, "Unknown term");
                0
            }
        }
    }

    /// Code for the first element of a multi-valued field, 0 when empty
    pub fn code_for_first(&self, values: &[String]) -> u8 {
        values.first().map(|v| self.code(v)).unwrap_or(0)
    }

    /// Number of terms in the table
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// True when the table has no terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Sampled feature context categories
pub static CONTEXT: Vocabulary = Vocabulary {
    name: "context",
    terms: &[
        ("not provided", 0),
        ("site of past human activities", 1),
        ("earth interior", 2),
        ("subaerial surface environment", 3),
        ("marine water body bottom", 4),
        ("marine water body", 5),
        ("lake river or stream bottom", 6),
        ("terrestrial water body", 8),
        ("active human occupation site", 9),
        ("lake, river or stream bottom", 10),
        ("subsurface fluid reservoir", 11),
        ("marine biome", 12),
        ("subaerial terrestrial biome", 13),
    ],
};

/// Specimen type categories
pub static SPECIMEN: Vocabulary = Vocabulary {
    name: "specimen",
    terms: &[
        ("not provided", 0),
        ("organism part", 1),
        ("whole organism", 3),
        ("other solid object", 4),
        ("artifact", 5),
        ("aggregation", 6),
        ("biome aggregation", 7),
        ("anthropogenic aggregation", 8),
        ("analytical preparation", 9),
        ("liquid or gas sample", 10),
        ("organism product", 11),
        ("experiment product", 12),
    ],
};

/// Material type categories
pub static MATERIAL: Vocabulary = Vocabulary {
    name: "material",
    terms: &[
        ("not provided", 0),
        ("organic material", 1),
        ("biogenic non organic material", 2),
        ("rock", 3),
        ("anthropogenic material", 4),
        ("mineral", 5),
        ("sediment", 6),
        ("water", 7),
        ("soil", 8),
        ("anthropogenic metal", 9),
        ("gaseous material", 10),
        ("biogenic non-organic material", 11),
        ("particulate", 13),
        ("non-aqueous liquid material", 14),
        ("ice", 15),
    ],
};

/// Three 5-bit categorical codes packed into one word
///
/// Layout: `context | specimen << 5 | material << 10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PackedVocab(u16);

impl PackedVocab {
    /// Packs three codes; each is masked to 5 bits
    ///
    /// # Examples
    ///
    /// ```
    /// use icesium::domain::vocab::PackedVocab;
    ///
    /// let word = PackedVocab::pack(3, 1, 7);
    /// assert_eq!(word.value(), 3 + (1 << 5) + (7 << 10));
    /// assert_eq!(word.unpack(), (3, 1, 7));
    /// ```
    pub fn pack(context: u8, specimen: u8, material: u8) -> Self {
        let a = u16::from(context) & FIELD_MASK;
        let b = u16::from(specimen) & FIELD_MASK;
        let c = u16::from(material) & FIELD_MASK;
        Self(a + (b << FIELD_BITS) + (c << (2 * FIELD_BITS)))
    }

    /// Wraps a raw stored word
    pub fn from_raw(value: u16) -> Self {
        Self(value)
    }

    /// Splits the word back into `(context, specimen, material)`
    pub fn unpack(self) -> (u8, u8, u8) {
        let v = self.0;
        (
            (v & FIELD_MASK) as u8,
            ((v >> FIELD_BITS) & FIELD_MASK) as u8,
            ((v >> (2 * FIELD_BITS)) & FIELD_MASK) as u8,
        )
    }

    /// Raw word value
    pub fn value(self) -> u16 {
        self.0
    }
}
