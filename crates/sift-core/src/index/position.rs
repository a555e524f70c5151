//! Term positions
//!
//! Occurrences that are not literal body text are stored with reserved negative
//! positions. Modelling them as variants keeps phrase and snippet arithmetic from
//! touching them by accident.

use serde::{Deserialize, Serialize};

/// Raw encoding of a spelling-variant occurrence.
pub const SPELLING_VARIANT: i64 = -1;

/// Raw encoding of a metadata-derived occurrence.
pub const METADATA_OCCURRENCE: i64 = -2;

/// Where a term occurs in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Position {
    /// Offset in the document's normalized term sequence
    Literal(u32),
    /// Added because a misspelled body term was corrected to this term
    SpellingVariant,
    /// Synthesized from the document's metadata values
    MetadataOccurrence,
}

impl Position {
    /// Decode a stored position. Unknown negative values yield `None`.
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            SPELLING_VARIANT => Some(Position::SpellingVariant),
            METADATA_OCCURRENCE => Some(Position::MetadataOccurrence),
            p if p >= 0 => u32::try_from(p).ok().map(Position::Literal),
            _ => None,
        }
    }

    pub fn to_raw(self) -> i64 {
        match self {
            Position::Literal(p) => i64::from(p),
            Position::SpellingVariant => SPELLING_VARIANT,
            Position::MetadataOccurrence => METADATA_OCCURRENCE,
        }
    }

    /// The body offset, if this is a literal occurrence.
    pub fn literal(self) -> Option<u32> {
        match self {
            Position::Literal(p) => Some(p),
            _ => None,
        }
    }
}
