//! The Quarto piece catalog
//!
//! A Quarto set has exactly sixteen pieces, one for every combination of
//! four binary attributes. A piece is stored as a 4-bit value where a set
//! bit means the attribute is present and a clear bit means its opposite.

use std::fmt;

/// One of the four binary attributes of a piece
///
/// Each attribute has an implicit opposite (tall/short, dark/light,
/// square/round, hollow/solid) represented by the bit being clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// Tall as opposed to short
    Tall,
    /// Dark as opposed to light
    Dark,
    /// Square as opposed to round
    Square,
    /// Hollow top as opposed to solid
    Hollow,
}

impl Attribute {
    /// All attributes in bit order
    pub const ALL: [Attribute; 4] = [
        Attribute::Tall,
        Attribute::Dark,
        Attribute::Square,
        Attribute::Hollow,
    ];

    /// The bit this attribute occupies in a piece
    pub const fn mask(self) -> u8 {
        match self {
            Attribute::Tall => 0b0001,
            Attribute::Dark => 0b0010,
            Attribute::Square => 0b0100,
            Attribute::Hollow => 0b1000,
        }
    }
}

const ATTRIBUTE_BITS: u8 = 0b1111;

/// A single Quarto piece
///
/// Identity is the attribute tuple, so two pieces compare equal exactly
/// when all four attributes agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Piece(u8);

impl Piece {
    /// Number of distinct pieces in a set
    pub const COUNT: usize = 16;

    /// Builds a piece from its four attributes
    pub fn new(tall: bool, dark: bool, square: bool, hollow: bool) -> Self {
        let mut bits = 0;
        if tall {
            bits |= Attribute::Tall.mask();
        }
        if dark {
            bits |= Attribute::Dark.mask();
        }
        if square {
            bits |= Attribute::Square.mask();
        }
        if hollow {
            bits |= Attribute::Hollow.mask();
        }
        Piece(bits)
    }

    /// Builds a piece from its bit encoding, rejecting values above 15
    pub fn from_bits(bits: u8) -> Option<Self> {
        (bits <= ATTRIBUTE_BITS).then_some(Piece(bits))
    }

    /// The 4-bit encoding of this piece
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Position of this piece in the catalog (0..16)
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns true if the piece has the given attribute
    pub fn has(self, attribute: Attribute) -> bool {
        self.0 & attribute.mask() != 0
    }

    /// Iterates over all sixteen pieces in catalog order
    pub fn all() -> impl Iterator<Item = Piece> {
        (0..Self::COUNT as u8).map(Piece)
    }
}

/// The full set of sixteen distinct pieces
pub fn catalog() -> Vec<Piece> {
    Piece::all().collect()
}

/// Bitmask of the attributes on which all four pieces agree
///
/// A bit is set when every piece has the attribute or every piece lacks
/// it. A non-zero result means the four pieces form a winning line.
pub fn shared_attributes(pieces: &[Piece; 4]) -> u8 {
    let all_set = pieces.iter().fold(ATTRIBUTE_BITS, |acc, p| acc & p.0);
    let all_clear = pieces.iter().fold(ATTRIBUTE_BITS, |acc, p| acc & !p.0);
    (all_set | all_clear) & ATTRIBUTE_BITS
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = |attribute: Attribute, yes: char, no: char| if self.has(attribute) { yes } else { no };
        write!(
            f,
            "{}{}{}{}",
            letter(Attribute::Tall, 'T', 's'),
            letter(Attribute::Dark, 'D', 'l'),
            letter(Attribute::Square, 'S', 'r'),
            letter(Attribute::Hollow, 'H', 'f'),
        )
    }
}
