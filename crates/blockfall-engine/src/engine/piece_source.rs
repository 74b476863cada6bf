use std::str::FromStr;

use rand::{
    Rng, RngCore,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// Source of randomness for piece selection.
///
/// The engine asks for one index in `0..PieceKind::LEN` per spawn and maps
/// it to a kind in catalog order (`I, O, T, S, Z, J, L`). Every
/// [`RngCore`] is a source, so any seeded `rand` generator can be injected;
/// [`PieceSequence`] replays a fixed order.
pub trait PieceSource {
    /// Returns a uniformly distributed integer in `0..len`.
    fn next_index(&mut self, len: usize) -> usize;

    /// Picks the kind of the next piece.
    fn next_kind(&mut self) -> PieceKind {
        PieceKind::ALL[self.next_index(PieceKind::LEN) % PieceKind::LEN]
    }
}

impl<R> PieceSource for R
where
    R: RngCore,
{
    fn next_index(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

/// Piece source that cycles through a fixed list of kinds.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceKind, PieceSequence, PieceSource as _};
///
/// let mut source = PieceSequence::new([PieceKind::T, PieceKind::I]).unwrap();
/// assert_eq!(source.next_kind(), PieceKind::T);
/// assert_eq!(source.next_kind(), PieceKind::I);
/// assert_eq!(source.next_kind(), PieceKind::T);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceSequence {
    kinds: Vec<PieceKind>,
    next: usize,
}

impl PieceSequence {
    /// Returns `None` if `kinds` is empty.
    pub fn new<I>(kinds: I) -> Option<Self>
    where
        I: IntoIterator<Item = PieceKind>,
    {
        let kinds: Vec<_> = kinds.into_iter().collect();
        (!kinds.is_empty()).then_some(Self { kinds, next: 0 })
    }

    #[must_use]
    pub fn kinds(&self) -> &[PieceKind] {
        &self.kinds
    }
}

impl PieceSource for PieceSequence {
    fn next_index(&mut self, len: usize) -> usize {
        let kind = self.kinds[self.next];
        self.next = (self.next + 1) % self.kinds.len();
        kind as usize % len
    }
}

/// Seed for deterministic piece generation.
///
/// A 128-bit seed for the PCG32 generator behind
/// [`Game::with_seed`](crate::Game::with_seed). The same seed always yields
/// the same piece sequence, which makes sessions reproducible.
///
/// Serialized as a 32-character lowercase hex string. [`FromStr`] also
/// accepts shorter hex strings, zero-extended on the left.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Game, PieceSeed};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
///
/// let mut game1 = Game::with_seed(10, 20, seed).unwrap();
/// let mut game2 = Game::with_seed(10, 20, seed).unwrap();
/// game1.new_game();
/// game2.new_game();
///
/// assert_eq!(game1.current_piece(), game2.current_piece());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }

    fn to_hex(self) -> String {
        format!("{:032x}", u128::from_be_bytes(self.0))
    }
}

/// Allows generating random `PieceSeed` values with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed {input:?}: expected 1 to 32 hex digits")]
pub struct ParseSeedError {
    input: String,
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.is_empty() || s.len() > 32 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| err())?;
        Ok(Self::from_u128(num))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            )));
        }
        hex_str
            .parse()
            .map_err(|e| serde::de::Error::custom(format!("invalid hex: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_rng_source_stays_in_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(rng.next_index(PieceKind::LEN) < PieceKind::LEN);
        }
    }

    #[test]
    fn test_rng_source_yields_every_kind() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut seen = [false; PieceKind::LEN];
        for _ in 0..500 {
            seen[rng.next_kind() as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let seed = PieceSeed::from_u128(0x1234_5678_9abc_def0_1122_3344_5566_7788);
        let mut rng1 = Pcg32::from_seed(seed.to_bytes());
        let mut rng2 = Pcg32::from_seed(seed.to_bytes());
        for _ in 0..20 {
            assert_eq!(rng1.next_kind(), rng2.next_kind());
        }
    }

    #[test]
    fn test_sequence_cycles() {
        let mut source = PieceSequence::new([PieceKind::O, PieceKind::L, PieceKind::S]).unwrap();
        let drawn: Vec<_> = (0..7).map(|_| source.next_kind()).collect();
        assert_eq!(
            drawn,
            [
                PieceKind::O,
                PieceKind::L,
                PieceKind::S,
                PieceKind::O,
                PieceKind::L,
                PieceKind::S,
                PieceKind::O
            ]
        );
    }

    #[test]
    fn test_empty_sequence_is_rejected() {
        assert_eq!(PieceSequence::new([]), None);
    }

    #[test]
    fn test_seed_known_values() {
        let seed = PieceSeed::from_u128(0x0123_4567_89ab_cdef_fedc_ba98_7654_3210);
        let serialized = serde_json::to_string(&seed).unwrap();
        assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");
        assert_eq!(serde_json::from_str::<PieceSeed>(&serialized).unwrap(), seed);

        let zero = serde_json::to_string(&PieceSeed::from_u128(0)).unwrap();
        assert_eq!(zero, "\"00000000000000000000000000000000\"");
    }

    #[test]
    fn test_seed_deserialize_errors() {
        assert!(serde_json::from_str::<PieceSeed>("\"\"").is_err());
        assert!(serde_json::from_str::<PieceSeed>("\"0123456789abcdef0123456789abcde\"").is_err());
        assert!(serde_json::from_str::<PieceSeed>("\"ghijklmnopqrstuvwxyzghijklmnopqr\"").is_err());
    }

    #[test]
    fn test_seed_from_str() {
        assert_eq!("2a".parse::<PieceSeed>(), Ok(PieceSeed::from_u128(42)));
        assert_eq!(
            "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF".parse::<PieceSeed>(),
            Ok(PieceSeed::from_u128(u128::MAX))
        );
        assert!("".parse::<PieceSeed>().is_err());
        assert!("+1".parse::<PieceSeed>().is_err());
        assert!("xyz".parse::<PieceSeed>().is_err());
        assert!("0".repeat(33).parse::<PieceSeed>().is_err());
    }
}
