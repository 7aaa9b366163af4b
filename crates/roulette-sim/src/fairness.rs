//! Provably-fair spin generation.
//!
//! Each round yields 32 bytes of `HMAC-SHA256(server_seed, "client:nonce:round")`.
//! A spin reads four bytes starting at `cursor`, crossing into the next
//! round when the cursor runs past the end of the current digest, and folds
//! them into a float in `[0, 1)`.

use crate::error::SimResult;
use hmac::{Hmac, Mac};
use rand::Rng;
use roulette_core::Pocket;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Bytes produced per HMAC round.
pub const ROUND_BYTES: usize = 32;

/// Bytes consumed per spin.
pub const SPIN_BYTES: usize = 4;

const SERVER_SEED_BYTES: usize = 32;
const CLIENT_SEED_BYTES: usize = 5;
const MAX_RANDOM_NONCE: u64 = 1_000_000;

/// Seed material for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seeds {
    /// Hex string; used as the raw HMAC key.
    pub server_seed: String,
    pub client_seed: String,
    /// Nonce before the first bet; each bet increments it first.
    pub start_nonce: u64,
}

impl Seeds {
    /// Fresh random seeds.
    pub fn random() -> Self {
        Self::resolve(None, None, None)
    }

    /// Fill in whichever parts are missing with random values.
    pub fn resolve(
        server_seed: Option<String>,
        client_seed: Option<String>,
        start_nonce: Option<u64>,
    ) -> Self {
        let mut rng = rand::thread_rng();
        let server_seed = server_seed.unwrap_or_else(|| {
            let mut bytes = [0u8; SERVER_SEED_BYTES];
            rng.fill(&mut bytes[..]);
            hex::encode(bytes)
        });
        let client_seed = client_seed.unwrap_or_else(|| {
            let mut bytes = [0u8; CLIENT_SEED_BYTES];
            rng.fill(&mut bytes[..]);
            hex::encode(bytes)
        });
        let start_nonce = start_nonce.unwrap_or_else(|| rng.gen_range(1..=MAX_RANDOM_NONCE));

        Self {
            server_seed,
            client_seed,
            start_nonce,
        }
    }
}

/// Keyed spin generator for one server/client seed pair.
#[derive(Clone)]
pub struct SpinGenerator {
    mac: HmacSha256,
    client_seed: String,
}

impl SpinGenerator {
    pub fn new(server_seed: &str, client_seed: &str) -> SimResult<Self> {
        let mac = HmacSha256::new_from_slice(server_seed.as_bytes())?;
        Ok(Self {
            mac,
            client_seed: client_seed.to_string(),
        })
    }

    pub fn from_seeds(seeds: &Seeds) -> SimResult<Self> {
        Self::new(&seeds.server_seed, &seeds.client_seed)
    }

    /// Digest for one round.
    pub fn round_bytes(&self, nonce: u64, round: u64) -> [u8; ROUND_BYTES] {
        let mut mac = self.mac.clone();
        mac.update(format!("{}:{}:{}", self.client_seed, nonce, round).as_bytes());
        let digest = mac.finalize().into_bytes();
        let mut out = [0u8; ROUND_BYTES];
        out.copy_from_slice(&digest);
        out
    }

    /// Endless byte stream starting at `cursor`.
    pub fn bytes(&self, nonce: u64, cursor: u64) -> ByteStream<'_> {
        ByteStream {
            generator: self,
            nonce,
            round: cursor / ROUND_BYTES as u64,
            offset: (cursor % ROUND_BYTES as u64) as usize,
            buffer: None,
        }
    }

    /// Fold the next four bytes into `Σ b_i / 256^(i+1)`.
    pub fn unit_float(&self, nonce: u64, cursor: u64) -> f64 {
        self.bytes(nonce, cursor)
            .take(SPIN_BYTES)
            .enumerate()
            .map(|(i, b)| f64::from(b) / 256f64.powi(i as i32 + 1))
            .sum()
    }

    pub fn spin(&self, nonce: u64, cursor: u64) -> SimResult<Pocket> {
        Ok(Pocket::from_unit_float(self.unit_float(nonce, cursor))?)
    }
}

impl std::fmt::Debug for SpinGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpinGenerator")
            .field("client_seed", &self.client_seed)
            .finish_non_exhaustive()
    }
}

/// Iterator over HMAC round bytes.
pub struct ByteStream<'a> {
    generator: &'a SpinGenerator,
    nonce: u64,
    round: u64,
    offset: usize,
    buffer: Option<[u8; ROUND_BYTES]>,
}

impl Iterator for ByteStream<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.offset == ROUND_BYTES {
            self.offset = 0;
            self.round += 1;
            self.buffer = None;
        }
        let (generator, nonce, round) = (self.generator, self.nonce, self.round);
        let buffer = self
            .buffer
            .get_or_insert_with(|| generator.round_bytes(nonce, round));
        let byte = buffer[self.offset];
        self.offset += 1;
        Some(byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVER: &str = "097d89ba33cd428e2a1b0a7e27c7d4e51b8ff5ab9a2f4b2c6b5c4c0e0d4f1f3b";
    const CLIENT: &str = "xSF4HYcEOm";

    #[test]
    fn test_round_bytes_known_digest() {
        let generator = SpinGenerator::new(SERVER, CLIENT).unwrap();
        assert_eq!(
            hex::encode(generator.round_bytes(3, 0)),
            "1aa77917ff01b4f51a0a873e7aa7e8e20b1ff7e4628334ce0f0beb9f3ca159a6"
        );
    }

    #[test]
    fn test_known_spin() {
        let generator = SpinGenerator::new(SERVER, CLIENT).unwrap();
        let bytes: Vec<u8> = generator.bytes(3, 0).take(4).collect();
        assert_eq!(bytes, vec![26, 167, 121, 23]);
        assert_eq!(generator.spin(3, 0).unwrap().number, 3);
    }

    #[test]
    fn test_cursor_crosses_round_boundary() {
        let generator = SpinGenerator::new(SERVER, CLIENT).unwrap();
        let first = generator.round_bytes(3, 0);
        let second = generator.round_bytes(3, 1);

        let bytes: Vec<u8> = generator.bytes(3, 30).take(4).collect();
        assert_eq!(bytes, vec![first[30], first[31], second[0], second[1]]);
        assert_eq!(bytes, vec![89, 166, 221, 61]);
        assert_eq!(generator.spin(3, 30).unwrap().number, 12);
    }

    #[test]
    fn test_unit_float_in_range() {
        let generator = SpinGenerator::new(SERVER, CLIENT).unwrap();
        for nonce in 0..500 {
            let f = generator.unit_float(nonce, 0);
            assert!((0.0..1.0).contains(&f), "nonce {nonce}: {f}");
        }
    }

    #[test]
    fn test_resolve_keeps_fixed_parts() {
        let seeds = Seeds::resolve(Some("abc".to_string()), None, Some(7));
        assert_eq!(seeds.server_seed, "abc");
        assert_eq!(seeds.start_nonce, 7);
        assert_eq!(seeds.client_seed.len(), CLIENT_SEED_BYTES * 2);
    }

    #[test]
    fn test_random_seeds_shape() {
        let seeds = Seeds::random();
        assert_eq!(seeds.server_seed.len(), SERVER_SEED_BYTES * 2);
        assert!(hex::decode(&seeds.server_seed).is_ok());
        assert!((1..=MAX_RANDOM_NONCE).contains(&seeds.start_nonce));
    }
}
