use std::fmt;
use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use curve25519_dalek::edwards::CompressedEdwardsY;
use sha2::{Digest, Sha256};

use crate::error::{CrowdfundError, Result};

pub const PUBKEY_BYTES: usize = 32;
pub const MAX_SEEDS: usize = 16;
pub const MAX_SEED_LEN: usize = 32;

const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// A 32-byte account address, shown as base58.
#[derive(
    Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, BorshSerialize, BorshDeserialize,
)]
pub struct Pubkey([u8; PUBKEY_BYTES]);

impl Pubkey {
    pub const fn new(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(self) -> [u8; PUBKEY_BYTES] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; PUBKEY_BYTES] {
        &self.0
    }

    pub fn is_on_curve(&self) -> bool {
        CompressedEdwardsY(self.0).decompress().is_some()
    }

    /// Hashes `seeds` with `program_id` into an address that has no private
    /// key. Fails when the hash lands on the ed25519 curve.
    pub fn create_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<Pubkey> {
        check_seeds(seeds, MAX_SEEDS)?;
        let address = hash_seeds(seeds, program_id);
        if address.is_on_curve() {
            return Err(CrowdfundError::InvalidSeeds(
                "derived address lies on the curve".to_string(),
            ));
        }
        Ok(address)
    }

    /// Searches bump seeds from 255 down and returns the first off-curve
    /// address with its bump.
    pub fn find_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<(Pubkey, u8)> {
        check_seeds(seeds, MAX_SEEDS - 1)?;

        for bump in (0..=u8::MAX).rev() {
            let bump_seed = [bump];
            let mut with_bump: Vec<&[u8]> = seeds.to_vec();
            with_bump.push(&bump_seed);
            let address = hash_seeds(&with_bump, program_id);
            if !address.is_on_curve() {
                return Ok((address, bump));
            }
        }
        Err(CrowdfundError::NoViableBump)
    }
}

fn check_seeds(seeds: &[&[u8]], max_seeds: usize) -> Result<()> {
    if seeds.len() > max_seeds {
        return Err(CrowdfundError::InvalidSeeds(format!(
            "{} seeds given, at most {} allowed",
            seeds.len(),
            max_seeds
        )));
    }
    if let Some(seed) = seeds.iter().find(|seed| seed.len() > MAX_SEED_LEN) {
        return Err(CrowdfundError::InvalidSeeds(format!(
            "seed of {} bytes exceeds {} bytes",
            seed.len(),
            MAX_SEED_LEN
        )));
    }
    Ok(())
}

fn hash_seeds(seeds: &[&[u8]], program_id: &Pubkey) -> Pubkey {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update(program_id.as_bytes());
    hasher.update(PDA_MARKER);
    Pubkey(hasher.finalize().into())
}

impl FromStr for Pubkey {
    type Err = CrowdfundError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| CrowdfundError::InvalidPublicKey(format!("{}: {}", s, e)))?;
        let bytes: [u8; PUBKEY_BYTES] = bytes.try_into().map_err(|b: Vec<u8>| {
            CrowdfundError::InvalidPublicKey(format!("{}: expected 32 bytes, got {}", s, b.len()))
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({})", self)
    }
}
