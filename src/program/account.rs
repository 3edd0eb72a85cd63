use borsh::{BorshDeserialize, BorshSerialize};
use sha2::{Digest, Sha256};

use crate::error::{CrowdfundError, Result};
use crate::solana::Pubkey;

pub const DISCRIMINATOR_LEN: usize = 8;

/// First eight bytes of `sha256("account:<Name>")`, prefixed to every
/// account the program owns.
pub fn account_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let hash = Sha256::digest(format!("account:{}", name).as_bytes());
    let mut out = [0u8; DISCRIMINATOR_LEN];
    out.copy_from_slice(&hash[..DISCRIMINATOR_LEN]);
    out
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Campaign {
    pub admin: Pubkey,
    pub name: String,
    pub description: String,
    pub amount_donated: u64,
}

impl Campaign {
    pub fn discriminator() -> [u8; DISCRIMINATOR_LEN] {
        account_discriminator("Campaign")
    }

    /// Decodes raw account data. Accounts are allocated with spare room, so
    /// trailing bytes after the fields are ignored.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < DISCRIMINATOR_LEN {
            return Err(CrowdfundError::Decode(format!(
                "account data too short: {} bytes",
                data.len()
            )));
        }
        let (disc, mut body) = data.split_at(DISCRIMINATOR_LEN);
        if disc != Self::discriminator() {
            return Err(CrowdfundError::DiscriminatorMismatch);
        }
        Ok(Campaign::deserialize(&mut body)?)
    }
}

/// A campaign together with the address it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignEntry {
    pub address: Pubkey,
    pub campaign: Campaign,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(campaign: &Campaign) -> Vec<u8> {
        let mut data = Campaign::discriminator().to_vec();
        data.extend(borsh::to_vec(campaign).unwrap());
        data
    }

    fn sample() -> Campaign {
        Campaign {
            admin: Pubkey::new([3; 32]),
            name: "campaign name".to_string(),
            description: "campaign description".to_string(),
            amount_donated: 200_000_000,
        }
    }

    #[test]
    fn decodes_with_trailing_space() {
        let mut data = encoded(&sample());
        data.extend_from_slice(&[0u8; 64]);
        assert_eq!(Campaign::decode(&data).unwrap(), sample());
    }

    #[test]
    fn field_layout_is_admin_name_description_amount() {
        let data = encoded(&sample());
        assert_eq!(&data[8..40], &[3u8; 32]);
        assert_eq!(&data[40..44], &13u32.to_le_bytes());
        assert_eq!(&data[44..57], b"campaign name");
        let tail = &data[data.len() - 8..];
        assert_eq!(tail, &200_000_000u64.to_le_bytes());
    }

    #[test]
    fn rejects_other_account_types() {
        let mut data = encoded(&sample());
        data[0] ^= 0xff;
        assert!(matches!(
            Campaign::decode(&data),
            Err(CrowdfundError::DiscriminatorMismatch)
        ));
    }

    #[test]
    fn rejects_truncated_data() {
        assert!(Campaign::decode(&[1, 2, 3]).is_err());
        let data = encoded(&sample());
        assert!(matches!(
            Campaign::decode(&data[..20]),
            Err(CrowdfundError::Decode(_))
        ));
    }
}
