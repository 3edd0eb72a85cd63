use borsh::BorshSerialize;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::solana::{AccountMeta, Instruction, Pubkey, SYSTEM_PROGRAM_ID};

/// First eight bytes of `sha256("global:<name>")`, selecting the handler.
pub fn instruction_discriminator(name: &str) -> [u8; 8] {
    let hash = Sha256::digest(format!("global:{}", name).as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&hash[..8]);
    out
}

fn instruction_data<A: BorshSerialize>(name: &str, args: &A) -> Result<Vec<u8>> {
    let mut data = instruction_discriminator(name).to_vec();
    args.serialize(&mut data)?;
    Ok(data)
}

pub fn create(
    program_id: &Pubkey,
    campaign: &Pubkey,
    user: &Pubkey,
    name: &str,
    description: &str,
) -> Result<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*campaign, false),
            AccountMeta::new(*user, true),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ],
        data: instruction_data("create", &(name.to_string(), description.to_string()))?,
    })
}

pub fn donate(
    program_id: &Pubkey,
    campaign: &Pubkey,
    user: &Pubkey,
    lamports: u64,
) -> Result<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*campaign, false),
            AccountMeta::new(*user, true),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ],
        data: instruction_data("donate", &lamports)?,
    })
}

pub fn withdraw(
    program_id: &Pubkey,
    campaign: &Pubkey,
    user: &Pubkey,
    lamports: u64,
) -> Result<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*campaign, false),
            AccountMeta::new(*user, true),
        ],
        data: instruction_data("withdraw", &lamports)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROGRAM: Pubkey = Pubkey::new([9; 32]);
    const CAMPAIGN: Pubkey = Pubkey::new([2; 32]);
    const USER: Pubkey = Pubkey::new([1; 32]);

    #[test]
    fn discriminators_differ_per_handler() {
        let names = ["create", "donate", "withdraw"];
        let discs: Vec<[u8; 8]> = names.iter().map(|n| instruction_discriminator(n)).collect();
        assert_ne!(discs[0], discs[1]);
        assert_ne!(discs[1], discs[2]);
        assert_ne!(discs[0], discs[2]);
    }

    #[test]
    fn create_carries_two_length_prefixed_strings() {
        let ix = create(&PROGRAM, &CAMPAIGN, &USER, "ab", "xyz").unwrap();
        assert_eq!(&ix.data[..8], &instruction_discriminator("create"));
        assert_eq!(
            &ix.data[8..],
            &[2, 0, 0, 0, b'a', b'b', 3, 0, 0, 0, b'x', b'y', b'z']
        );
        assert_eq!(ix.accounts[2].pubkey, SYSTEM_PROGRAM_ID);
        assert!(!ix.accounts[2].is_writable);
    }

    #[test]
    fn donate_amount_is_little_endian_u64() {
        let ix = donate(&PROGRAM, &CAMPAIGN, &USER, 200_000_000).unwrap();
        assert_eq!(ix.data.len(), 16);
        assert_eq!(&ix.data[8..], &200_000_000u64.to_le_bytes());
        assert!(ix.accounts[1].is_signer);
    }

    #[test]
    fn withdraw_needs_no_system_program() {
        let ix = withdraw(&PROGRAM, &CAMPAIGN, &USER, 100_000_000).unwrap();
        assert_eq!(ix.accounts.len(), 2);
        assert_eq!(ix.accounts[0].pubkey, CAMPAIGN);
        assert!(ix.accounts[0].is_writable);
    }
}
