use super::pubkey::Pubkey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn new(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    pub fn new_readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

/// Legacy (pre-versioned) transaction message; the wallet signs its
/// serialized bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    pub account_keys: Vec<Pubkey>,
    pub recent_blockhash: [u8; 32],
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    pub fn new(instructions: &[Instruction], payer: &Pubkey, recent_blockhash: [u8; 32]) -> Self {
        let mut metas: Vec<AccountMeta> = vec![AccountMeta::new(*payer, true)];
        for ix in instructions {
            for meta in &ix.accounts {
                merge_meta(&mut metas, meta.clone());
            }
            merge_meta(&mut metas, AccountMeta::new_readonly(ix.program_id, false));
        }

        // payer stays at index 0; the rest keep insertion order within each class
        let rank = |m: &AccountMeta| match (m.is_signer, m.is_writable) {
            (true, true) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (false, false) => 3,
        };
        metas[1..].sort_by_key(rank);

        let count = |signer: bool, writable: bool| {
            metas
                .iter()
                .filter(|m| m.is_signer == signer && m.is_writable == writable)
                .count() as u8
        };
        let header = MessageHeader {
            num_required_signatures: metas.iter().filter(|m| m.is_signer).count() as u8,
            num_readonly_signed_accounts: count(true, false),
            num_readonly_unsigned_accounts: count(false, false),
        };

        let account_keys: Vec<Pubkey> = metas.iter().map(|m| m.pubkey).collect();
        let index_of = |key: &Pubkey| {
            account_keys
                .iter()
                .position(|k| k == key)
                .unwrap_or_default() as u8
        };
        let instructions = instructions
            .iter()
            .map(|ix| CompiledInstruction {
                program_id_index: index_of(&ix.program_id),
                accounts: ix.accounts.iter().map(|m| index_of(&m.pubkey)).collect(),
                data: ix.data.clone(),
            })
            .collect();

        Self {
            header,
            account_keys,
            recent_blockhash,
            instructions,
        }
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = vec![
            self.header.num_required_signatures,
            self.header.num_readonly_signed_accounts,
            self.header.num_readonly_unsigned_accounts,
        ];
        write_short_u16(&mut out, self.account_keys.len());
        for key in &self.account_keys {
            out.extend_from_slice(key.as_bytes());
        }
        out.extend_from_slice(&self.recent_blockhash);
        write_short_u16(&mut out, self.instructions.len());
        for ix in &self.instructions {
            out.push(ix.program_id_index);
            write_short_u16(&mut out, ix.accounts.len());
            out.extend_from_slice(&ix.accounts);
            write_short_u16(&mut out, ix.data.len());
            out.extend_from_slice(&ix.data);
        }
        out
    }
}

fn merge_meta(metas: &mut Vec<AccountMeta>, meta: AccountMeta) {
    match metas.iter_mut().find(|m| m.pubkey == meta.pubkey) {
        Some(existing) => {
            existing.is_signer |= meta.is_signer;
            existing.is_writable |= meta.is_writable;
        }
        None => metas.push(meta),
    }
}

/// Compact-u16 length prefix: 7 bits per byte, high bit set on all but the last.
fn write_short_u16(out: &mut Vec<u8>, len: usize) {
    let mut rem = len as u16;
    loop {
        let mut byte = (rem & 0x7f) as u8;
        rem >>= 7;
        if rem == 0 {
            out.push(byte);
            break;
        }
        byte |= 0x80;
        out.push(byte);
    }
}
