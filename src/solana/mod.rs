pub mod message;
pub mod pubkey;
pub mod rpc;

pub use message::{AccountMeta, Instruction, Message};
pub use pubkey::Pubkey;
pub use rpc::{Commitment, RpcClient};

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::new([0; 32]);
