use async_trait::async_trait;

use crate::error::Result;
use crate::solana::Pubkey;

pub mod phantom;

pub use phantom::PhantomWallet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectMode {
    /// Only succeeds if the user approved this site before; never prompts.
    Silent,
    /// May open the wallet's approval prompt.
    Prompt,
}

/// The injected wallet: key custody, approval prompts and signing live
/// behind this seam.
#[async_trait(?Send)]
pub trait WalletProvider {
    fn is_phantom(&self) -> bool;

    async fn connect(&self, mode: ConnectMode) -> Result<Pubkey>;

    /// Signs the serialized legacy message, submits it and returns the
    /// base58 transaction signature.
    async fn sign_and_send(&self, message: &[u8]) -> Result<String>;
}
