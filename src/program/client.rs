use std::future::Future;
use std::rc::Rc;

use async_trait::async_trait;
use js_sys::{Function, Promise};
use wasm_bindgen_futures::JsFuture;

use super::account::Campaign;
use super::instruction;
use crate::config::Config;
use crate::error::{CrowdfundError, Result};
use crate::solana::rpc::{decode_blockhash, AccountInfo, MemcmpFilter, SignatureStatus};
use crate::solana::{Commitment, Instruction, Message, Pubkey, RpcClient};
use crate::wallet::WalletProvider;

/// What the UI can ask of the crowdfunding program on behalf of the
/// connected user.
#[async_trait(?Send)]
pub trait CampaignProgram {
    /// The user's campaign address, derived from `[seed, user]`.
    fn campaign_address(&self, seed: &str) -> Result<Pubkey>;

    async fn campaign_addresses(&self) -> Result<Vec<Pubkey>>;

    async fn fetch_campaign(&self, address: &Pubkey) -> Result<Campaign>;

    async fn create(&self, campaign: &Pubkey, name: &str, description: &str) -> Result<String>;

    async fn donate(&self, campaign: &Pubkey, lamports: u64) -> Result<String>;

    async fn withdraw(&self, campaign: &Pubkey, lamports: u64) -> Result<String>;
}

/// Talks to the cluster over JSON-RPC and has the wallet sign.
pub struct ProgramClient<W: WalletProvider> {
    rpc: RpcClient,
    wallet: Rc<W>,
    program_id: Pubkey,
    user: Pubkey,
    confirm_polls: u32,
    poll_interval_ms: i32,
}

impl<W: WalletProvider> ProgramClient<W> {
    pub fn new(config: &Config, wallet: Rc<W>, user: Pubkey) -> Self {
        Self {
            rpc: RpcClient::new(config.cluster_url.clone(), config.commitment),
            wallet,
            program_id: config.program_id,
            user,
            confirm_polls: config.confirm_polls,
            poll_interval_ms: config.poll_interval_ms,
        }
    }

    async fn submit(&self, ix: Instruction) -> Result<String> {
        let latest = self.rpc.get_latest_blockhash().await?;
        let message = Message::new(&[ix], &self.user, decode_blockhash(&latest.blockhash)?);
        let signature = self.wallet.sign_and_send(&message.serialize()).await?;
        log::debug!("submitted {}", signature);
        self.confirm(&signature).await?;
        Ok(signature)
    }

    async fn confirm(&self, signature: &str) -> Result<()> {
        let interval = self.poll_interval_ms;
        poll_until_settled(
            signature,
            self.rpc.commitment(),
            self.confirm_polls,
            move || self.rpc.get_signature_status(signature),
            move || sleep(interval),
        )
        .await
    }
}

/// Decides one poll of a signature. `None` means keep polling.
fn poll_outcome(
    signature: &str,
    status: Option<&SignatureStatus>,
    target: Commitment,
) -> Option<Result<()>> {
    let status = status?;
    if let Some(err) = &status.err {
        return Some(Err(CrowdfundError::TransactionFailed {
            signature: signature.to_string(),
            reason: err.to_string(),
        }));
    }
    // nodes may omit the level for a landed transaction; it is at least processed
    let reached = status.confirmation_status.unwrap_or(Commitment::Processed);
    (reached >= target).then_some(Ok(()))
}

async fn poll_until_settled<S, SFut, P, PFut>(
    signature: &str,
    target: Commitment,
    polls: u32,
    mut fetch_status: S,
    mut pause: P,
) -> Result<()>
where
    S: FnMut() -> SFut,
    SFut: Future<Output = Result<Option<SignatureStatus>>>,
    P: FnMut() -> PFut,
    PFut: Future<Output = Result<()>>,
{
    for attempt in 1..=polls {
        let status = fetch_status().await?;
        if let Some(outcome) = poll_outcome(signature, status.as_ref(), target) {
            return outcome;
        }
        if attempt < polls {
            pause().await?;
        }
    }
    Err(CrowdfundError::ConfirmationTimeout(signature.to_string()))
}

/// Decodes a campaign, refusing accounts the program does not own.
fn campaign_from_account(info: &AccountInfo, program_id: &Pubkey) -> Result<Campaign> {
    let owner: Pubkey = info.owner.parse()?;
    if owner != *program_id {
        return Err(CrowdfundError::WrongOwner {
            expected: program_id.to_string(),
            actual: info.owner.clone(),
        });
    }
    Campaign::decode(&info.decode_data()?)
}

#[async_trait(?Send)]
impl<W: WalletProvider> CampaignProgram for ProgramClient<W> {
    fn campaign_address(&self, seed: &str) -> Result<Pubkey> {
        let seeds: [&[u8]; 2] = [seed.as_bytes(), self.user.as_bytes()];
        let (address, _bump) = Pubkey::find_program_address(&seeds, &self.program_id)?;
        Ok(address)
    }

    async fn campaign_addresses(&self) -> Result<Vec<Pubkey>> {
        let only_campaigns = MemcmpFilter {
            offset: 0,
            bytes: Campaign::discriminator().to_vec(),
        };
        self.rpc
            .get_program_account_keys(&self.program_id, &[only_campaigns])
            .await
    }

    async fn fetch_campaign(&self, address: &Pubkey) -> Result<Campaign> {
        let info = self.rpc.get_account_info(address).await?;
        campaign_from_account(&info, &self.program_id)
    }

    async fn create(&self, campaign: &Pubkey, name: &str, description: &str) -> Result<String> {
        let ix = instruction::create(&self.program_id, campaign, &self.user, name, description)?;
        self.submit(ix).await
    }

    async fn donate(&self, campaign: &Pubkey, lamports: u64) -> Result<String> {
        let ix = instruction::donate(&self.program_id, campaign, &self.user, lamports)?;
        self.submit(ix).await
    }

    async fn withdraw(&self, campaign: &Pubkey, lamports: u64) -> Result<String> {
        let ix = instruction::withdraw(&self.program_id, campaign, &self.user, lamports)?;
        self.submit(ix).await
    }
}

async fn sleep(ms: i32) -> Result<()> {
    let promise = Promise::new(&mut |resolve: Function, _reject: Function| {
        let scheduled = web_sys::window().map(|window| {
            window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
        });
        if !matches!(scheduled, Some(Ok(_))) {
            let _ = resolve.call0(&wasm_bindgen::JsValue::NULL);
        }
    });
    JsFuture::from(promise).await?;
    Ok(())
}
