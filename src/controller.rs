//! The page's flows, independent of how they are rendered.
//!
//! Fetching is fallible and returns its error to the caller. Creating,
//! donating and withdrawing log their own failure and report `None`; nothing
//! is updated optimistically so there is nothing to roll back.

use futures::future::try_join_all;

use crate::config::Config;
use crate::error::{CrowdfundError, Result};
use crate::program::{CampaignEntry, CampaignProgram};
use crate::solana::Pubkey;
use crate::state::WalletPresence;
use crate::wallet::{ConnectMode, WalletProvider};

pub fn check_wallet_presence<W: WalletProvider + ?Sized>(wallet: Option<&W>) -> WalletPresence {
    match wallet {
        None => WalletPresence::Missing,
        Some(wallet) if wallet.is_phantom() => WalletPresence::Phantom,
        Some(_) => WalletPresence::Other,
    }
}

pub async fn connect<W: WalletProvider + ?Sized>(wallet: &W, mode: ConnectMode) -> Result<Pubkey> {
    let address = wallet.connect(mode).await?;
    match mode {
        ConnectMode::Silent => log::info!("Connected with public key: {}", address),
        ConnectMode::Prompt => log::info!("New connection with public key: {}", address),
    }
    Ok(address)
}

/// Lists the program's campaigns and loads them all concurrently. Any
/// single failure fails the whole fetch.
pub async fn fetch_campaigns<P: CampaignProgram + ?Sized>(
    program: &P,
) -> Result<Vec<CampaignEntry>> {
    let addresses = program.campaign_addresses().await?;
    log::debug!("loading {} campaigns", addresses.len());
    try_join_all(addresses.into_iter().map(|address| async move {
        let campaign = program.fetch_campaign(&address).await?;
        Ok::<_, CrowdfundError>(CampaignEntry { address, campaign })
    }))
    .await
}

pub async fn create_campaign<P: CampaignProgram + ?Sized>(
    program: &P,
    config: &Config,
) -> Option<Pubkey> {
    match try_create(program, config).await {
        Ok(address) => {
            log::info!("Created new campaign with address: {}", address);
            Some(address)
        }
        Err(e) => {
            log::error!("Error creating campaign account: {}", e);
            None
        }
    }
}

async fn try_create<P: CampaignProgram + ?Sized>(program: &P, config: &Config) -> Result<Pubkey> {
    let campaign = program.campaign_address(&config.campaign_seed)?;
    program
        .create(&campaign, &config.campaign_name, &config.campaign_description)
        .await?;
    Ok(campaign)
}

/// Donates the configured amount, then returns the refreshed campaign list.
pub async fn donate<P: CampaignProgram + ?Sized>(
    program: &P,
    config: &Config,
    campaign: Pubkey,
) -> Option<Vec<CampaignEntry>> {
    match try_donate(program, config, campaign).await {
        Ok(campaigns) => Some(campaigns),
        Err(e) => {
            log::error!("Error donating: {}", e);
            None
        }
    }
}

async fn try_donate<P: CampaignProgram + ?Sized>(
    program: &P,
    config: &Config,
    campaign: Pubkey,
) -> Result<Vec<CampaignEntry>> {
    program.donate(&campaign, config.donation_lamports).await?;
    log::info!("Donated some SOL to: {}", campaign);
    fetch_campaigns(program).await
}

/// Withdraws the configured amount, then returns the refreshed campaign list.
pub async fn withdraw<P: CampaignProgram + ?Sized>(
    program: &P,
    config: &Config,
    campaign: Pubkey,
) -> Option<Vec<CampaignEntry>> {
    match try_withdraw(program, config, campaign).await {
        Ok(campaigns) => Some(campaigns),
        Err(e) => {
            log::error!("Error withdrawing: {}", e);
            None
        }
    }
}

async fn try_withdraw<P: CampaignProgram + ?Sized>(
    program: &P,
    config: &Config,
    campaign: Pubkey,
) -> Result<Vec<CampaignEntry>> {
    program.withdraw(&campaign, config.withdrawal_lamports).await?;
    log::info!("Withdrew some SOL from: {}", campaign);
    fetch_campaigns(program).await
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use async_trait::async_trait;
    use futures::executor::block_on;

    use super::*;
    use crate::program::Campaign;

    const USER: Pubkey = Pubkey::new([1; 32]);
    const PROGRAM_ID: Pubkey = Pubkey::new([9; 32]);

    struct FakeWallet {
        phantom: bool,
        trusted: bool,
    }

    #[async_trait(?Send)]
    impl WalletProvider for FakeWallet {
        fn is_phantom(&self) -> bool {
            self.phantom
        }

        async fn connect(&self, mode: ConnectMode) -> Result<Pubkey> {
            if mode == ConnectMode::Silent && !self.trusted {
                return Err(CrowdfundError::Wallet("User rejected the request.".to_string()));
            }
            Ok(USER)
        }

        async fn sign_and_send(&self, _message: &[u8]) -> Result<String> {
            Ok("sig".to_string())
        }
    }

    #[derive(Default)]
    struct FakeProgram {
        /// `None` stands for an account that fails to load.
        accounts: RefCell<Vec<(Pubkey, Option<Campaign>)>>,
        reject_submissions: bool,
        submitted: RefCell<Vec<String>>,
    }

    impl FakeProgram {
        fn with_campaigns(n: u8) -> Self {
            let program = FakeProgram::default();
            for i in 0..n {
                program
                    .accounts
                    .borrow_mut()
                    .push((Pubkey::new([10 + i; 32]), Some(campaign(i))));
            }
            program
        }

        fn submit(&self, call: String) -> Result<String> {
            if self.reject_submissions {
                return Err(CrowdfundError::TransactionFailed {
                    signature: "sig".to_string(),
                    reason: "custom program error: 0x1".to_string(),
                });
            }
            self.submitted.borrow_mut().push(call);
            Ok("sig".to_string())
        }
    }

    fn campaign(i: u8) -> Campaign {
        Campaign {
            admin: USER,
            name: format!("campaign {}", i),
            description: "demo".to_string(),
            amount_donated: u64::from(i) * 1_000,
        }
    }

    #[async_trait(?Send)]
    impl CampaignProgram for FakeProgram {
        fn campaign_address(&self, seed: &str) -> Result<Pubkey> {
            let seeds: [&[u8]; 2] = [seed.as_bytes(), USER.as_bytes()];
            Ok(Pubkey::find_program_address(&seeds, &PROGRAM_ID)?.0)
        }

        async fn campaign_addresses(&self) -> Result<Vec<Pubkey>> {
            Ok(self.accounts.borrow().iter().map(|(k, _)| *k).collect())
        }

        async fn fetch_campaign(&self, address: &Pubkey) -> Result<Campaign> {
            self.accounts
                .borrow()
                .iter()
                .find(|(k, _)| k == address)
                .and_then(|(_, c)| c.clone())
                .ok_or_else(|| CrowdfundError::AccountNotFound(address.to_string()))
        }

        async fn create(&self, campaign: &Pubkey, name: &str, description: &str) -> Result<String> {
            self.submit(format!("create {} {} {}", campaign, name, description))
        }

        async fn donate(&self, campaign: &Pubkey, lamports: u64) -> Result<String> {
            self.submit(format!("donate {} {}", campaign, lamports))
        }

        async fn withdraw(&self, campaign: &Pubkey, lamports: u64) -> Result<String> {
            self.submit(format!("withdraw {} {}", campaign, lamports))
        }
    }

    fn config() -> Config {
        Config::with_overrides(None, None).unwrap()
    }

    #[test]
    fn presence_reflects_injected_object() {
        assert_eq!(
            check_wallet_presence::<FakeWallet>(None),
            WalletPresence::Missing
        );
        let phantom = FakeWallet { phantom: true, trusted: false };
        assert_eq!(check_wallet_presence(Some(&phantom)), WalletPresence::Phantom);
        let other = FakeWallet { phantom: false, trusted: false };
        assert_eq!(check_wallet_presence(Some(&other)), WalletPresence::Other);
    }

    #[test]
    fn silent_connect_needs_prior_trust() {
        let wallet = FakeWallet { phantom: true, trusted: false };
        assert!(block_on(connect(&wallet, ConnectMode::Silent)).is_err());
        assert_eq!(block_on(connect(&wallet, ConnectMode::Prompt)).unwrap(), USER);

        let trusted = FakeWallet { phantom: true, trusted: true };
        assert_eq!(block_on(connect(&trusted, ConnectMode::Silent)).unwrap(), USER);
    }

    #[test]
    fn fetch_keeps_listing_order() {
        let program = FakeProgram::with_campaigns(3);
        let entries = block_on(fetch_campaigns(&program)).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.campaign.name.as_str()).collect();
        assert_eq!(names, ["campaign 0", "campaign 1", "campaign 2"]);
        assert_eq!(entries[1].address, Pubkey::new([11; 32]));
    }

    #[test]
    fn one_failed_account_fails_the_fetch() {
        let program = FakeProgram::with_campaigns(2);
        program
            .accounts
            .borrow_mut()
            .push((Pubkey::new([99; 32]), None));
        let err = block_on(fetch_campaigns(&program)).unwrap_err();
        assert!(matches!(err, CrowdfundError::AccountNotFound(_)));
    }

    #[test]
    fn create_uses_derived_address_and_fixed_texts() {
        let program = FakeProgram::default();
        let config = config();
        let address = block_on(create_campaign(&program, &config)).unwrap();

        assert_eq!(address, program.campaign_address("CAMPAIGN_DEMO").unwrap());
        assert_eq!(
            program.submitted.borrow().as_slice(),
            [format!("create {} campaign name campaign description", address)]
        );
    }

    #[test]
    fn failures_are_swallowed() {
        let program = FakeProgram {
            reject_submissions: true,
            ..FakeProgram::with_campaigns(1)
        };
        let config = config();
        let target = Pubkey::new([10; 32]);

        assert_eq!(block_on(create_campaign(&program, &config)), None);
        assert_eq!(block_on(donate(&program, &config, target)), None);
        assert_eq!(block_on(withdraw(&program, &config, target)), None);
        assert!(program.submitted.borrow().is_empty());
    }

    #[test]
    fn donate_and_withdraw_refresh_the_list() {
        let program = FakeProgram::with_campaigns(2);
        let config = config();
        let target = Pubkey::new([10; 32]);

        let after_donate = block_on(donate(&program, &config, target)).unwrap();
        assert_eq!(after_donate.len(), 2);
        let after_withdraw = block_on(withdraw(&program, &config, target)).unwrap();
        assert_eq!(after_withdraw.len(), 2);

        assert_eq!(
            program.submitted.borrow().as_slice(),
            [
                format!("donate {} 200000000", target),
                format!("withdraw {} 100000000", target),
            ]
        );
    }

    #[test]
    fn donation_counts_as_failed_when_refresh_fails() {
        let program = FakeProgram::with_campaigns(1);
        program
            .accounts
            .borrow_mut()
            .push((Pubkey::new([99; 32]), None));
        let config = config();
        assert_eq!(
            block_on(donate(&program, &config, Pubkey::new([10; 32]))),
            None
        );
        assert_eq!(program.submitted.borrow().len(), 1);
    }
}
