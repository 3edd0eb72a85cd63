use crate::error::{CrowdfundError, Result};
use crate::solana::{Commitment, Pubkey};
use crate::utils::sol_to_lamports;

pub const DEVNET_URL: &str = "https://api.devnet.solana.com";

/// Address the crowdfunding program is deployed at on devnet.
pub const DEFAULT_PROGRAM_ID: &str = "APYgnq4v7MBPS3grGTBNh3Y2YJGkbvLRsrPJSWJuwrR8";

pub const CAMPAIGN_SEED: &str = "CAMPAIGN_DEMO";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub cluster_url: String,
    pub program_id: Pubkey,
    pub commitment: Commitment,
    pub campaign_seed: String,
    pub campaign_name: String,
    pub campaign_description: String,
    pub donation_lamports: u64,
    pub withdrawal_lamports: u64,
    pub confirm_polls: u32,
    pub poll_interval_ms: i32,
}

impl Config {
    /// Defaults, with `CROWDFUND_RPC_URL` and `CROWDFUND_PROGRAM_ID` taken
    /// from the build environment when set.
    pub fn from_build_env() -> Result<Self> {
        Self::with_overrides(
            option_env!("CROWDFUND_RPC_URL"),
            option_env!("CROWDFUND_PROGRAM_ID"),
        )
    }

    pub fn with_overrides(rpc_url: Option<&str>, program_id: Option<&str>) -> Result<Self> {
        let cluster_url = rpc_url.unwrap_or(DEVNET_URL).trim();
        if !(cluster_url.starts_with("https://") || cluster_url.starts_with("http://")) {
            return Err(CrowdfundError::Config(format!(
                "rpc url must be http(s): {}",
                cluster_url
            )));
        }
        let program_id: Pubkey = program_id
            .unwrap_or(DEFAULT_PROGRAM_ID)
            .trim()
            .parse()
            .map_err(|e| CrowdfundError::Config(format!("program id: {}", e)))?;

        Ok(Self {
            cluster_url: cluster_url.to_string(),
            program_id,
            commitment: Commitment::Processed,
            campaign_seed: CAMPAIGN_SEED.to_string(),
            campaign_name: "campaign name".to_string(),
            campaign_description: "campaign description".to_string(),
            donation_lamports: sol_to_lamports(0.2),
            withdrawal_lamports: sol_to_lamports(0.1),
            confirm_polls: 30,
            poll_interval_ms: 1_000,
        })
    }
}
