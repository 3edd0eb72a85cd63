use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::pubkey::Pubkey;
use crate::error::{CrowdfundError, Result};

/// How settled a block must be before the node answers from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    result: Option<Value>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeyedAccount {
    pub pubkey: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfo {
    pub owner: String,
    /// `[payload, encoding]`
    pub data: (String, String),
}

impl AccountInfo {
    pub fn decode_data(&self) -> Result<Vec<u8>> {
        match self.data.1.as_str() {
            "base64" => Ok(STANDARD.decode(&self.data.0)?),
            other => Err(CrowdfundError::Decode(format!(
                "unsupported account encoding {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatestBlockhash {
    pub blockhash: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatus {
    pub confirmation_status: Option<Commitment>,
    pub err: Option<Value>,
}

/// `memcmp` filter for `getProgramAccounts`.
#[derive(Debug, Clone)]
pub struct MemcmpFilter {
    pub offset: usize,
    pub bytes: Vec<u8>,
}

impl MemcmpFilter {
    fn to_json(&self) -> Value {
        json!({
            "memcmp": {
                "offset": self.offset,
                "bytes": bs58::encode(&self.bytes).into_string(),
            }
        })
    }
}

/// JSON-RPC 2.0 client for the handful of cluster methods the app uses.
#[derive(Debug, Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    commitment: Commitment,
}

impl RpcClient {
    pub fn new(url: impl Into<String>, commitment: Commitment) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            commitment,
        }
    }

    pub fn commitment(&self) -> Commitment {
        self.commitment
    }

    async fn send<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        log::debug!("rpc -> {} {}", method, body["params"]);

        let response: Value = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        parse_response(response)
    }

    /// Keys of every account owned by `program_id` that passes `filters`.
    pub async fn get_program_account_keys(
        &self,
        program_id: &Pubkey,
        filters: &[MemcmpFilter],
    ) -> Result<Vec<Pubkey>> {
        let accounts: Vec<KeyedAccount> = self
            .send(
                "getProgramAccounts",
                program_accounts_params(program_id, filters, self.commitment),
            )
            .await?;
        accounts.iter().map(|a| a.pubkey.parse()).collect()
    }

    pub async fn get_account_info(&self, address: &Pubkey) -> Result<AccountInfo> {
        let info: WithContext<Option<AccountInfo>> = self
            .send(
                "getAccountInfo",
                json!([
                    address.to_string(),
                    { "encoding": "base64", "commitment": self.commitment }
                ]),
            )
            .await?;
        info.value
            .ok_or_else(|| CrowdfundError::AccountNotFound(address.to_string()))
    }

    pub async fn get_latest_blockhash(&self) -> Result<LatestBlockhash> {
        let latest: WithContext<LatestBlockhash> = self
            .send(
                "getLatestBlockhash",
                json!([{ "commitment": self.commitment }]),
            )
            .await?;
        Ok(latest.value)
    }

    pub async fn get_signature_status(&self, signature: &str) -> Result<Option<SignatureStatus>> {
        let statuses: WithContext<Vec<Option<SignatureStatus>>> = self
            .send("getSignatureStatuses", json!([[signature]]))
            .await?;
        Ok(statuses.value.into_iter().next().flatten())
    }
}

/// Keys-only listing: account data is sliced to nothing and callers fetch
/// what they need.
fn program_accounts_params(
    program_id: &Pubkey,
    filters: &[MemcmpFilter],
    commitment: Commitment,
) -> Value {
    let filters: Vec<Value> = filters.iter().map(MemcmpFilter::to_json).collect();
    json!([
        program_id.to_string(),
        {
            "encoding": "base64",
            "commitment": commitment,
            "dataSlice": { "offset": 0, "length": 0 },
            "filters": filters,
        }
    ])
}

fn parse_response<T: DeserializeOwned>(response: Value) -> Result<T> {
    let envelope: RpcEnvelope = serde_json::from_value(response)?;
    if let Some(err) = envelope.error {
        return Err(CrowdfundError::Rpc {
            code: err.code,
            message: err.message,
        });
    }
    let result = envelope
        .result
        .ok_or_else(|| CrowdfundError::Decode("rpc response has no result".to_string()))?;
    Ok(serde_json::from_value(result)?)
}

pub fn decode_blockhash(blockhash: &str) -> Result<[u8; 32]> {
    let key: Pubkey = blockhash
        .parse()
        .map_err(|_| CrowdfundError::Decode(format!("bad blockhash {}", blockhash)))?;
    Ok(key.to_bytes())
}
