use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

#[derive(Error, Debug)]
pub enum CrowdfundError {
    // Wallet errors
    #[error("Solana object not found")]
    WalletNotFound,

    #[error("Wallet error: {0}")]
    Wallet(String),

    // Network errors
    #[error("Network error: {0}")]
    Network(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Account owned by {actual}, expected {expected}")]
    WrongOwner { expected: String, actual: String },

    // Encoding errors
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Account discriminator mismatch")]
    DiscriminatorMismatch,

    // Address derivation errors
    #[error("Invalid seeds: {0}")]
    InvalidSeeds(String),

    #[error("Unable to find a viable program address bump seed")]
    NoViableBump,

    // Transaction errors
    #[error("Transaction {signature} failed: {reason}")]
    TransactionFailed { signature: String, reason: String },

    #[error("Transaction {0} was not confirmed in time")]
    ConfirmationTimeout(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<JsValue> for CrowdfundError {
    fn from(value: JsValue) -> Self {
        CrowdfundError::Wallet(js_error_message(&value))
    }
}

impl From<reqwest::Error> for CrowdfundError {
    fn from(err: reqwest::Error) -> Self {
        CrowdfundError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for CrowdfundError {
    fn from(err: serde_json::Error) -> Self {
        CrowdfundError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for CrowdfundError {
    // borsh reports malformed input through io::Error
    fn from(err: std::io::Error) -> Self {
        CrowdfundError::Decode(err.to_string())
    }
}

impl From<base64::DecodeError> for CrowdfundError {
    fn from(err: base64::DecodeError) -> Self {
        CrowdfundError::Decode(err.to_string())
    }
}

/// Best-effort text for a thrown JS value. Phantom rejects with plain
/// objects carrying `message`, so those are looked up by property too.
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    if let Some(text) = value.as_string() {
        return text;
    }
    if value.is_object() {
        if let Some(message) = js_sys::Reflect::get(value, &JsValue::from_str("message"))
            .ok()
            .and_then(|m| m.as_string())
        {
            return message;
        }
    }
    format!("{:?}", value)
}

pub type Result<T> = std::result::Result<T, CrowdfundError>;
