use async_trait::async_trait;
use gloo_utils::format::JsValueSerdeExt;
use js_sys::{Object, Promise, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use super::{ConnectMode, WalletProvider};
use crate::error::{CrowdfundError, Result};
use crate::solana::Pubkey;

#[wasm_bindgen]
extern "C" {
    /// `window.solana` as injected by the Phantom extension.
    #[wasm_bindgen(extends = Object)]
    pub type SolanaProvider;

    #[wasm_bindgen(method, getter, js_name = isPhantom)]
    fn is_phantom(this: &SolanaProvider) -> Option<bool>;

    #[wasm_bindgen(method, catch, js_name = connect)]
    fn connect_with(
        this: &SolanaProvider,
        options: &JsValue,
    ) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = connect)]
    fn connect_prompt(this: &SolanaProvider) -> std::result::Result<Promise, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn request(this: &SolanaProvider, args: &JsValue) -> std::result::Result<Promise, JsValue>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConnectOptions {
    only_if_trusted: bool,
}

#[derive(Serialize)]
struct SignAndSendRequest {
    method: &'static str,
    params: SignAndSendParams,
}

#[derive(Serialize)]
struct SignAndSendParams {
    message: String,
}

pub struct PhantomWallet {
    provider: SolanaProvider,
}

impl PhantomWallet {
    /// Looks up `window.solana`. `Ok(None)` means no extension injected one.
    pub fn injected() -> Result<Option<Self>> {
        let window = web_sys::window().ok_or(CrowdfundError::WalletNotFound)?;
        let solana = Reflect::get(&window, &JsValue::from_str("solana"))?;
        if solana.is_undefined() || solana.is_null() {
            return Ok(None);
        }
        Ok(Some(Self {
            provider: solana.unchecked_into(),
        }))
    }
}

#[async_trait(?Send)]
impl WalletProvider for PhantomWallet {
    fn is_phantom(&self) -> bool {
        self.provider.is_phantom().unwrap_or(false)
    }

    async fn connect(&self, mode: ConnectMode) -> Result<Pubkey> {
        let promise = match mode {
            ConnectMode::Silent => {
                let options = JsValue::from_serde(&ConnectOptions {
                    only_if_trusted: true,
                })?;
                self.provider.connect_with(&options)?
            }
            ConnectMode::Prompt => self.provider.connect_prompt()?,
        };
        let response = JsFuture::from(promise).await?;
        let key = Reflect::get(&response, &JsValue::from_str("publicKey"))?;
        if key.is_undefined() || key.is_null() {
            return Err(CrowdfundError::Wallet(
                "connect response carried no public key".to_string(),
            ));
        }
        let text = String::from(key.unchecked_into::<Object>().to_string());
        text.parse()
    }

    async fn sign_and_send(&self, message: &[u8]) -> Result<String> {
        let request = JsValue::from_serde(&SignAndSendRequest {
            method: "signAndSendTransaction",
            params: SignAndSendParams {
                message: bs58::encode(message).into_string(),
            },
        })?;
        let response = JsFuture::from(self.provider.request(&request)?).await?;
        Reflect::get(&response, &JsValue::from_str("signature"))?
            .as_string()
            .ok_or_else(|| CrowdfundError::Wallet("wallet returned no signature".to_string()))
    }
}
