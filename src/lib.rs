use std::rc::Rc;

use wasm_bindgen::prelude::*;

mod app;
mod components;
pub mod config;
pub mod controller;
pub mod error;
pub mod program;
pub mod solana;
pub mod state;
mod utils;
pub mod wallet;

pub use error::{CrowdfundError, Result};

#[wasm_bindgen(start)]
pub fn run_app() -> std::result::Result<(), JsValue> {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    wasm_logger::init(wasm_logger::Config::default());

    let config = config::Config::from_build_env().map_err(|e| {
        log::error!("{}", e);
        JsValue::from_str(&e.to_string())
    })?;
    log::info!(
        "using program {} on {}",
        config.program_id,
        config.cluster_url
    );

    yew::Renderer::<app::App>::with_props(app::Props {
        config: Rc::new(config),
    })
    .render();
    Ok(())
}
