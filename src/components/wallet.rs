use yew::prelude::*;

use crate::solana::Pubkey;
use crate::utils::abbreviate;

pub struct WalletConnect;

pub enum Msg {
    Connect,
}

#[derive(Properties, PartialEq)]
pub struct Props {
    pub address: Option<Pubkey>,
    pub on_connect: Callback<()>,
}

impl Component for WalletConnect {
    type Message = Msg;
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        Self
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Connect => {
                ctx.props().on_connect.emit(());
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let onclick = ctx.link().callback(|_| Msg::Connect);

        html! {
            <div class="wallet-section">
                if let Some(address) = ctx.props().address {
                    <div class="connected-status">
                        {"Wallet Connected"}
                        <div class="wallet-address">
                            {format!("Address: {}", abbreviate(&address.to_string()))}
                        </div>
                    </div>
                } else {
                    <button class="connect-button" {onclick}>
                        {"Connect Wallet"}
                    </button>
                }
            </div>
        }
    }
}
