use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::components::{campaign_list::CampaignList, wallet::WalletConnect};
use crate::config::Config;
use crate::controller;
use crate::program::{CampaignEntry, ProgramClient};
use crate::solana::Pubkey;
use crate::state::{Session, WalletPresence};
use crate::wallet::{ConnectMode, PhantomWallet};

pub struct App {
    wallet: Option<Rc<PhantomWallet>>,
    presence: WalletPresence,
    session: Session,
    program: Option<Rc<ProgramClient<PhantomWallet>>>,
    on_load: Option<Closure<dyn FnMut()>>,
}

pub enum Msg {
    PageLoaded,
    Connect,
    Connected(Pubkey),
    FetchCampaigns,
    CampaignsLoaded(Vec<CampaignEntry>),
    CreateCampaign,
    Donate(Pubkey),
    Withdraw(Pubkey),
}

#[derive(Properties, PartialEq)]
pub struct Props {
    pub config: Rc<Config>,
}

impl App {
    /// Fires `callback` once the page has finished loading; the extension
    /// injects `window.solana` before the load event.
    fn when_loaded(callback: Callback<()>) -> Option<Closure<dyn FnMut()>> {
        let window = web_sys::window()?;
        let complete = window
            .document()
            .map(|doc| doc.ready_state() == "complete")
            .unwrap_or(false);
        if complete {
            callback.emit(());
            return None;
        }

        let listener = Closure::<dyn FnMut()>::new(move || callback.emit(()));
        if let Err(e) =
            window.add_event_listener_with_callback("load", listener.as_ref().unchecked_ref())
        {
            log::error!("Error waiting for page load: {:?}", e);
            return None;
        }
        Some(listener)
    }

    fn spawn_connect(&self, ctx: &Context<Self>, mode: ConnectMode) {
        let Some(wallet) = self.wallet.clone() else {
            return;
        };
        let link = ctx.link().clone();
        spawn_local(async move {
            match controller::connect(wallet.as_ref(), mode).await {
                Ok(address) => link.send_message(Msg::Connected(address)),
                Err(e) if mode == ConnectMode::Silent => {
                    log::warn!("Wallet not connected on load: {}", e)
                }
                Err(e) => log::error!("Error connecting wallet: {}", e),
            }
        });
    }
}

impl Component for App {
    type Message = Msg;
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        let wallet = match PhantomWallet::injected() {
            Ok(wallet) => wallet.map(Rc::new),
            Err(e) => {
                log::error!("Error looking up the wallet: {}", e);
                None
            }
        };
        let presence = controller::check_wallet_presence(wallet.as_deref());

        Self {
            wallet,
            presence,
            session: Session::default(),
            program: None,
            on_load: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let config = ctx.props().config.clone();
        match msg {
            Msg::PageLoaded => {
                self.spawn_connect(ctx, ConnectMode::Silent);
                false
            }
            Msg::Connect => {
                self.spawn_connect(ctx, ConnectMode::Prompt);
                false
            }
            Msg::Connected(address) => {
                if !self.session.connect(address) {
                    return false;
                }
                if let Some(wallet) = self.wallet.clone() {
                    self.program = Some(Rc::new(ProgramClient::new(&config, wallet, address)));
                }
                true
            }
            Msg::FetchCampaigns => {
                if let Some(program) = self.program.clone() {
                    let link = ctx.link().clone();
                    spawn_local(async move {
                        match controller::fetch_campaigns(program.as_ref()).await {
                            Ok(campaigns) => link.send_message(Msg::CampaignsLoaded(campaigns)),
                            Err(e) => log::error!("Error fetching campaigns: {}", e),
                        }
                    });
                }
                false
            }
            Msg::CampaignsLoaded(campaigns) => {
                self.session.replace_campaigns(campaigns);
                true
            }
            Msg::CreateCampaign => {
                if let Some(program) = self.program.clone() {
                    spawn_local(async move {
                        controller::create_campaign(program.as_ref(), &config).await;
                    });
                }
                false
            }
            Msg::Donate(campaign) => {
                if let Some(program) = self.program.clone() {
                    let link = ctx.link().clone();
                    spawn_local(async move {
                        if let Some(campaigns) =
                            controller::donate(program.as_ref(), &config, campaign).await
                        {
                            link.send_message(Msg::CampaignsLoaded(campaigns));
                        }
                    });
                }
                false
            }
            Msg::Withdraw(campaign) => {
                if let Some(program) = self.program.clone() {
                    let link = ctx.link().clone();
                    spawn_local(async move {
                        if let Some(campaigns) =
                            controller::withdraw(program.as_ref(), &config, campaign).await
                        {
                            link.send_message(Msg::CampaignsLoaded(campaigns));
                        }
                    });
                }
                false
            }
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render && self.wallet.is_some() {
            self.on_load = Self::when_loaded(ctx.link().callback(|_: ()| Msg::PageLoaded));
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        if let (Some(listener), Some(window)) = (self.on_load.take(), web_sys::window()) {
            if let Err(e) = window
                .remove_event_listener_with_callback("load", listener.as_ref().unchecked_ref())
            {
                log::warn!("Error removing page load listener: {:?}", e);
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();

        html! {
            <div class="App">
                if let Some(status) = self.presence.status_message() {
                    <p>{status}</p>
                }
                if self.wallet.is_some() {
                    <WalletConnect
                        address={self.session.wallet_address()}
                        on_connect={link.callback(|_| Msg::Connect)}
                    />
                }
                if self.session.is_connected() {
                    <CampaignList
                        campaigns={self.session.campaigns().to_vec()}
                        on_create={link.callback(|_| Msg::CreateCampaign)}
                        on_refresh={link.callback(|_| Msg::FetchCampaigns)}
                        on_donate={link.callback(Msg::Donate)}
                        on_withdraw={link.callback(Msg::Withdraw)}
                    />
                }
            </div>
        }
    }
}
