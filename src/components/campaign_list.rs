use yew::prelude::*;

use crate::program::CampaignEntry;
use crate::solana::Pubkey;
use crate::utils::lamports_to_sol;

pub struct CampaignList;

pub enum Msg {
    Create,
    Refresh,
    Donate(Pubkey),
    Withdraw(Pubkey),
}

#[derive(Properties, PartialEq)]
pub struct Props {
    pub campaigns: Vec<CampaignEntry>,
    pub on_create: Callback<()>,
    pub on_refresh: Callback<()>,
    pub on_donate: Callback<Pubkey>,
    pub on_withdraw: Callback<Pubkey>,
}

impl Component for CampaignList {
    type Message = Msg;
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        Self
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let props = ctx.props();
        match msg {
            Msg::Create => props.on_create.emit(()),
            Msg::Refresh => props.on_refresh.emit(()),
            Msg::Donate(campaign) => props.on_donate.emit(campaign),
            Msg::Withdraw(campaign) => props.on_withdraw.emit(campaign),
        }
        false
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();

        html! {
            <div class="campaigns">
                <button onclick={link.callback(|_| Msg::Create)}>
                    {"Create a campaign…"}
                </button>
                <button onclick={link.callback(|_| Msg::Refresh)}>
                    {"Get a list of campaigns…"}
                </button>
                <br/>
                { for ctx.props().campaigns.iter().map(|entry| {
                    let address = entry.address;
                    let balance = lamports_to_sol(entry.campaign.amount_donated);
                    html! {
                        <div class="campaign" key={address.to_string()}>
                            <p>{format!("Campaign ID: {}", address)}</p>
                            <p>
                                {format!("Balance: {}", balance)}
                            </p>
                            <p>{entry.campaign.name.clone()}</p>
                            <p>{entry.campaign.description.clone()}</p>
                            <button onclick={link.callback(move |_| Msg::Donate(address))}>
                                {"Click to donate!"}
                            </button>
                            <button onclick={link.callback(move |_| Msg::Withdraw(address))}>
                                {"Click to withdraw!"}
                            </button>
                        </div>
                    }
                }) }
            </div>
        }
    }
}
