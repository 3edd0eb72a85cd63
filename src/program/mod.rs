//! Client side of the deployed crowdfunding program: its account layout,
//! its instructions, and a client that submits them through the wallet.

pub mod account;
pub mod client;
pub mod instruction;

pub use account::{Campaign, CampaignEntry};
pub use client::{CampaignProgram, ProgramClient};
