pub mod campaign_list;
pub mod wallet;
