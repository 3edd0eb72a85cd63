use crate::program::CampaignEntry;
use crate::solana::Pubkey;

/// What the page found at `window.solana`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletPresence {
    Missing,
    Phantom,
    /// Some other provider injected itself; nothing is shown for it.
    Other,
}

impl WalletPresence {
    pub fn status_message(self) -> Option<&'static str> {
        match self {
            WalletPresence::Missing => Some("Solana object not found"),
            WalletPresence::Phantom => Some("Phantom wallet found!"),
            WalletPresence::Other => None,
        }
    }
}

/// Session state behind the page. The address only ever goes from absent
/// to present; campaigns are swapped wholesale on every fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    wallet_address: Option<Pubkey>,
    campaigns: Vec<CampaignEntry>,
}

impl Session {
    pub fn wallet_address(&self) -> Option<Pubkey> {
        self.wallet_address
    }

    pub fn is_connected(&self) -> bool {
        self.wallet_address.is_some()
    }

    /// Records a successful connect. Returns false if this was only a
    /// repeat of the address already held.
    pub fn connect(&mut self, address: Pubkey) -> bool {
        let changed = self.wallet_address != Some(address);
        self.wallet_address = Some(address);
        changed
    }

    pub fn campaigns(&self) -> &[CampaignEntry] {
        &self.campaigns
    }

    pub fn replace_campaigns(&mut self, campaigns: Vec<CampaignEntry>) {
        self.campaigns = campaigns;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::Campaign;

    fn entry(n: u8) -> CampaignEntry {
        CampaignEntry {
            address: Pubkey::new([n; 32]),
            campaign: Campaign {
                admin: Pubkey::new([0; 32]),
                name: format!("campaign {}", n),
                description: String::new(),
                amount_donated: 0,
            },
        }
    }

    #[test]
    fn starts_disconnected_and_empty() {
        let session = Session::default();
        assert!(!session.is_connected());
        assert_eq!(session.wallet_address(), None);
        assert!(session.campaigns().is_empty());
    }

    #[test]
    fn connect_is_one_way() {
        let mut session = Session::default();
        let key = Pubkey::new([1; 32]);
        assert!(session.connect(key));
        assert!(!session.connect(key));
        assert_eq!(session.wallet_address(), Some(key));
    }

    #[test]
    fn campaigns_are_replaced_not_merged() {
        let mut session = Session::default();
        session.replace_campaigns(vec![entry(1), entry(2)]);
        session.replace_campaigns(vec![entry(3)]);
        assert_eq!(session.campaigns(), &[entry(3)]);
    }

    #[test]
    fn status_lines() {
        assert_eq!(
            WalletPresence::Missing.status_message(),
            Some("Solana object not found")
        );
        assert_eq!(
            WalletPresence::Phantom.status_message(),
            Some("Phantom wallet found!")
        );
        assert_eq!(WalletPresence::Other.status_message(), None);
    }
}
