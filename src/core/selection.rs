//! Selection state: at most one wallet/account pair plus the in-flight flag
//!
//! ```text
//! Disconnected --begin_connect--> Connecting --complete_connect--> Connected
//!       ^                              |                              |
//!       +---------fail_connect---------+                              |
//!       +-------------------clear / empty change----------------------+
//! ```
//!
//! `clear` bumps a generation counter so a connect that resolves after an
//! explicit disconnect is recognised as stale and dropped.

use serde::{Deserialize, Serialize};

use super::wallet::{Account, WalletRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Disconnected,
    Connecting,
    Connected,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Disconnected => "disconnected",
            Status::Connecting => "connecting",
            Status::Connected => "connected",
        }
    }
}

/// Ticket handed out by `begin_connect`; only the matching generation may finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectTicket(u64);

#[derive(Clone, Default)]
pub struct Selection {
    wallet: Option<WalletRef>,
    account: Option<Account>,
    connecting: bool,
    generation: u64,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Status {
        if self.connecting {
            Status::Connecting
        } else if self.wallet.is_some() && self.account.is_some() {
            Status::Connected
        } else {
            Status::Disconnected
        }
    }

    pub fn wallet(&self) -> Option<&WalletRef> {
        self.wallet.as_ref()
    }

    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    pub fn is_connecting(&self) -> bool {
        self.connecting
    }

    pub fn is_active(&self, wallet_id: &str) -> bool {
        self.wallet.as_ref().map(|w| w.id() == wallet_id).unwrap_or(false)
    }

    /// Enter `Connecting`. `None` if an attempt is already in flight.
    pub fn begin_connect(&mut self) -> Option<ConnectTicket> {
        if self.connecting {
            return None;
        }
        self.connecting = true;
        Some(ConnectTicket(self.generation))
    }

    /// Enter `Connected`. Returns false, changing nothing, for a stale ticket.
    pub fn complete_connect(
        &mut self,
        ticket: ConnectTicket,
        wallet: WalletRef,
        account: Account,
    ) -> bool {
        if ticket.0 != self.generation {
            return false;
        }
        self.wallet = Some(wallet);
        self.account = Some(account);
        self.connecting = false;
        true
    }

    /// Back to `Disconnected` after a failed attempt.
    pub fn fail_connect(&mut self, ticket: ConnectTicket) -> bool {
        if ticket.0 != self.generation {
            return false;
        }
        self.wallet = None;
        self.account = None;
        self.connecting = false;
        true
    }

    /// Replace the account of the active wallet. `None` drops the wallet
    /// through `drop_wallet`.
    pub fn set_account(&mut self, account: Option<Account>) {
        match account {
            Some(account) if self.wallet.is_some() => self.account = Some(account),
            _ => {
                self.drop_wallet();
            }
        }
    }

    /// Forget the active wallet because it went away. An attempt in flight
    /// (for another wallet) keeps its ticket.
    pub fn drop_wallet(&mut self) -> Option<WalletRef> {
        self.account = None;
        self.wallet.take()
    }

    /// Drop the selection and cancel any in-flight attempt. Returns the
    /// wallet that was selected.
    pub fn clear(&mut self) -> Option<WalletRef> {
        self.generation += 1;
        self.connecting = false;
        self.account = None;
        self.wallet.take()
    }
}
