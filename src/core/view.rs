//! Render models for the button and the wallet picker
//!
//! The connector computes plain models; a `WidgetView` (the DOM in the
//! browser) draws them.

use serde::Serialize;

use super::selection::{Selection, Status};
use super::wallet::WalletRef;
use crate::config::Labels;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonModel {
    pub label: String,
    pub status: Status,
    /// Full address, for the tooltip.
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickerEntry {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickerModel {
    pub open: bool,
    pub entries: Vec<PickerEntry>,
    /// Set when there is nothing to list.
    pub empty_message: Option<String>,
    pub show_disconnect: bool,
    pub disconnect_label: String,
}

pub trait WidgetView {
    fn render_button(&self, model: &ButtonModel);
    fn render_picker(&self, model: &PickerModel);
}

/// `0x1234...abcd` for anything longer than 10 characters.
pub fn truncate_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

pub fn button_model(selection: &Selection, labels: &Labels) -> ButtonModel {
    let status = selection.status();
    match (status, selection.account()) {
        (Status::Connected, Some(account)) => ButtonModel {
            label: truncate_address(&account.address),
            status,
            title: Some(account.address.clone()),
        },
        (Status::Connecting, _) => ButtonModel {
            label: labels.connecting.clone(),
            status,
            title: None,
        },
        _ => ButtonModel { label: labels.connect.clone(), status, title: None },
    }
}

pub fn picker_model(
    wallets: &[WalletRef],
    selection: &Selection,
    open: bool,
    labels: &Labels,
) -> PickerModel {
    let entries: Vec<PickerEntry> = wallets
        .iter()
        .map(|w| {
            let id = w.id();
            PickerEntry {
                active: selection.is_active(&id),
                id,
                name: w.name(),
                icon: w.icon(),
            }
        })
        .collect();
    PickerModel {
        open,
        empty_message: entries.is_empty().then(|| labels.empty.clone()),
        entries,
        show_disconnect: selection.status() == Status::Connected,
        disconnect_label: labels.disconnect.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stub::stub_wallet;
    use crate::core::wallet::Account;

    #[test]
    fn truncates_long_addresses() {
        assert_eq!(truncate_address("0xabcdef0123456789"), "0xabcd...6789");
        assert_eq!(truncate_address("0xabc"), "0xabc");
        assert_eq!(truncate_address("0x12345678"), "0x12345678");
    }

    #[test]
    fn button_follows_status() {
        let labels = Labels::default();
        let mut selection = Selection::new();
        assert_eq!(button_model(&selection, &labels).label, labels.connect);

        let ticket = selection.begin_connect().unwrap();
        assert_eq!(button_model(&selection, &labels).label, labels.connecting);

        let address = "0xabc0000000000000000000000000000000000000000000000000000000000001";
        selection.complete_connect(
            ticket,
            stub_wallet("W", &[]),
            Account::new(address, vec!["sui:mainnet".into()]),
        );
        let model = button_model(&selection, &labels);
        assert_eq!(model.label, "0xabc0...0001");
        assert_eq!(model.title.as_deref(), Some(address));
        assert_eq!(model.status, Status::Connected);
    }

    #[test]
    fn empty_picker_shows_message() {
        let labels = Labels::default();
        let model = picker_model(&[], &Selection::new(), true, &labels);
        assert!(model.entries.is_empty());
        assert_eq!(model.empty_message.as_deref(), Some(labels.empty.as_str()));
        assert!(!model.show_disconnect);
    }

    #[test]
    fn picker_marks_active_wallet() {
        let labels = Labels::default();
        let wallets = vec![stub_wallet("A", &[]), stub_wallet("B", &[])];
        let mut selection = Selection::new();
        let ticket = selection.begin_connect().unwrap();
        selection.complete_connect(ticket, wallets[1].clone(), Account::new("0x1", vec![]));

        let model = picker_model(&wallets, &selection, false, &labels);
        assert_eq!(model.empty_message, None);
        assert!(!model.entries[0].active);
        assert!(model.entries[1].active);
        assert!(model.show_disconnect);
    }
}
