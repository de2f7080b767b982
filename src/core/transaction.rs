//! Transaction payloads as handed to wallets
//!
//! The widget never builds transactions. It carries the application's
//! serialized transaction data (the `Transaction.toJSON()` shape) and only
//! touches the `sender` field.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transaction(Value);

impl Transaction {
    pub fn from_json(value: Value) -> Self {
        Self(value)
    }

    /// Parse a `toJSON()` string. Anything that is not JSON is kept as an
    /// opaque string payload (e.g. base64 transaction bytes).
    pub fn parse(raw: &str) -> Self {
        serde_json::from_str(raw)
            .map(Self)
            .unwrap_or_else(|_| Self(Value::String(raw.to_string())))
    }

    pub fn sender(&self) -> Option<&str> {
        self.0.get("sender").and_then(Value::as_str)
    }

    /// Set the sender when the payload has none. Returns true if it was set.
    pub fn set_sender_if_unset(&mut self, address: &str) -> bool {
        if self.sender().is_some() {
            return false;
        }
        match &mut self.0 {
            Value::Object(obj) => {
                obj.insert("sender".into(), Value::String(address.to_string()));
                true
            }
            Value::Null => {
                let mut obj = Map::new();
                obj.insert("sender".into(), Value::String(address.to_string()));
                self.0 = Value::Object(obj);
                true
            }
            _ => false,
        }
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Wire form passed to wallets: objects are re-serialized, opaque
    /// string payloads pass through untouched.
    pub fn to_json_string(&self) -> String {
        match &self.0 {
            Value::String(raw) => raw.clone(),
            other => other.to_string(),
        }
    }
}

impl From<Value> for Transaction {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sets_missing_sender() {
        let mut tx = Transaction::from_json(json!({"version": 2, "sender": null}));
        assert!(tx.set_sender_if_unset("0xabc"));
        assert_eq!(tx.sender(), Some("0xabc"));
    }

    #[test]
    fn keeps_existing_sender() {
        let mut tx = Transaction::from_json(json!({"version": 2, "sender": "0x1"}));
        assert!(!tx.set_sender_if_unset("0xabc"));
        assert_eq!(tx.sender(), Some("0x1"));
    }

    #[test]
    fn opaque_payload_passes_through() {
        let mut tx = Transaction::parse("AAACAQ==");
        assert!(!tx.set_sender_if_unset("0xabc"));
        assert_eq!(tx.to_json_string(), "AAACAQ==");
    }

    #[test]
    fn parse_round_trips_objects() {
        let tx = Transaction::parse(r#"{"version":2,"sender":"0x2"}"#);
        assert_eq!(tx.sender(), Some("0x2"));
        assert_eq!(tx.as_json()["version"], 2);
    }
}
