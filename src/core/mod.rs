//! Platform-neutral widget core
//!
//! ```text
//! WalletRegistry ──register/unregister──┐
//! WalletHandle ────────change───────────┤
//! user clicks / auto-reconnect ─────────┤
//!                                       ▼
//!                            Connector (Selection)
//!                                       │
//!                  ┌────────────────────┼───────────────────┐
//!                  ▼                    ▼                   ▼
//!           render_button        render_picker       Bridge::publish
//! ```

pub mod bridge;
pub mod connector;
pub mod discovery;
pub mod error;
pub mod registry;
pub mod selection;
pub mod signer;
pub mod storage;
pub mod subscription;
pub mod transaction;
pub mod view;
pub mod wallet;

#[cfg(test)]
pub(crate) mod stub;
