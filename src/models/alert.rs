//! Transient user-facing alerts and the process-wide alert slot.
//!
//! Multi-transaction workflows run for minutes; alerts are the only channel
//! the host learns about progress through. Exactly one alert is visible at a
//! time. Concurrent workflows share the slot last-write-wins: every workflow
//! opens an epoch-stamped scope, and publishes from a scope older than the
//! newest one are dropped, so an abandoned workflow can never clobber the
//! alert of the one that superseded it.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Severity tag of an alert, rendered by the host however it likes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertVariant {
    Primary,
    Secondary,
    Info,
    Warning,
    Success,
}

impl AlertVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertVariant::Primary => "primary",
            AlertVariant::Secondary => "secondary",
            AlertVariant::Info => "info",
            AlertVariant::Warning => "warning",
            AlertVariant::Success => "success",
        }
    }
}

/// Key into the supplementary help-link table shown next to an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertCode {
    Faq,
    WhatIsEthTx,
    HowOrdersAdded,
    CreateOrderMultiTx,
    SelfCustody,
    OrderLive,
    HowBlockchainRead,
    HowDepositVerified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpLink {
    pub label: &'static str,
    pub href: &'static str,
}

impl AlertCode {
    pub fn as_u8(&self) -> u8 {
        match self {
            AlertCode::Faq => 1,
            AlertCode::WhatIsEthTx => 2,
            AlertCode::HowOrdersAdded => 3,
            AlertCode::CreateOrderMultiTx => 4,
            AlertCode::SelfCustody => 5,
            AlertCode::OrderLive => 6,
            AlertCode::HowBlockchainRead => 7,
            AlertCode::HowDepositVerified => 8,
        }
    }

    pub fn help_link(&self) -> HelpLink {
        match self {
            AlertCode::Faq => HelpLink {
                label: "Frequently asked questions",
                href: "",
            },
            AlertCode::WhatIsEthTx => HelpLink {
                label: "What is an ethereum transaction?",
                href: "",
            },
            AlertCode::HowOrdersAdded => HelpLink {
                label: "How are orders added in the smart contract?",
                href: "",
            },
            AlertCode::CreateOrderMultiTx => HelpLink {
                label: "Why does creating an order involve 2 ethereum transactions instead of 1?",
                href: "",
            },
            AlertCode::SelfCustody => HelpLink {
                label: "How does the smart contract implement self-custody of coins?",
                href: "",
            },
            AlertCode::OrderLive => HelpLink {
                label: "My order is live, what now?",
                href: "",
            },
            AlertCode::HowBlockchainRead => HelpLink {
                label: "How does Flyweight read the Ethereum blockchain?",
                href: "",
            },
            AlertCode::HowDepositVerified => HelpLink {
                label: "How does Flyweight verify on-chain deposits to the smart contract?",
                href: "",
            },
        }
    }
}

/// One user-facing alert. Set by workflow steps, cleared explicitly or
/// superseded by the next alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub variant: AlertVariant,
    pub code: AlertCode,
    pub msg_primary: String,
    pub msg_secondary: Option<String>,
}

impl Alert {
    pub fn new(
        variant: AlertVariant,
        code: AlertCode,
        msg_primary: impl Into<String>,
        msg_secondary: Option<&str>,
    ) -> Self {
        Self {
            variant,
            code,
            msg_primary: msg_primary.into(),
            msg_secondary: msg_secondary.map(str::to_string),
        }
    }
}

/// The single-slot alert state, shared by all workflows of a session.
///
/// Hosts either poll [`AlertSlot::current`] or hold a [`watch`] subscription.
pub struct AlertSlot {
    epoch: Mutex<u64>,
    tx: watch::Sender<Option<Alert>>,
}

impl AlertSlot {
    pub fn new() -> Arc<Self> {
        let (tx, _rx) = watch::channel(None);
        Arc::new(Self {
            epoch: Mutex::new(0),
            tx,
        })
    }

    /// Open a new publishing scope. Any scope opened earlier becomes stale:
    /// its publishes are silently dropped from now on.
    pub fn begin(&self) -> AlertScope<'_> {
        let mut epoch = self.epoch.lock().expect("alert epoch lock");
        *epoch += 1;
        AlertScope {
            slot: self,
            epoch: *epoch,
        }
    }

    pub fn current(&self) -> Option<Alert> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Alert>> {
        self.tx.subscribe()
    }

    fn newest_epoch(&self) -> u64 {
        *self.epoch.lock().expect("alert epoch lock")
    }
}

/// A workflow's handle on the alert slot, valid until a newer scope begins.
pub struct AlertScope<'a> {
    slot: &'a AlertSlot,
    epoch: u64,
}

impl AlertScope<'_> {
    /// Publish an alert. Returns false (and drops the alert) when a newer
    /// workflow has taken over the slot.
    pub fn publish(&self, alert: Alert) -> bool {
        if self.epoch < self.slot.newest_epoch() {
            log::debug!(
                "dropping stale alert from superseded workflow: {}",
                alert.msg_primary
            );
            return false;
        }
        self.slot.tx.send_replace(Some(alert));
        true
    }

    /// Clear the visible alert, subject to the same staleness rule.
    pub fn clear(&self) -> bool {
        if self.epoch < self.slot.newest_epoch() {
            return false;
        }
        self.slot.tx.send_replace(None);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(msg: &str) -> Alert {
        Alert::new(AlertVariant::Info, AlertCode::Faq, msg, None)
    }

    #[test]
    fn test_last_write_wins() {
        let slot = AlertSlot::new();
        let scope = slot.begin();

        assert!(scope.publish(alert("first")));
        assert!(scope.publish(alert("second")));
        assert_eq!(slot.current().unwrap().msg_primary, "second");
    }

    #[test]
    fn test_stale_scope_is_dropped() {
        let slot = AlertSlot::new();
        let old = slot.begin();
        let new = slot.begin();

        assert!(new.publish(alert("live workflow")));
        assert!(!old.publish(alert("zombie workflow")));
        assert_eq!(slot.current().unwrap().msg_primary, "live workflow");

        assert!(!old.clear());
        assert!(slot.current().is_some());
    }

    #[test]
    fn test_clear_empties_slot() {
        let slot = AlertSlot::new();
        let scope = slot.begin();
        scope.publish(alert("x"));
        assert!(scope.clear());
        assert!(slot.current().is_none());
    }

    #[test]
    fn test_subscription_sees_updates() {
        let slot = AlertSlot::new();
        let rx = slot.subscribe();
        let scope = slot.begin();
        scope.publish(alert("progress"));
        assert_eq!(rx.borrow().as_ref().unwrap().msg_primary, "progress");
    }

    #[test]
    fn test_alert_code_table() {
        assert_eq!(AlertCode::CreateOrderMultiTx.as_u8(), 4);
        assert!(AlertCode::HowDepositVerified
            .help_link()
            .label
            .contains("deposits"));
    }
}
