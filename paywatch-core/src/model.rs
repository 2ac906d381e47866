//! Ledger record types shared across the workspace.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An account as reported by the budgeting server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: String,
    pub name: String,
    /// Current balance in cents. `None` for closed/inactive accounts.
    pub balance: Option<i64>,
}

impl Account {
    /// Credit-card accounts are tagged by a marker glyph at the start of the name.
    pub fn is_credit_card(&self, marker: &str) -> bool {
        self.name.starts_with(marker)
    }

    /// Accounts with no balance (closed) or an exactly-zero balance are left
    /// out of missing-payment reporting entirely.
    pub fn eligible_for_missing(&self) -> bool {
        matches!(self.balance, Some(b) if b != 0)
    }
}

/// A posted or pending transaction. Tombstoned and split-parent rows are
/// filtered out before this type is constructed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub account_id: String,
    pub date: NaiveDate,
    /// Signed amount in cents. Negative = money leaving the ledger.
    pub amount: i64,
    pub notes: Option<String>,
    pub payee_id: Option<String>,
    pub cleared: bool,
}

/// A payee. When `transfer_acct` is set the payee stands for an
/// inter-account transfer rather than a third party.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payee {
    pub id: String,
    pub name: String,
    pub transfer_acct: Option<String>,
}

/// What a scheduled rule does when it fires.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RuleAction {
    /// Links a matching transaction to its schedule. The only action kind
    /// that marks a rule as a pre-authorized future payment.
    LinkSchedule,
    Other,
}

/// Which record field a rule condition constrains.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RuleField {
    Account,
    Date,
    Amount,
    Payee,
}

/// Exact vs. approximate comparison on a rule condition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RuleOp {
    Is,
    IsApprox,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum RuleValue {
    Str(String),
    Int(i64),
    Date(NaiveDate),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleCondition {
    pub field: RuleField,
    pub op: RuleOp,
    pub value: RuleValue,
}

/// A scheduled-transaction rule: a payment the user has pre-authorized but
/// which has not yet posted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduledRule {
    pub id: String,
    pub action: RuleAction,
    pub conditions: Vec<RuleCondition>,
}

impl ScheduledRule {
    fn condition(&self, field: RuleField) -> Option<&RuleCondition> {
        self.conditions.iter().find(|c| c.field == field)
    }

    /// Account id this rule targets, if it has an account condition.
    pub fn target_account(&self) -> Option<&str> {
        match &self.condition(RuleField::Account)?.value {
            RuleValue::Str(id) => Some(id),
            _ => None,
        }
    }

    /// Payee id this rule targets, if it has a payee condition.
    pub fn target_payee(&self) -> Option<&str> {
        match &self.condition(RuleField::Payee)?.value {
            RuleValue::Str(id) => Some(id),
            _ => None,
        }
    }

    /// The date this rule resolves to. Rules whose date condition is not a
    /// plain calendar date never resolve and never match.
    pub fn resolved_date(&self) -> Option<NaiveDate> {
        match self.condition(RuleField::Date)?.value {
            RuleValue::Date(d) => Some(d),
            _ => None,
        }
    }

    /// The amount (cents) this rule resolves to.
    pub fn resolved_amount(&self) -> Option<i64> {
        match self.condition(RuleField::Amount)?.value {
            RuleValue::Int(n) => Some(n),
            _ => None,
        }
    }
}

/// A configured payee-name substring the user wants payment activity
/// tracked for, independent of account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonitoredPayee {
    pub label: String,
}

impl MonitoredPayee {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }

    /// Case-insensitive substring match against a payee display name.
    pub fn matches(&self, payee_name: &str) -> bool {
        payee_name
            .to_lowercase()
            .contains(&self.label.to_lowercase())
    }
}

/// A matched payment, either an already-posted transaction or a
/// still-future scheduled rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentInfo {
    pub date: NaiveDate,
    /// Cents. Copied verbatim for transfer matches; absolute value for
    /// payee-name matches.
    pub amount: i64,
    pub notes: Option<String>,
    pub is_scheduled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_absent_balances_are_ineligible() {
        let mut acct = Account {
            id: "a1".into(),
            name: "💳 Chase United".into(),
            balance: Some(-45000),
        };
        assert!(acct.eligible_for_missing());

        acct.balance = Some(0);
        assert!(!acct.eligible_for_missing());

        acct.balance = None;
        assert!(!acct.eligible_for_missing());
    }

    #[test]
    fn marker_prefix_tags_credit_cards() {
        let cc = Account {
            id: "a1".into(),
            name: "💳Amex Blue Cash".into(),
            balance: Some(45000),
        };
        let checking = Account {
            id: "a2".into(),
            name: "Checking".into(),
            balance: Some(120000),
        };
        assert!(cc.is_credit_card("💳"));
        assert!(!checking.is_credit_card("💳"));
    }

    #[test]
    fn monitored_payee_match_is_case_insensitive_substring() {
        let spec = MonitoredPayee::new("target");
        assert!(spec.matches("Target Store #402"));
        assert!(spec.matches("SuperTARGET"));
        assert!(!spec.matches("Walmart"));
    }

    #[test]
    fn rule_accessors_resolve_conditions() {
        let rule = ScheduledRule {
            id: "r1".into(),
            action: RuleAction::LinkSchedule,
            conditions: vec![
                RuleCondition {
                    field: RuleField::Account,
                    op: RuleOp::Is,
                    value: RuleValue::Str("a1".into()),
                },
                RuleCondition {
                    field: RuleField::Date,
                    op: RuleOp::IsApprox,
                    value: RuleValue::Date(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()),
                },
                RuleCondition {
                    field: RuleField::Amount,
                    op: RuleOp::Is,
                    value: RuleValue::Int(-25000),
                },
            ],
        };
        assert_eq!(rule.target_account(), Some("a1"));
        assert_eq!(
            rule.resolved_date(),
            Some(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
        );
        assert_eq!(rule.resolved_amount(), Some(-25000));
        assert_eq!(rule.target_payee(), None);
    }
}
