//! paywatch-core: pure matching and reporting logic for the payment watchdog.
//!
//! Everything in this crate operates on already-fetched ledger records, so
//! the whole pipeline is testable with fixture data and no server.

pub mod accounts;
pub mod matcher;
pub mod model;
pub mod money;
pub mod report;
pub mod window;

pub use accounts::credit_card_accounts;
pub use matcher::{PayeeTable, find_card_payment, find_payee_payment};
pub use model::{
    Account, MonitoredPayee, Payee, PaymentInfo, RuleAction, RuleCondition, RuleField, RuleOp,
    RuleValue, ScheduledRule, Transaction,
};
pub use report::{FoundEntry, Report};
pub use window::{ReportWindow, date_from_int, date_to_int};
