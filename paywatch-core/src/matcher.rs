//! Payment matching: did an expected payment happen inside the window?
//!
//! Two independent strategies share the same shape: look for a completed
//! transaction first, fall back to a future scheduled rule, otherwise the
//! target is missing. Completed matches always win over scheduled ones.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::model::{
    Account, MonitoredPayee, Payee, PaymentInfo, RuleAction, ScheduledRule, Transaction,
};
use crate::window::ReportWindow;

/// Payee lookup by id.
pub struct PayeeTable<'a> {
    by_id: HashMap<&'a str, &'a Payee>,
}

impl<'a> PayeeTable<'a> {
    pub fn new(payees: &'a [Payee]) -> Self {
        Self {
            by_id: payees.iter().map(|p| (p.id.as_str(), p)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&'a Payee> {
        self.by_id.get(id).copied()
    }
}

/// In-window transactions in deterministic match order: date ascending,
/// tie-break on id. The upstream result order is never trusted.
fn in_window_sorted<'a>(
    transactions: &'a [Transaction],
    window: &ReportWindow,
) -> Vec<&'a Transaction> {
    let mut txns: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| window.contains(t.date))
        .collect();
    txns.sort_by(|a, b| (a.date, a.id.as_str()).cmp(&(b.date, b.id.as_str())));
    txns
}

/// Of the link-schedule rules accepted by `accept`, the one with the
/// earliest strictly-future date (tie-break on rule id). Zero-amount rules
/// are reminders, not payments, and are discarded.
fn earliest_future_rule<'a>(
    rules: &'a [ScheduledRule],
    today: NaiveDate,
    accept: impl Fn(&ScheduledRule) -> bool,
) -> Option<(NaiveDate, i64, &'a ScheduledRule)> {
    rules
        .iter()
        .filter(|r| r.action == RuleAction::LinkSchedule)
        .filter(|r| accept(r))
        .filter_map(|r| {
            let date = r.resolved_date()?;
            let amount = r.resolved_amount()?;
            (date > today && amount != 0).then_some((date, amount, r))
        })
        .min_by(|a, b| (a.0, a.2.id.as_str()).cmp(&(b.0, b.2.id.as_str())))
}

/// Transfer match for one credit-card account.
///
/// A payment is the first in-window transaction whose payee has
/// `transfer_acct` set; date, amount and notes are copied verbatim. Only if
/// no transfer posted do we consult scheduled rules targeting the account.
pub fn find_card_payment(
    account: &Account,
    transactions: &[Transaction],
    payees: &PayeeTable,
    rules: &[ScheduledRule],
    window: &ReportWindow,
    today: NaiveDate,
) -> Option<PaymentInfo> {
    let completed = in_window_sorted(transactions, window)
        .into_iter()
        .filter(|t| t.account_id == account.id)
        .find(|t| {
            t.payee_id
                .as_deref()
                .and_then(|id| payees.get(id))
                .is_some_and(|p| p.transfer_acct.is_some())
        });

    if let Some(t) = completed {
        return Some(PaymentInfo {
            date: t.date,
            amount: t.amount,
            notes: t.notes.clone(),
            is_scheduled: false,
        });
    }

    earliest_future_rule(rules, today, |r| r.target_account() == Some(account.id.as_str())).map(
        |(date, amount, _)| PaymentInfo {
            date,
            amount,
            notes: None,
            is_scheduled: true,
        },
    )
}

/// Name match for one monitored payee, across all accounts.
///
/// A payment is the first in-window transaction whose payee name contains
/// the configured label (case-insensitive) and whose amount is negative
/// (money leaving the ledger). Amounts are stored absolute for display.
pub fn find_payee_payment(
    spec: &MonitoredPayee,
    transactions: &[Transaction],
    payees: &PayeeTable,
    rules: &[ScheduledRule],
    window: &ReportWindow,
    today: NaiveDate,
) -> Option<PaymentInfo> {
    let completed = in_window_sorted(transactions, window)
        .into_iter()
        .filter(|t| t.amount < 0)
        .find(|t| {
            t.payee_id
                .as_deref()
                .and_then(|id| payees.get(id))
                .is_some_and(|p| spec.matches(&p.name))
        });

    if let Some(t) = completed {
        return Some(PaymentInfo {
            date: t.date,
            amount: t.amount.abs(),
            notes: t.notes.clone(),
            is_scheduled: false,
        });
    }

    earliest_future_rule(rules, today, |r| {
        r.target_payee()
            .and_then(|id| payees.get(id))
            .is_some_and(|p| spec.matches(&p.name))
    })
    .map(|(date, amount, _)| PaymentInfo {
        date,
        amount: amount.abs(),
        notes: None,
        is_scheduled: true,
    })
}
