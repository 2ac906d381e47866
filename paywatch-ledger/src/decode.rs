//! Typed decode of raw server records.
//!
//! Every record crosses from dynamic JSON to the core model types here, in
//! one place. A record missing an expected field is skipped with a warning
//! and never aborts the run; tombstoned and split-parent transactions are
//! dropped silently.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::warn;

use paywatch_core::{
    Account, Payee, RuleAction, RuleCondition, RuleField, RuleOp, RuleValue, ScheduledRule,
    Transaction, date_from_int,
};

use crate::error::{LedgerError, Result};

fn malformed(kind: &'static str, reason: impl Into<String>) -> LedgerError {
    LedgerError::Malformed {
        kind,
        reason: reason.into(),
    }
}

fn str_field<'a>(v: &'a Value, key: &str, kind: &'static str) -> Result<&'a str> {
    v.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(kind, format!("missing field `{key}`")))
}

fn int_field(v: &Value, key: &str, kind: &'static str) -> Result<i64> {
    v.get(key)
        .and_then(Value::as_i64)
        .ok_or_else(|| malformed(kind, format!("missing field `{key}`")))
}

fn opt_str_field(v: &Value, key: &str) -> Option<String> {
    v.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Truthy server flags arrive as 0/1 integers or plain booleans.
fn flag_field(v: &Value, key: &str) -> bool {
    match v.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0) != 0,
        _ => false,
    }
}

fn decode_account(v: &Value) -> Result<Account> {
    let balance = match v.get("balance_current") {
        None | Some(Value::Null) => None,
        Some(raw) => Some(
            raw.as_i64()
                .ok_or_else(|| malformed("account", "non-integer `balance_current`"))?,
        ),
    };
    Ok(Account {
        id: str_field(v, "id", "account")?.to_string(),
        name: str_field(v, "name", "account")?.to_string(),
        balance,
    })
}

/// `Ok(None)` means the row was filtered (tombstoned or a split parent),
/// which is not a malformation.
fn decode_transaction(v: &Value) -> Result<Option<Transaction>> {
    if flag_field(v, "tombstone") || flag_field(v, "is_parent") {
        return Ok(None);
    }
    let raw_date = int_field(v, "date", "transaction")?;
    let date = date_from_int(raw_date)
        .ok_or_else(|| malformed("transaction", format!("bad date int {raw_date}")))?;
    Ok(Some(Transaction {
        id: str_field(v, "id", "transaction")?.to_string(),
        account_id: str_field(v, "acct", "transaction")?.to_string(),
        date,
        amount: int_field(v, "amount", "transaction")?,
        notes: opt_str_field(v, "notes"),
        payee_id: opt_str_field(v, "payee"),
        cleared: flag_field(v, "cleared"),
    }))
}

fn decode_payee(v: &Value) -> Result<Payee> {
    Ok(Payee {
        id: str_field(v, "id", "payee")?.to_string(),
        name: str_field(v, "name", "payee")?.to_string(),
        transfer_acct: opt_str_field(v, "transfer_acct"),
    })
}

fn decode_rule(v: &Value) -> Result<ScheduledRule> {
    let id = str_field(v, "id", "rule")?.to_string();

    let action = v
        .get("actions")
        .and_then(Value::as_array)
        .map(|actions| {
            actions
                .iter()
                .any(|a| a.get("op").and_then(Value::as_str) == Some("link-schedule"))
        })
        .map(|linked| {
            if linked {
                RuleAction::LinkSchedule
            } else {
                RuleAction::Other
            }
        })
        .ok_or_else(|| malformed("rule", "missing `actions` array"))?;

    let raw_conditions = v
        .get("conditions")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("rule", "missing `conditions` array"))?;

    // Conditions we cannot express (unknown fields, recurring date configs)
    // are dropped; the rule simply never resolves on that axis.
    let conditions = raw_conditions
        .iter()
        .filter_map(decode_condition)
        .collect();

    Ok(ScheduledRule {
        id,
        action,
        conditions,
    })
}

fn decode_condition(v: &Value) -> Option<RuleCondition> {
    let field = match v.get("field").and_then(Value::as_str)? {
        "acct" => RuleField::Account,
        "date" => RuleField::Date,
        "amount" => RuleField::Amount,
        "payee" => RuleField::Payee,
        _ => return None,
    };
    let op = match v.get("op").and_then(Value::as_str)? {
        "is" => RuleOp::Is,
        _ => RuleOp::IsApprox,
    };
    let value = match (field, v.get("value")?) {
        (RuleField::Amount, raw) => RuleValue::Int(raw.as_i64()?),
        (RuleField::Date, Value::String(s)) => {
            RuleValue::Date(NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?)
        }
        (RuleField::Date, _) => return None, // recurring config, not a plain date
        (_, raw) => RuleValue::Str(raw.as_str()?.to_string()),
    };
    Some(RuleCondition { field, op, value })
}

fn decode_batch<T>(
    raw: &[Value],
    kind: &'static str,
    decode: impl Fn(&Value) -> Result<Option<T>>,
) -> Vec<T> {
    let mut out = Vec::with_capacity(raw.len());
    let mut skipped = 0usize;
    for v in raw {
        match decode(v) {
            Ok(Some(record)) => out.push(record),
            Ok(None) => {}
            Err(err) => {
                skipped += 1;
                warn!(%err, "skipping record");
            }
        }
    }
    if skipped > 0 {
        warn!(kind, skipped, "some records were malformed and skipped");
    }
    out
}

pub fn accounts(raw: &[Value]) -> Vec<Account> {
    decode_batch(raw, "account", |v| decode_account(v).map(Some))
}

pub fn transactions(raw: &[Value]) -> Vec<Transaction> {
    decode_batch(raw, "transaction", decode_transaction)
}

pub fn payees(raw: &[Value]) -> Vec<Payee> {
    decode_batch(raw, "payee", |v| decode_payee(v).map(Some))
}

pub fn rules(raw: &[Value]) -> Vec<ScheduledRule> {
    decode_batch(raw, "rule", |v| decode_rule(v).map(Some))
}
