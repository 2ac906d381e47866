//! Account selection: which accounts the watchdog monitors.

use crate::model::Account;

/// Pure filter: the subset of accounts whose display name starts with the
/// credit-card marker glyph, in their original order.
pub fn credit_card_accounts<'a>(accounts: &'a [Account], marker: &str) -> Vec<&'a Account> {
    accounts
        .iter()
        .filter(|a| a.is_credit_card(marker))
        .collect()
}
