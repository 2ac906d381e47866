//! Report assembly and rendering.
//!
//! Pure formatting on top of the matcher: four ordered sequences rendered as
//! a line-oriented UTF-8 text block, suitable for both console output and a
//! monospace HTML email. No terminal color codes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::matcher::{PayeeTable, find_card_payment, find_payee_payment};
use crate::model::{Account, MonitoredPayee, Payee, PaymentInfo, ScheduledRule, Transaction};
use crate::money;
use crate::window::ReportWindow;

const RULE_LINE: &str =
    "--------------------------------------------------------------------------------";
const BANNER_LINE: &str =
    "================================================================================";

/// One "found" entry: the display label plus the payment that satisfied it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoundEntry {
    pub label: String,
    pub payment: PaymentInfo,
}

/// The assembled payment report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub window: ReportWindow,
    pub run_date: NaiveDate,
    /// Number of monitored credit-card accounts, zero included.
    pub card_count: usize,
    pub cards_missing: Vec<String>,
    pub cards_found: Vec<FoundEntry>,
    pub payees_missing: Vec<String>,
    pub payees_found: Vec<FoundEntry>,
}

impl Report {
    /// Run both matching strategies over fetched ledger data.
    ///
    /// Unpaid credit-card accounts with an absent or zero balance go in
    /// neither sequence; monitored payees always land in exactly one.
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        accounts: &[Account],
        transactions: &[Transaction],
        payees: &[Payee],
        rules: &[ScheduledRule],
        monitored: &[MonitoredPayee],
        window: ReportWindow,
        run_date: NaiveDate,
        card_marker: &str,
    ) -> Self {
        let table = PayeeTable::new(payees);
        let cards = crate::accounts::credit_card_accounts(accounts, card_marker);

        let mut cards_missing = Vec::new();
        let mut cards_found = Vec::new();
        for account in &cards {
            match find_card_payment(account, transactions, &table, rules, &window, run_date) {
                Some(payment) => cards_found.push(FoundEntry {
                    label: account.name.clone(),
                    payment,
                }),
                None if account.eligible_for_missing() => {
                    cards_missing.push(account.name.clone())
                }
                None => {}
            }
        }

        let mut payees_missing = Vec::new();
        let mut payees_found = Vec::new();
        for spec in monitored {
            match find_payee_payment(spec, transactions, &table, rules, &window, run_date) {
                Some(payment) => payees_found.push(FoundEntry {
                    label: spec.label.clone(),
                    payment,
                }),
                None => payees_missing.push(spec.label.clone()),
            }
        }

        Self {
            window,
            run_date,
            card_count: cards.len(),
            cards_missing,
            cards_found,
            payees_missing,
            payees_found,
        }
    }

    /// Render the report as its stable text form.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut line = |s: &str| {
            out.push_str(s);
            out.push('\n');
        };

        line(BANNER_LINE);
        line("CREDIT CARD PAYMENT REPORT");
        line(BANNER_LINE);
        line("");
        line(&format!(
            "🔍 Checking for payments between {} and {}",
            self.window.start, self.window.end
        ));
        line(&format!("📅 Report run date: {}", self.run_date));
        line("");
        line(&format!(
            "💳 Found {} credit card accounts",
            self.card_count
        ));
        line("");

        if self.cards_missing.is_empty() {
            line("✅ All credit card accounts have payments!");
            line("");
        } else {
            line("⚠️  MISSING PAYMENTS (No payment found in date range)");
            line(RULE_LINE);
            for name in &self.cards_missing {
                line(&format!("  • {name}"));
            }
            line("");
        }

        if !self.cards_found.is_empty() {
            line("✅ PAYMENTS FOUND");
            line(RULE_LINE);
            for entry in &self.cards_found {
                line(&found_line(entry));
            }
            line("");
        }

        if !self.payees_missing.is_empty() {
            line("⚠️  MISSING PAYEE PAYMENTS (No payment found in date range)");
            line(RULE_LINE);
            for label in &self.payees_missing {
                line(&format!("  • {label}"));
            }
            line("");
        }

        if !self.payees_found.is_empty() {
            line("✅ PAYEE PAYMENTS FOUND");
            line(RULE_LINE);
            for entry in &self.payees_found {
                line(&found_line(entry));
            }
            line("");
        }

        out
    }
}

fn found_line(entry: &FoundEntry) -> String {
    let mut s = format!(
        "  • {} | {} | ${}",
        entry.label,
        entry.payment.date,
        money::cents(entry.payment.amount)
    );
    if let Some(notes) = entry.payment.notes.as_deref() {
        if !notes.is_empty() {
            s.push_str(&format!(" | {notes}"));
        }
    }
    if entry.payment.is_scheduled {
        s.push_str(" (scheduled)");
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn empty_report() -> Report {
        Report {
            window: ReportWindow::around(d(2026, 2, 4), 14),
            run_date: d(2026, 2, 4),
            card_count: 0,
            cards_missing: vec![],
            cards_found: vec![],
            payees_missing: vec![],
            payees_found: vec![],
        }
    }

    fn payment(date: NaiveDate, amount: i64, notes: Option<&str>, scheduled: bool) -> PaymentInfo {
        PaymentInfo {
            date,
            amount,
            notes: notes.map(Into::into),
            is_scheduled: scheduled,
        }
    }

    #[test]
    fn header_carries_window_and_run_date() {
        let text = empty_report().render();
        assert!(text.contains("🔍 Checking for payments between 2026-01-21 and 2026-02-18"));
        assert!(text.contains("📅 Report run date: 2026-02-04"));
    }

    #[test]
    fn zero_accounts_renders_explicit_count_not_error() {
        let text = empty_report().render();
        assert!(text.contains("💳 Found 0 credit card accounts"));
    }

    #[test]
    fn found_entry_renders_name_date_amount_and_note() {
        let mut report = empty_report();
        report.card_count = 1;
        report.cards_found.push(FoundEntry {
            label: "💳 Chase United".into(),
            payment: payment(d(2026, 1, 6), 16303, Some("7027"), false),
        });
        let text = report.render();
        assert!(text.contains("  • 💳 Chase United | 2026-01-06 | $163.03 | 7027"));
    }

    #[test]
    fn blank_note_is_omitted_not_rendered_as_placeholder() {
        let mut report = empty_report();
        report.cards_found.push(FoundEntry {
            label: "💳Amex Blue Cash".into(),
            payment: payment(d(2026, 1, 30), 701680, None, false),
        });
        report.cards_found.push(FoundEntry {
            label: "💳 Citi".into(),
            payment: payment(d(2026, 1, 31), 100, Some(""), false),
        });
        let text = report.render();
        assert!(text.contains("  • 💳Amex Blue Cash | 2026-01-30 | $7016.80\n"));
        assert!(text.contains("  • 💳 Citi | 2026-01-31 | $1.00\n"));
        assert!(!text.contains("None"));
    }

    #[test]
    fn scheduled_matches_carry_a_marker() {
        let mut report = empty_report();
        report.payees_found.push(FoundEntry {
            label: "Auto Financing".into(),
            payment: payment(d(2026, 2, 12), 35000, None, true),
        });
        let text = report.render();
        assert!(text.contains("  • Auto Financing | 2026-02-12 | $350.00 (scheduled)"));
    }

    #[test]
    fn empty_sections_are_omitted_entirely() {
        let text = empty_report().render();
        assert!(!text.contains("MISSING PAYMENTS"));
        assert!(!text.contains("PAYMENTS FOUND"));
        assert!(!text.contains("PAYEE"));
        assert!(text.contains("✅ All credit card accounts have payments!"));
    }

    #[test]
    fn missing_sections_render_bullets() {
        let mut report = empty_report();
        report.card_count = 1;
        report.cards_missing.push("💳Amex Blue Cash".into());
        report.payees_missing.push("Target".into());
        let text = report.render();
        assert!(text.contains("⚠️  MISSING PAYMENTS (No payment found in date range)"));
        assert!(text.contains("  • 💳Amex Blue Cash"));
        assert!(text.contains("⚠️  MISSING PAYEE PAYMENTS (No payment found in date range)"));
        assert!(text.contains("  • Target"));
        assert!(!text.contains("All credit card accounts have payments"));
    }
}
