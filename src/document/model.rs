use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::date::{opt_iso_date, start_of_day};

/// A tracked account: a display name and a free-form signed balance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub balance: f64,
}

impl Account {
    pub fn new(name: impl Into<String>, balance: f64) -> Self {
        Self {
            name: name.into(),
            balance,
        }
    }
}

/// A named envelope over a subset of accounts, with a date window and
/// starting/target balances.
///
/// `starting_balance` is derived from the linked accounts when membership is
/// toggled, then stored as-is. It is allowed to drift from live account
/// balances after later account edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub name: String,
    #[serde(default)]
    pub accounts: Vec<u64>,
    #[serde(with = "opt_iso_date")]
    pub first_day: Option<DateTime<Utc>>,
    #[serde(with = "opt_iso_date")]
    pub last_day: Option<DateTime<Utc>>,
    pub starting_balance: f64,
    pub target_balance: f64,
}

impl Budget {
    /// The empty editor template: unnamed, no linked accounts, window
    /// opening at the start of the given day with no last day yet.
    pub fn draft(today: DateTime<Utc>) -> Self {
        Self {
            name: String::new(),
            accounts: Vec::new(),
            first_day: Some(start_of_day(today)),
            last_day: None,
            starting_balance: 0.0,
            target_balance: 0.0,
        }
    }
}

/// The single persisted aggregate. Owned by the session and serialized
/// wholesale to storage on every mutation.
///
/// `fresh_id` only ever moves forward, so issued ids are never reused. A
/// budget may reference an account id that no longer exists; readers treat
/// such ids as contributing nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    pub fresh_id: u64,
    #[serde(default)]
    pub accounts: BTreeMap<u64, Account>,
    #[serde(default)]
    pub budgets: BTreeMap<u64, Budget>,
}

impl Default for StoredDocument {
    fn default() -> Self {
        Self {
            fresh_id: 1,
            accounts: BTreeMap::new(),
            budgets: BTreeMap::new(),
        }
    }
}

impl StoredDocument {
    /// Sums the balances behind the given account ids. Ids with no matching
    /// account contribute nothing.
    pub fn account_balance_sum(&self, ids: &[u64]) -> f64 {
        ids.iter()
            .filter_map(|id| self.accounts.get(id))
            .map(|account| account.balance)
            .sum()
    }

    /// True if any budget references the account.
    pub fn is_account_in_use(&self, id: u64) -> bool {
        self.budgets
            .values()
            .any(|budget| budget.accounts.contains(&id))
    }
}
