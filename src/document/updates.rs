//! Pure update functions over the stored document.
//!
//! Each function builds a new document from the old one; the caller is
//! responsible for persisting the result and driving navigation. Editor ids
//! come from the active [`Screen`] variant, so a save or delete dispatched
//! against a non-editor screen is a logged no-op rather than a failure.

use std::collections::BTreeMap;

use crate::document::model::{Account, Budget, StoredDocument};
use crate::screen::Screen;

/// Allocates the next account id and bumps the counter. No entry is created
/// yet; the account materializes on its first save.
pub fn add_account(doc: &StoredDocument) -> (StoredDocument, u64) {
    let id = doc.fresh_id;
    let mut next = doc.clone();
    next.fresh_id = id + 1;
    (next, id)
}

/// Upserts the account under the id carried by the active editor screen.
pub fn save_account(doc: &StoredDocument, screen: Screen, account: Account) -> StoredDocument {
    match screen {
        Screen::EditAccount { id } => {
            let mut next = doc.clone();
            next.accounts.insert(id, account);
            next
        }
        _ => {
            tracing::warn!(?screen, "save account on wrong screen");
            doc.clone()
        }
    }
}

/// Removes the account under the active editor screen's id. Budget
/// membership lists are left alone; a dangling id contributes nothing when
/// balances are summed later.
pub fn delete_account(doc: &StoredDocument, screen: Screen) -> StoredDocument {
    match screen {
        Screen::EditAccount { id } => {
            let mut next = doc.clone();
            next.accounts.remove(&id);
            next
        }
        _ => {
            tracing::warn!(?screen, "delete account on wrong screen");
            doc.clone()
        }
    }
}

/// Allocates the next budget id and bumps the counter.
pub fn add_budget(doc: &StoredDocument) -> (StoredDocument, u64) {
    let id = doc.fresh_id;
    let mut next = doc.clone();
    next.fresh_id = id + 1;
    (next, id)
}

/// Upserts the budget under the id carried by the active editor screen.
pub fn save_budget(doc: &StoredDocument, screen: Screen, budget: Budget) -> StoredDocument {
    match screen {
        Screen::EditBudget { id } => {
            let mut next = doc.clone();
            next.budgets.insert(id, budget);
            next
        }
        _ => {
            tracing::warn!(?screen, "save budget on wrong screen");
            doc.clone()
        }
    }
}

/// Removes the budget under the active editor screen's id.
pub fn delete_budget(doc: &StoredDocument, screen: Screen) -> StoredDocument {
    match screen {
        Screen::EditBudget { id } => {
            let mut next = doc.clone();
            next.budgets.remove(&id);
            next
        }
        _ => {
            tracing::warn!(?screen, "delete budget on wrong screen");
            doc.clone()
        }
    }
}

/// Flips the account's membership in the budget and re-derives the starting
/// balance from the new membership set. This is the only place the starting
/// balance is recomputed; afterwards it is an ordinary stored field.
pub fn toggle_account_in_budget(
    budget: &Budget,
    accounts: &BTreeMap<u64, Account>,
    id: u64,
) -> Budget {
    let mut next = budget.clone();
    if let Some(position) = next.accounts.iter().position(|linked| *linked == id) {
        next.accounts.remove(position);
    } else {
        next.accounts.push(id);
    }
    next.starting_balance = next
        .accounts
        .iter()
        .filter_map(|linked| accounts.get(linked))
        .map(|account| account.balance)
        .sum();
    next
}
