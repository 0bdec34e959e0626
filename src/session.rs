//! Application control flow: the current document, the active screen, and
//! the persist-then-navigate choreography around every edit.

use crate::{
    document::{
        add_account, add_budget, delete_account, delete_budget, save_account, save_budget,
        validation_messages, Account, Budget, StoredDocument,
    },
    pacing::{compute_pacing, partition_budgets, BudgetPartition, PacingResult},
    screen::Screen,
    storage::{DocumentStore, Result},
    time::{Clock, SystemClock},
};

/// Threads the stored document and active screen through user edits.
///
/// Every mutation computes the new document through the pure update
/// functions, persists it wholesale, and then moves to the follow-up screen,
/// mirroring a hash change in the host environment. There is exactly one
/// writer and one reader: this session.
pub struct Session {
    store: DocumentStore,
    clock: Box<dyn Clock>,
    document: StoredDocument,
    screen: Screen,
}

impl Session {
    /// Loads the persisted document and starts on the budgets list.
    pub fn open(store: DocumentStore) -> Result<Self> {
        Self::with_clock(store, Box::new(SystemClock))
    }

    /// Like [`Session::open`], with an injected clock for the time-derived
    /// figures.
    pub fn with_clock(store: DocumentStore, clock: Box<dyn Clock>) -> Result<Self> {
        let document = store.load()?;
        Ok(Self {
            store,
            clock,
            document,
            screen: Screen::ViewBudgets,
        })
    }

    pub fn document(&self) -> &StoredDocument {
        &self.document
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Re-derives the active screen from a hash fragment.
    pub fn navigate(&mut self, hash: &str) -> Screen {
        self.screen = Screen::from_hash(hash);
        self.screen
    }

    /// Allocates an account id and moves to its editor.
    pub fn add_account(&mut self) -> Result<u64> {
        let (next, id) = add_account(&self.document);
        self.commit(next)?;
        self.screen = Screen::EditAccount { id };
        Ok(id)
    }

    /// Saves the account under the active editor and returns to the
    /// accounts list. Dispatch against any other screen is a logged no-op.
    pub fn save_account(&mut self, account: Account) -> Result<()> {
        let next = save_account(&self.document, self.screen, account);
        if matches!(self.screen, Screen::EditAccount { .. }) {
            self.commit(next)?;
            self.screen = Screen::ViewAccounts;
        }
        Ok(())
    }

    /// Deletes the account under the active editor and returns to the
    /// accounts list. Dispatch against any other screen is a logged no-op.
    pub fn delete_account(&mut self) -> Result<()> {
        let next = delete_account(&self.document, self.screen);
        if matches!(self.screen, Screen::EditAccount { .. }) {
            self.commit(next)?;
            self.screen = Screen::ViewAccounts;
        }
        Ok(())
    }

    /// Allocates a budget id and moves to its editor.
    pub fn add_budget(&mut self) -> Result<u64> {
        let (next, id) = add_budget(&self.document);
        self.commit(next)?;
        self.screen = Screen::EditBudget { id };
        Ok(id)
    }

    /// The empty budget template for a freshly opened editor: its window
    /// opens at the start of the current day.
    pub fn draft_budget(&self) -> Budget {
        Budget::draft(self.clock.now())
    }

    /// Saves the budget under the active editor and returns to the budgets
    /// list. A budget that fails validation is not saved, and dispatch
    /// against a non-editor screen is a logged no-op.
    pub fn save_budget(&mut self, budget: Budget) -> Result<()> {
        let errors = validation_messages(&budget);
        if !errors.is_empty() {
            tracing::warn!(?errors, "budget failed validation; not saved");
            return Ok(());
        }
        let next = save_budget(&self.document, self.screen, budget);
        if matches!(self.screen, Screen::EditBudget { .. }) {
            self.commit(next)?;
            self.screen = Screen::ViewBudgets;
        }
        Ok(())
    }

    /// Deletes the budget under the active editor and returns to the
    /// budgets list. Dispatch against any other screen is a logged no-op.
    pub fn delete_budget(&mut self) -> Result<()> {
        let next = delete_budget(&self.document, self.screen);
        if matches!(self.screen, Screen::EditBudget { .. }) {
            self.commit(next)?;
            self.screen = Screen::ViewBudgets;
        }
        Ok(())
    }

    /// Replaces the whole document: the import entry point. Nothing from
    /// the prior document survives, and the session lands on the accounts
    /// list, as the import flow does.
    pub fn replace_all(&mut self, document: StoredDocument) -> Result<()> {
        self.commit(document)?;
        self.screen = Screen::ViewAccounts;
        Ok(())
    }

    /// Serializes the current document for export.
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.document)?)
    }

    /// Drops all local data and starts over from the initial document.
    pub fn reset(&mut self) -> Result<()> {
        self.document = self.store.reset()?;
        Ok(())
    }

    /// Pacing figures for one budget against the live balances of its
    /// linked accounts. `None` when the id is unknown.
    pub fn budget_pacing(&self, id: u64) -> Option<PacingResult> {
        let budget = self.document.budgets.get(&id)?;
        let sum = self.document.account_balance_sum(&budget.accounts);
        Some(compute_pacing(budget, sum, self.clock.now()))
    }

    /// The budgets-screen grouping of every budget into active, pending,
    /// and expired.
    pub fn budget_partition(&self) -> BudgetPartition {
        partition_budgets(&self.document.budgets, self.clock.now())
    }

    /// Persists first, then swaps the in-memory document, so a failed write
    /// leaves the session on the previous state.
    fn commit(&mut self, document: StoredDocument) -> Result<()> {
        self.store.save(&document)?;
        self.document = document;
        Ok(())
    }
}
