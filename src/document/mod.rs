//! The stored document: the single persisted aggregate of accounts and
//! budgets, plus the pure update functions that transform it.

pub mod model;
pub mod updates;
pub mod validate;

pub use model::{Account, Budget, StoredDocument};
pub use updates::{
    add_account, add_budget, delete_account, delete_budget, save_account, save_budget,
    toggle_account_in_budget,
};
pub use validate::{is_saveable, validation_messages};
