//! Bidirectional mapping between URL hash fragments and view descriptors.

/// Identifies which view is active. Derived from the URL hash on every
/// navigation and held only in memory, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    ViewBudgets,
    EditBudget { id: u64 },
    ViewAccounts,
    EditAccount { id: u64 },
    Settings,
}

impl Screen {
    /// Renders the hash fragment addressing this screen.
    pub fn hash(&self) -> String {
        match self {
            Screen::ViewBudgets => "#budgets".into(),
            Screen::EditBudget { id } => format!("#budget/{}", id),
            Screen::ViewAccounts => "#accounts".into(),
            Screen::EditAccount { id } => format!("#account/{}", id),
            Screen::Settings => "#settings".into(),
        }
    }

    /// Parses a hash fragment into a screen. Total: anything unrecognized
    /// logs a warning and falls back to the budgets list.
    pub fn from_hash(hash: &str) -> Screen {
        match hash {
            "#budgets" => Screen::ViewBudgets,
            "#accounts" => Screen::ViewAccounts,
            "#settings" => Screen::Settings,
            _ => {
                if let Some(id) = parse_id(hash, "#budget/") {
                    Screen::EditBudget { id }
                } else if let Some(id) = parse_id(hash, "#account/") {
                    Screen::EditAccount { id }
                } else {
                    tracing::warn!(hash, "unmatched route");
                    Screen::ViewBudgets
                }
            }
        }
    }
}

fn parse_id(hash: &str, prefix: &str) -> Option<u64> {
    let digits = hash.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
