use crate::document::model::Budget;

/// Collects the reasons a budget cannot be saved yet.
///
/// Rules are checked independently, one message per violated rule, and the
/// order is stable. An empty result means the budget is saveable.
pub fn validation_messages(budget: &Budget) -> Vec<String> {
    let mut errors = Vec::new();

    if budget.name.is_empty() {
        errors.push("No name set".to_string());
    }
    if budget.accounts.is_empty() {
        errors.push("No accounts selected".to_string());
    }
    if budget.first_day.is_none() {
        errors.push("No first day set".to_string());
    }
    if budget.last_day.is_none() {
        errors.push("No last day set".to_string());
    }
    if let (Some(first), Some(last)) = (budget.first_day, budget.last_day) {
        if first > last {
            errors.push("Last day must be after first day".to_string());
        }
    }
    if !budget.target_balance.is_finite() {
        errors.push("Enter a target balance".to_string());
    }

    errors
}

/// True when no validation rule is violated.
pub fn is_saveable(budget: &Budget) -> bool {
    validation_messages(budget).is_empty()
}
