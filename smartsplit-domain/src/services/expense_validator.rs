use thiserror::Error;

use crate::model::{ExpenseDraft, Member, MemberId, Money};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    #[error("Expense description must not be empty")]
    EmptyDescription,
    #[error("Expense total must be greater than zero")]
    NonPositiveTotal,
    #[error("Expense has no payer")]
    MissingPayer,
    #[error("Payer '{0}' is not a member of the group")]
    UnknownPayer(MemberId),
    #[error("At least one member must have a positive consumed amount")]
    NoConsumers,
    #[error(
        "Total consumed ({}) exceeds total paid ({})",
        .consumed.to_fixed(),
        .total.to_fixed()
    )]
    ConsumedExceedsTotal { consumed: Money, total: Money },
}

/// Gatekeeper for expense input: checks run in a fixed order and the first
/// failure wins.
pub struct ExpenseValidator;

impl ExpenseValidator {
    pub fn validate(
        draft: &ExpenseDraft,
        members: &[Member],
    ) -> Result<(), ExpenseValidationError> {
        if draft.description.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyDescription);
        }

        if draft.total_amount <= Money::ZERO {
            return Err(ExpenseValidationError::NonPositiveTotal);
        }

        let Some(paid_by) = draft.paid_by.as_ref() else {
            return Err(ExpenseValidationError::MissingPayer);
        };
        if !members.iter().any(|member| member.id == *paid_by) {
            return Err(ExpenseValidationError::UnknownPayer(paid_by.clone()));
        }

        // Zero and negative share entries are inert, so the consumed total is
        // the sum of positive entries only.
        let consumed: Money = draft
            .member_expenses
            .values()
            .copied()
            .filter(|amount| *amount > Money::ZERO)
            .sum();
        if consumed.is_zero() {
            return Err(ExpenseValidationError::NoConsumers);
        }

        // Equality is allowed; only a strictly larger consumed total fails.
        if consumed > draft.total_amount {
            return Err(ExpenseValidationError::ConsumedExceedsTotal {
                consumed,
                total: draft.total_amount,
            });
        }

        Ok(())
    }
}
