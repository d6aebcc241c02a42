use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use smartsplit_domain::{Group, Money};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageReport {
    pub total_groups: usize,
    pub total_members: usize,
    pub total_expenses: usize,
    pub total_amount: Money,
    pub average_group_size: Decimal,
    pub average_expense_amount: Money,
}

/// Aggregates headline usage figures across every stored group.
pub fn usage_report(groups: &[Group]) -> UsageReport {
    let total_groups = groups.len();
    let total_members: usize = groups.iter().map(|group| group.members().len()).sum();
    let total_expenses: usize = groups.iter().map(|group| group.expenses().len()).sum();
    let total_amount: Money = groups
        .iter()
        .flat_map(|group| group.expenses())
        .map(|expense| expense.total_amount)
        .sum();

    let average_group_size = if total_groups == 0 {
        Decimal::ZERO
    } else {
        (Decimal::from(total_members as u64) / Decimal::from(total_groups as u64))
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    };
    let average_expense_amount = if total_expenses == 0 {
        Money::ZERO
    } else {
        Money::from_decimal(
            (total_amount.as_decimal() / Decimal::from(total_expenses as u64))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    };

    UsageReport {
        total_groups,
        total_members,
        total_expenses,
        total_amount,
        average_group_size,
        average_expense_amount,
    }
}
