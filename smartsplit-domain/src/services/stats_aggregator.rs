use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::model::{Group, GroupStats, MemberId, Money};

/// Descriptive statistics for a single group.
pub struct StatsAggregator;

impl StatsAggregator {
    pub fn aggregate(group: &Group) -> GroupStats {
        if group.expenses().is_empty() {
            return GroupStats {
                total_expenses: 0,
                total_amount: Money::ZERO,
                average_expense: Money::ZERO,
                most_active_user: None,
            };
        }

        let total_expenses = group.expenses().len();
        let total_amount: Money = group
            .expenses()
            .iter()
            .map(|expense| expense.total_amount)
            .sum();
        let average_expense =
            Money::from_decimal(total_amount.as_decimal() / Decimal::from(total_expenses as u64));

        // Insertion order is first-payment order, which decides exact ties
        // for the most active slot.
        let mut paid_totals: IndexMap<&MemberId, Money> = IndexMap::new();
        for expense in group.expenses() {
            *paid_totals.entry(&expense.paid_by).or_insert(Money::ZERO) += expense.total_amount;
        }

        let mut winner: Option<&MemberId> = None;
        let mut best = Money::ZERO;
        for (&member_id, &paid) in &paid_totals {
            if paid > best {
                best = paid;
                winner = Some(member_id);
            }
        }

        let most_active_user = winner.map(|member_id| match group.member(member_id) {
            Some(member) => member.name.clone(),
            None => member_id.to_string(),
        });

        GroupStats {
            total_expenses,
            total_amount,
            average_expense,
            most_active_user,
        }
    }
}
