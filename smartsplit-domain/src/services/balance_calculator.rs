use crate::model::{Balance, Group, MemberBalances, Money};

/// Net position aggregation over a group's expense history.
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Computes paid and consumed totals and the resulting net balance for
    /// every current member.
    ///
    /// A group without expenses yields an empty map. Once any expense exists,
    /// every member gets an entry, zeroed or not. Payer and share references
    /// that no longer match a current member are skipped; stored expenses may
    /// outlive the member they point at.
    pub fn calculate(group: &Group) -> MemberBalances {
        if group.expenses().is_empty() {
            return MemberBalances::new();
        }

        let mut balances: MemberBalances = group
            .members()
            .iter()
            .map(|member| {
                (
                    member.id.clone(),
                    Balance {
                        member_id: member.id.clone(),
                        name: member.name.clone(),
                        total_paid: Money::ZERO,
                        total_consumed: Money::ZERO,
                        balance: Money::ZERO,
                    },
                )
            })
            .collect();

        for expense in group.expenses() {
            match balances.get_mut(&expense.paid_by) {
                Some(entry) => entry.total_paid += expense.total_amount,
                None => tracing::debug!(
                    expense_id = %expense.id,
                    payer = %expense.paid_by,
                    "expense payer is not a current member, paid total skipped"
                ),
            }

            for (member_id, amount) in expense.positive_shares() {
                if let Some(entry) = balances.get_mut(member_id) {
                    entry.total_consumed += amount;
                }
            }
        }

        for entry in balances.values_mut() {
            entry.balance = entry.total_paid - entry.total_consumed;
        }

        balances
    }
}
