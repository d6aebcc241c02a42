use crate::{
    model::{settlement_epsilon, Group, MemberBalances, MemberId, Money, Settlement},
    services::BalanceCalculator,
};

/// Greedy debt-settlement planning over net balances.
pub struct SettlementPlanner;

struct OpenPosition {
    member_id: MemberId,
    name: String,
    remaining: Money,
}

// Largest remaining amount first; equal amounts fall back to ascending member
// id so the plan is stable across runs.
fn sort_open_positions(positions: &mut [OpenPosition]) {
    positions.sort_by(|a, b| {
        b.remaining
            .cmp(&a.remaining)
            .then_with(|| a.member_id.cmp(&b.member_id))
    });
}

impl SettlementPlanner {
    /// Computes balances for the group and plans transfers that settle them.
    pub fn plan(group: &Group) -> Vec<Settlement> {
        Self::plan_transfers(&BalanceCalculator::calculate(group))
    }

    /// Matches debtors against creditors, largest first, and emits one
    /// transfer per pairing.
    ///
    /// Members within the settlement tolerance of zero are left out entirely,
    /// and a creditor surplus that no debt covers stays unemitted. Transfers
    /// at or below the tolerance are suppressed.
    pub fn plan_transfers(balances: &MemberBalances) -> Vec<Settlement> {
        let epsilon = settlement_epsilon();

        let mut creditors: Vec<OpenPosition> = balances
            .values()
            .filter(|entry| entry.balance > epsilon)
            .map(|entry| OpenPosition {
                member_id: entry.member_id.clone(),
                name: entry.name.clone(),
                remaining: entry.balance,
            })
            .collect();

        let mut debtors: Vec<OpenPosition> = balances
            .values()
            .filter(|entry| entry.balance < -epsilon)
            .map(|entry| OpenPosition {
                member_id: entry.member_id.clone(),
                name: entry.name.clone(),
                remaining: entry.balance.abs(),
            })
            .collect();

        sort_open_positions(&mut creditors);
        sort_open_positions(&mut debtors);

        let mut settlements = Vec::new();
        let (mut i, mut j) = (0, 0);

        while i < creditors.len() && j < debtors.len() {
            let transfer = creditors[i].remaining.min(debtors[j].remaining);

            if transfer > epsilon {
                settlements.push(Settlement {
                    from: debtors[j].name.clone(),
                    to: creditors[i].name.clone(),
                    amount: transfer,
                });
            }

            creditors[i].remaining -= transfer;
            debtors[j].remaining -= transfer;

            if creditors[i].remaining <= epsilon {
                i += 1;
            }
            if debtors[j].remaining <= epsilon {
                j += 1;
            }
        }

        let creditor_residual: Money = creditors.iter().map(|c| c.remaining).sum();
        let debtor_residual: Money = debtors.iter().map(|d| d.remaining).sum();
        if !creditor_residual.is_zero() || !debtor_residual.is_zero() {
            tracing::debug!(
                transfers = settlements.len(),
                creditor_residual = %creditor_residual,
                debtor_residual = %debtor_residual,
                "settlement plan leaves residual balances"
            );
        }

        settlements
    }
}
