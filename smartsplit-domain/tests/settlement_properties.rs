use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use proptest::prelude::*;
use smartsplit_domain::{
    settlement_epsilon, BalanceCalculator, Expense, ExpenseId, Group, GroupId, Member, MemberId,
    Money, SettlementPlanner,
};

const NAMES: [&str; 6] = ["Anna", "Bruno", "Carla", "Dario", "Elena", "Fabio"];

// Front-loads the remainder so the split is exact in cents.
fn split_cents(total: i64, parts: usize) -> Vec<i64> {
    let parts_i = parts as i64;
    let base = total / parts_i;
    let remainder = (total % parts_i) as usize;
    (0..parts)
        .map(|idx| if idx < remainder { base + 1 } else { base })
        .collect()
}

fn build_group(
    member_count: usize,
    expense_count: usize,
    total_cents: &[i64],
    payer_indexes: &[usize],
    consumed_permille: &[u32],
    consumer_counts: &[usize],
) -> Group {
    let members: Vec<Member> = (0..member_count)
        .map(|idx| Member {
            id: MemberId::new(format!("m{idx}")),
            name: NAMES[idx].to_owned(),
            added_at: DateTime::<Utc>::UNIX_EPOCH,
        })
        .collect();

    let mut expenses = Vec::with_capacity(expense_count);
    for idx in 0..expense_count {
        let total = total_cents.get(idx).copied().unwrap_or(1);
        let payer_idx = payer_indexes.get(idx).copied().unwrap_or(0) % member_count;
        let permille = consumed_permille.get(idx).copied().unwrap_or(0);
        let consumer_count = (consumer_counts.get(idx).copied().unwrap_or(1) % member_count).max(1);

        let consumed = total * i64::from(permille) / 1000;
        let member_expenses: BTreeMap<MemberId, Money> = split_cents(consumed, consumer_count)
            .into_iter()
            .enumerate()
            .filter(|(_, cents)| *cents > 0)
            .map(|(consumer_idx, cents)| (MemberId::new(format!("m{consumer_idx}")), Money::new(cents, 2)))
            .collect();

        expenses.push(Expense {
            id: ExpenseId::new(format!("e{idx}")),
            description: format!("expense {idx}"),
            location: None,
            date: NaiveDate::default(),
            total_amount: Money::new(total, 2),
            paid_by: MemberId::new(format!("m{payer_idx}")),
            member_expenses,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        });
    }

    Group::try_new(
        GroupId::new("g1"),
        "Generated".to_owned(),
        members,
        expenses,
        DateTime::<Utc>::UNIX_EPOCH,
    )
    .expect("group build failed")
}

proptest! {
    #[test]
    fn balances_conserve_unconsumed_remainders(
        member_count in 2usize..=6,
        expense_count in 0usize..=20,
        total_cents in prop::collection::vec(1i64..=20_000, 0..=20),
        payer_indexes in prop::collection::vec(0usize..=5, 0..=20),
        consumed_permille in prop::collection::vec(0u32..=1000, 0..=20),
        consumer_counts in prop::collection::vec(1usize..=6, 0..=20),
    ) {
        let group = build_group(
            member_count,
            expense_count,
            &total_cents,
            &payer_indexes,
            &consumed_permille,
            &consumer_counts,
        );

        let balances = BalanceCalculator::calculate(&group);

        let net_total: Money = balances.values().map(|entry| entry.balance).sum();
        let remainder_total: Money = group
            .expenses()
            .iter()
            .map(Expense::unconsumed_remainder)
            .sum();
        prop_assert_eq!(net_total, remainder_total);

        for entry in balances.values() {
            prop_assert_eq!(entry.balance, entry.total_paid - entry.total_consumed);
        }
    }
}

proptest! {
    #[test]
    fn transfers_move_balances_toward_zero(
        member_count in 2usize..=6,
        expense_count in 1usize..=20,
        total_cents in prop::collection::vec(1i64..=20_000, 1..=20),
        payer_indexes in prop::collection::vec(0usize..=5, 1..=20),
        consumed_permille in prop::collection::vec(0u32..=1000, 1..=20),
        consumer_counts in prop::collection::vec(1usize..=6, 1..=20),
    ) {
        let group = build_group(
            member_count,
            expense_count,
            &total_cents,
            &payer_indexes,
            &consumed_permille,
            &consumer_counts,
        );

        let balances = BalanceCalculator::calculate(&group);
        let settlements = SettlementPlanner::plan_transfers(&balances);
        let epsilon = settlement_epsilon();

        for settlement in &settlements {
            prop_assert!(settlement.amount > epsilon);
            prop_assert_ne!(&settlement.from, &settlement.to);
        }

        let mut final_balances: HashMap<&str, Money> = balances
            .values()
            .map(|entry| (entry.name.as_str(), entry.balance))
            .collect();
        for settlement in &settlements {
            *final_balances
                .get_mut(settlement.from.as_str())
                .expect("debtor is a known member") += settlement.amount;
            *final_balances
                .get_mut(settlement.to.as_str())
                .expect("creditor is a known member") -= settlement.amount;
        }

        // Transfers move value around without creating or destroying any.
        let initial_total: Money = balances.values().map(|entry| entry.balance).sum();
        let final_total: Money = final_balances.values().copied().sum();
        prop_assert_eq!(final_total, initial_total);

        // Every transfer moves its two parties toward zero and never past it;
        // members already inside the tolerance band are untouched.
        for entry in balances.values() {
            let remaining = final_balances[entry.name.as_str()];
            if entry.balance > epsilon {
                prop_assert!(
                    remaining >= Money::ZERO && remaining <= entry.balance,
                    "creditor {} moved from {} to {}",
                    entry.name,
                    entry.balance,
                    remaining
                );
            } else if entry.balance < -epsilon {
                prop_assert!(
                    remaining <= Money::ZERO && remaining >= entry.balance,
                    "debtor {} moved from {} to {}",
                    entry.name,
                    entry.balance,
                    remaining
                );
            } else {
                prop_assert_eq!(remaining, entry.balance);
            }
        }

        // The greedy pass runs until one side is exhausted: either every
        // debtor ends inside the tolerance, or every creditor does.
        let debtors_settled = balances
            .values()
            .filter(|entry| entry.balance < -epsilon)
            .all(|entry| final_balances[entry.name.as_str()].abs() <= epsilon);
        let creditors_drained = balances
            .values()
            .filter(|entry| entry.balance > epsilon)
            .all(|entry| final_balances[entry.name.as_str()] <= epsilon);
        prop_assert!(
            debtors_settled || creditors_drained,
            "plan stopped with open positions on both sides"
        );
    }
}

proptest! {
    #[test]
    fn computation_is_idempotent(
        member_count in 2usize..=6,
        expense_count in 1usize..=12,
        total_cents in prop::collection::vec(1i64..=20_000, 1..=12),
        payer_indexes in prop::collection::vec(0usize..=5, 1..=12),
        consumed_permille in prop::collection::vec(0u32..=1000, 1..=12),
        consumer_counts in prop::collection::vec(1usize..=6, 1..=12),
    ) {
        let group = build_group(
            member_count,
            expense_count,
            &total_cents,
            &payer_indexes,
            &consumed_permille,
            &consumer_counts,
        );

        let first_balances = BalanceCalculator::calculate(&group);
        let second_balances = BalanceCalculator::calculate(&group);
        prop_assert_eq!(&first_balances, &second_balances);

        let first_plan = SettlementPlanner::plan_transfers(&first_balances);
        let second_plan = SettlementPlanner::plan_transfers(&second_balances);
        prop_assert_eq!(first_plan, second_plan);
    }
}
