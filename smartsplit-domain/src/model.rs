use std::{
    collections::BTreeMap,
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use chrono::{DateTime, NaiveDate, Utc};
use fxhash::FxHashSet;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: i64, scale: u32) -> Self {
        Self(Decimal::new(amount, scale))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Two-decimal display form, rounded half away from zero.
    pub fn to_fixed(self) -> String {
        let mut quantized = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        quantized.rescale(2);
        quantized.to_string()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Tolerance under which a residual amount counts as settled.
pub fn settlement_epsilon() -> Money {
    Money::new(1, 2)
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub added_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub date: NaiveDate,
    pub total_amount: Money,
    pub paid_by: MemberId,
    pub member_expenses: BTreeMap<MemberId, Money>,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Share entries with a positive amount; zero and negative entries are
    /// inert records and never count as consumption.
    pub fn positive_shares(&self) -> impl Iterator<Item = (&MemberId, Money)> {
        self.member_expenses
            .iter()
            .filter(|(_, amount)| **amount > Money::ZERO)
            .map(|(member_id, amount)| (member_id, *amount))
    }

    pub fn consumed_total(&self) -> Money {
        self.positive_shares().map(|(_, amount)| amount).sum()
    }

    pub fn unconsumed_remainder(&self) -> Money {
        self.total_amount - self.consumed_total()
    }
}

/// Input for a new expense before it has an identity or timestamps.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpenseDraft {
    pub description: String,
    pub location: String,
    pub total_amount: Money,
    pub paid_by: Option<MemberId>,
    pub member_expenses: BTreeMap<MemberId, Money>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupLimits {
    pub max_members: usize,
    pub max_expenses: usize,
}

impl Default for GroupLimits {
    fn default() -> Self {
        Self {
            max_members: 1_000,
            max_expenses: 50_000,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GroupBuildError {
    #[error("Duplicate member id '{0}' in group")]
    DuplicateMemberId(MemberId),
    #[error("Group has {count} members, limit is {limit}")]
    TooManyMembers { count: usize, limit: usize },
    #[error("Group has {count} expenses, limit is {limit}")]
    TooManyExpenses { count: usize, limit: usize },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    id: GroupId,
    name: String,
    members: Vec<Member>,
    expenses: Vec<Expense>,
    created_at: DateTime<Utc>,
}

impl Group {
    pub fn try_new(
        id: GroupId,
        name: String,
        members: Vec<Member>,
        expenses: Vec<Expense>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, GroupBuildError> {
        Self::try_new_with_limits(id, name, members, expenses, created_at, GroupLimits::default())
    }

    pub fn try_new_with_limits(
        id: GroupId,
        name: String,
        members: Vec<Member>,
        expenses: Vec<Expense>,
        created_at: DateTime<Utc>,
        limits: GroupLimits,
    ) -> Result<Self, GroupBuildError> {
        if members.len() > limits.max_members {
            return Err(GroupBuildError::TooManyMembers {
                count: members.len(),
                limit: limits.max_members,
            });
        }
        if expenses.len() > limits.max_expenses {
            return Err(GroupBuildError::TooManyExpenses {
                count: expenses.len(),
                limit: limits.max_expenses,
            });
        }

        let mut seen: FxHashSet<&MemberId> = FxHashSet::default();
        for member in &members {
            if !seen.insert(&member.id) {
                return Err(GroupBuildError::DuplicateMemberId(member.id.clone()));
            }
        }

        Ok(Self {
            id,
            name,
            members,
            expenses,
            created_at,
        })
    }

    pub fn id(&self) -> &GroupId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.members.iter().find(|member| member.id == *id)
    }

    pub fn expense(&self, id: &ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == *id)
    }

    /// Decomposes the group so an edited copy can be rebuilt through
    /// [`Group::try_new`].
    pub fn into_parts(self) -> (GroupId, String, Vec<Member>, Vec<Expense>, DateTime<Utc>) {
        (
            self.id,
            self.name,
            self.members,
            self.expenses,
            self.created_at,
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub member_id: MemberId,
    pub name: String,
    pub total_paid: Money,
    pub total_consumed: Money,
    pub balance: Money,
}

// Keyed by member id; the ordered map keeps iteration deterministic so
// downstream settlement plans never depend on hash order.
pub type MemberBalances = BTreeMap<MemberId, Balance>;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub from: String,
    pub to: String,
    pub amount: Money,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStats {
    pub total_expenses: usize,
    pub total_amount: Money,
    pub average_expense: Money,
    pub most_active_user: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn member(id: &str, name: &str) -> Member {
        Member {
            id: MemberId::new(id),
            name: name.to_owned(),
            added_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    fn expense(id: &str) -> Expense {
        Expense {
            id: ExpenseId::new(id),
            description: "Dinner".to_owned(),
            location: None,
            date: NaiveDate::default(),
            total_amount: Money::from_decimal(dec!(10)),
            paid_by: MemberId::new("m1"),
            member_expenses: BTreeMap::new(),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[rstest]
    #[case::integral(dec!(40), "40.00")]
    #[case::one_decimal(dec!(15.5), "15.50")]
    #[case::truncates_extra_digits(dec!(3.333), "3.33")]
    #[case::rounds_half_up(dec!(0.005), "0.01")]
    #[case::negative(dec!(-12.345), "-12.35")]
    #[case::zero(dec!(0), "0.00")]
    fn to_fixed_renders_two_decimals(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(Money::from_decimal(amount).to_fixed(), expected);
    }

    #[test]
    fn money_arithmetic_is_exact() {
        let mut total = Money::ZERO;
        for _ in 0..10 {
            total += Money::from_decimal(dec!(0.1));
        }
        assert_eq!(total, Money::new(1, 0));
        assert!((total - Money::new(1, 0)).is_zero());
    }

    #[test]
    fn group_rejects_duplicate_member_ids() {
        let err = Group::try_new(
            GroupId::new("g1"),
            "Trip".to_owned(),
            vec![member("m1", "Marco"), member("m1", "Sara")],
            Vec::new(),
            DateTime::<Utc>::UNIX_EPOCH,
        )
        .expect_err("duplicate ids must be rejected");

        assert_eq!(err, GroupBuildError::DuplicateMemberId(MemberId::new("m1")));
    }

    #[test]
    fn group_enforces_member_limit() {
        let limits = GroupLimits {
            max_members: 1,
            max_expenses: 10,
        };
        let err = Group::try_new_with_limits(
            GroupId::new("g1"),
            "Trip".to_owned(),
            vec![member("m1", "Marco"), member("m2", "Sara")],
            Vec::new(),
            DateTime::<Utc>::UNIX_EPOCH,
            limits,
        )
        .expect_err("member limit must be enforced");

        assert_eq!(
            err,
            GroupBuildError::TooManyMembers {
                count: 2,
                limit: 1
            }
        );
    }

    #[test]
    fn group_enforces_expense_limit() {
        let limits = GroupLimits {
            max_members: 10,
            max_expenses: 1,
        };
        let err = Group::try_new_with_limits(
            GroupId::new("g1"),
            "Trip".to_owned(),
            vec![member("m1", "Marco")],
            vec![expense("e1"), expense("e2")],
            DateTime::<Utc>::UNIX_EPOCH,
            limits,
        )
        .expect_err("expense limit must be enforced");

        assert_eq!(
            err,
            GroupBuildError::TooManyExpenses {
                count: 2,
                limit: 1
            }
        );
    }

    #[test]
    fn expense_ignores_non_positive_shares() {
        let expense = Expense {
            id: ExpenseId::new("e1"),
            description: "Dinner".to_owned(),
            location: None,
            date: NaiveDate::default(),
            total_amount: Money::from_decimal(dec!(40)),
            paid_by: MemberId::new("m1"),
            member_expenses: BTreeMap::from([
                (MemberId::new("m1"), Money::from_decimal(dec!(15))),
                (MemberId::new("m2"), Money::ZERO),
                (MemberId::new("m3"), Money::from_decimal(dec!(-5))),
            ]),
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        };

        assert_eq!(expense.consumed_total(), Money::from_decimal(dec!(15)));
        assert_eq!(
            expense.unconsumed_remainder(),
            Money::from_decimal(dec!(25))
        );
    }
}
