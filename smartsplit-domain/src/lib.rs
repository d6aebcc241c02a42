#![warn(clippy::uninlined_format_args)]

pub mod model;
pub mod services;

pub use model::{
    settlement_epsilon, Balance, Expense, ExpenseDraft, ExpenseId, Group, GroupBuildError,
    GroupId, GroupLimits, GroupStats, Member, MemberBalances, MemberId, Money, Settlement,
};
pub use services::{
    BalanceCalculator, ExpenseValidationError, ExpenseValidator, SettlementPlanner,
    StatsAggregator,
};
