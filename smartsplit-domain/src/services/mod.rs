pub mod balance_calculator;
pub mod expense_validator;
pub mod settlement_planner;
pub mod stats_aggregator;

pub use balance_calculator::BalanceCalculator;
pub use expense_validator::{ExpenseValidationError, ExpenseValidator};
pub use settlement_planner::SettlementPlanner;
pub use stats_aggregator::StatsAggregator;
