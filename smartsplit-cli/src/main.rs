use std::{borrow::Cow, env, fs, process};

use smartsplit_application::{import_groups, usage_report};
use smartsplit_domain::{BalanceCalculator, Group, SettlementPlanner, StatsAggregator};

type CliResult<T> = Result<T, Cow<'static, str>>;

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let Some(path) = env::args().nth(1) else {
        return Err("Usage: smartsplit-cli <snapshot.json>".into());
    };

    let snapshot =
        fs::read_to_string(&path).map_err(|err| format!("Failed to read '{path}': {err}"))?;

    let groups = import_groups(&snapshot).map_err(|err| err.to_string())?;

    for group in &groups {
        print_group_report(group);
    }

    let report = usage_report(&groups);
    println!("== Overview ==");
    println!(
        "{} groups, {} members, {} expenses totalling {}",
        report.total_groups,
        report.total_members,
        report.total_expenses,
        report.total_amount.to_fixed()
    );

    Ok(())
}

fn print_group_report(group: &Group) {
    println!("== {} ==", group.name());

    let balances = BalanceCalculator::calculate(group);
    for balance in balances.values() {
        println!(
            "  {}: paid {}, consumed {}, balance {}",
            balance.name,
            balance.total_paid.to_fixed(),
            balance.total_consumed.to_fixed(),
            balance.balance.to_fixed()
        );
    }

    let settlements = SettlementPlanner::plan_transfers(&balances);
    if settlements.is_empty() {
        println!("  All settled up");
    } else {
        for settlement in &settlements {
            println!(
                "  {} -> {}: {}",
                settlement.from,
                settlement.to,
                settlement.amount.to_fixed()
            );
        }
    }

    let stats = StatsAggregator::aggregate(group);
    println!(
        "  {} expenses totalling {} (average {})",
        stats.total_expenses,
        stats.total_amount.to_fixed(),
        stats.average_expense.to_fixed()
    );
    if let Some(name) = &stats.most_active_user {
        println!("  Most active: {name}");
    }
    println!();
}
