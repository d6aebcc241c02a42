use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{prelude::FromPrimitive, Decimal};
use serde_json::Value;
use smartsplit_domain::{
    Expense, ExpenseId, Group, GroupId, GroupLimits, Member, MemberId, Money,
};

use crate::{
    error::NormalizeError,
    records::{RawExpense, RawGroup, RawMember},
};

pub const FALLBACK_GROUP_NAME: &str = "Unnamed group";
pub const FALLBACK_MEMBER_NAME: &str = "Unnamed member";
pub const FALLBACK_EXPENSE_DESCRIPTION: &str = "Expense";

/// Lenient amount coercion: JSON numbers and numeric strings pass through,
/// anything else counts as zero.
pub fn parse_amount(value: &Value) -> Money {
    match value {
        Value::Number(number) => match number.as_f64().and_then(Decimal::from_f64) {
            Some(amount) => Money::from_decimal(amount),
            None => {
                tracing::warn!(raw = %number, "amount out of range, treated as zero");
                Money::ZERO
            }
        },
        Value::String(text) => match text.trim().parse::<Decimal>() {
            Ok(amount) => Money::from_decimal(amount),
            Err(_) => {
                tracing::warn!(raw = %text, "unparsable amount, treated as zero");
                Money::ZERO
            }
        },
        Value::Null => Money::ZERO,
        other => {
            tracing::warn!(raw = %other, "non-scalar amount, treated as zero");
            Money::ZERO
        }
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
        .ok()
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .ok()
}

fn normalize_timestamp(raw: Option<&str>, field: &'static str, owner: &str) -> DateTime<Utc> {
    match raw {
        None => DateTime::<Utc>::UNIX_EPOCH,
        Some(text) => match parse_timestamp(text) {
            Some(timestamp) => timestamp,
            None => {
                tracing::warn!(owner, field, raw = text, "unparsable timestamp, using epoch");
                DateTime::<Utc>::UNIX_EPOCH
            }
        },
    }
}

fn normalize_member(raw: RawMember, index: usize) -> Member {
    let id = raw
        .id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| format!("member-{index}"));
    let name = raw
        .name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_MEMBER_NAME.to_owned());
    let added_at = normalize_timestamp(raw.added_at.as_deref(), "addedAt", &id);

    Member {
        id: MemberId::new(id),
        name,
        added_at,
    }
}

fn normalize_expense(raw: RawExpense, index: usize, members: &[Member]) -> Expense {
    let id = raw
        .id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| format!("expense-{index}"));
    let description = raw
        .description
        .filter(|description| !description.is_empty())
        .unwrap_or_else(|| FALLBACK_EXPENSE_DESCRIPTION.to_owned());
    let location = raw.location.filter(|location| !location.is_empty());

    let date = match raw.date.as_deref() {
        None => NaiveDate::default(),
        Some(text) => parse_date(text).unwrap_or_else(|| {
            tracing::warn!(expense = %id, raw = text, "unparsable date, using epoch date");
            NaiveDate::default()
        }),
    };

    let total_amount = raw
        .total_amount
        .as_ref()
        .map(parse_amount)
        .unwrap_or(Money::ZERO);

    // A missing payer falls back to the first member, matching how legacy
    // documents were repaired on load.
    let paid_by = raw
        .paid_by
        .filter(|payer| !payer.is_empty())
        .map(MemberId::new)
        .or_else(|| members.first().map(|member| member.id.clone()))
        .unwrap_or_else(|| MemberId::new(""));

    let member_expenses: BTreeMap<MemberId, Money> = raw
        .member_expenses
        .unwrap_or_default()
        .into_iter()
        .map(|(member_id, amount)| (MemberId::new(member_id), parse_amount(&amount)))
        .collect();

    let created_at = normalize_timestamp(raw.created_at.as_deref(), "createdAt", &id);

    Expense {
        id: ExpenseId::new(id),
        description,
        location,
        date,
        total_amount,
        paid_by,
        member_expenses,
        created_at,
    }
}

/// Turns a raw store document into a validated [`Group`].
///
/// Optional scalars are filled deterministically (synthetic ids use
/// `position` and the element index, timestamps fall back to the epoch), so
/// the same document always normalizes to the same group. Missing `members`
/// or `expenses` sequences are structural damage and fail instead.
pub fn normalize_group(raw: RawGroup, position: usize) -> Result<Group, NormalizeError> {
    normalize_group_with_limits(raw, position, GroupLimits::default())
}

pub fn normalize_group_with_limits(
    raw: RawGroup,
    position: usize,
    limits: GroupLimits,
) -> Result<Group, NormalizeError> {
    let id = raw
        .id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| format!("group-{position}"));
    let name = raw
        .name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_GROUP_NAME.to_owned());

    let raw_members = raw
        .members
        .ok_or_else(|| NormalizeError::MissingMembers { group: id.clone() })?;
    let raw_expenses = raw
        .expenses
        .ok_or_else(|| NormalizeError::MissingExpenses { group: id.clone() })?;

    let members: Vec<Member> = raw_members
        .into_iter()
        .enumerate()
        .map(|(index, member)| normalize_member(member, index))
        .collect();

    let expenses: Vec<Expense> = raw_expenses
        .into_iter()
        .enumerate()
        .map(|(index, expense)| normalize_expense(expense, index, &members))
        .collect();

    let created_at = normalize_timestamp(raw.created_at.as_deref(), "createdAt", &id);

    Ok(Group::try_new_with_limits(
        GroupId::new(id),
        name,
        members,
        expenses,
        created_at,
        limits,
    )?)
}
