use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use smartsplit_domain::{
    Expense, ExpenseDraft, ExpenseId, ExpenseValidationError, ExpenseValidator, Group, Member,
    MemberId, Money,
};

use crate::error::GroupEditError;

/// Copy-on-write edits over a group: every operation takes the current value
/// and hands back a freshly validated one, leaving the input untouched.
pub struct GroupEditor;

impl GroupEditor {
    /// Adds a member with a trimmed name, rejecting blank and
    /// case-insensitively duplicated names.
    pub fn add_member(group: &Group, member: Member) -> Result<Group, GroupEditError> {
        let trimmed = member.name.trim().to_owned();
        if trimmed.is_empty() {
            return Err(GroupEditError::EmptyMemberName);
        }
        let lowered = trimmed.to_lowercase();
        if group
            .members()
            .iter()
            .any(|existing| existing.name.to_lowercase() == lowered)
        {
            return Err(GroupEditError::DuplicateMemberName(trimmed));
        }

        let member = Member {
            name: trimmed,
            ..member
        };

        let (id, name, mut members, expenses, created_at) = group.clone().into_parts();
        members.push(member);
        Ok(Group::try_new(id, name, members, expenses, created_at)?)
    }

    /// Removes a member along with every expense they paid. Their share
    /// entries are stripped from surviving expenses while each recorded
    /// total stays as paid, so the gap surfaces as unconsumed remainder.
    pub fn remove_member(group: &Group, member_id: &MemberId) -> Result<Group, GroupEditError> {
        if group.member(member_id).is_none() {
            return Err(GroupEditError::UnknownMember(member_id.clone()));
        }

        let (id, name, members, expenses, created_at) = group.clone().into_parts();
        let members: Vec<Member> = members
            .into_iter()
            .filter(|member| member.id != *member_id)
            .collect();

        let (kept, dropped): (Vec<Expense>, Vec<Expense>) = expenses
            .into_iter()
            .partition(|expense| expense.paid_by != *member_id);
        let expenses: Vec<Expense> = kept
            .into_iter()
            .map(|mut expense| {
                expense.member_expenses.remove(member_id);
                expense
            })
            .collect();

        tracing::info!(
            member = %member_id,
            dropped_expenses = dropped.len(),
            "removed member and cascaded their expenses"
        );

        Ok(Group::try_new(id, name, members, expenses, created_at)?)
    }

    /// Validates the draft and appends it as a new expense. Description and
    /// location are trimmed; only positive share entries are stored.
    pub fn append_expense(
        group: &Group,
        draft: ExpenseDraft,
        id: ExpenseId,
        date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Result<Group, GroupEditError> {
        ExpenseValidator::validate(&draft, group.members())?;

        let Some(paid_by) = draft.paid_by else {
            // validate() already requires a payer
            return Err(ExpenseValidationError::MissingPayer.into());
        };

        let member_expenses: BTreeMap<MemberId, Money> = draft
            .member_expenses
            .into_iter()
            .filter(|(_, amount)| *amount > Money::ZERO)
            .collect();

        let location = draft.location.trim();
        let location = (!location.is_empty()).then(|| location.to_owned());

        let expense = Expense {
            id,
            description: draft.description.trim().to_owned(),
            location,
            date,
            total_amount: draft.total_amount,
            paid_by,
            member_expenses,
            created_at,
        };

        let (group_id, name, members, mut expenses, group_created_at) = group.clone().into_parts();
        expenses.push(expense);
        Ok(Group::try_new(
            group_id,
            name,
            members,
            expenses,
            group_created_at,
        )?)
    }

    pub fn remove_expense(group: &Group, expense_id: &ExpenseId) -> Result<Group, GroupEditError> {
        if group.expense(expense_id).is_none() {
            return Err(GroupEditError::UnknownExpense(expense_id.clone()));
        }

        let (id, name, members, expenses, created_at) = group.clone().into_parts();
        let expenses: Vec<Expense> = expenses
            .into_iter()
            .filter(|expense| expense.id != *expense_id)
            .collect();

        Ok(Group::try_new(id, name, members, expenses, created_at)?)
    }
}
