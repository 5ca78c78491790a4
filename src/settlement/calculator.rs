//! Pure settlement calculation. No persistence, no side effects; safe to
//! run repeatedly over the same snapshot of expenses.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::database::models::Expense;

/// What one settlement run would look like over a set of unsettled
/// expenses. Ephemeral; nothing here is persisted until the caller
/// confirms.
#[derive(Debug, Clone, Serialize)]
pub struct SettlementProposal {
    pub period_start: NaiveDateTime,
    pub period_end: NaiveDateTime,
    pub expense_count: usize,
    pub total_amount: i64,
    pub user1_paid_amount: i64,
    pub user2_paid_amount: i64,
    pub user1_owed_amount: i64,
    pub user2_owed_amount: i64,
    /// Positive: user1 pays user2. Negative: user2 pays user1.
    pub net_transfer_user1_to_user2: i64,
    /// Units dropped by the truncating split division,
    /// total - owed1 - owed2. Reported, never redistributed.
    pub rounding_remainder: i64,
    pub expense_ids: Vec<i64>,
    pub expenses: Vec<Expense>,
}

/// Computes the settlement for a couple over one period.
///
/// `user1_id` and `user2_id` are the couple's members as recorded on the
/// couple itself. They must come from couple membership, not from the
/// expense rows: a member who paid for nothing in the period would
/// otherwise be invisible.
pub fn calculate_proposal(
    user1_id: i64,
    user2_id: i64,
    period_start: NaiveDateTime,
    period_end: NaiveDateTime,
    expenses: Vec<Expense>,
) -> SettlementProposal {
    let mut total_amount = 0i64;
    let mut user1_paid_amount = 0i64;
    let mut user2_paid_amount = 0i64;
    let mut user1_owed_amount = 0i64;
    let mut user2_owed_amount = 0i64;
    let mut expense_ids = Vec::with_capacity(expenses.len());

    for expense in &expenses {
        total_amount += expense.amount;
        expense_ids.push(expense.expense_id);

        if expense.paid_by_user_id == user1_id {
            user1_paid_amount += expense.amount;
        } else if expense.paid_by_user_id == user2_id {
            user2_paid_amount += expense.amount;
        }

        // Truncating division: the share sums can fall short of the total
        // by up to one unit per expense. The shortfall is surfaced as
        // rounding_remainder below.
        user1_owed_amount += expense.amount * expense.split_user1 / 100;
        user2_owed_amount += expense.amount * expense.split_user2 / 100;
    }

    // Positive: user1's fair share exceeds what user1 already advanced, so
    // user1 owes the difference to user2.
    let net_transfer_user1_to_user2 = user1_owed_amount - user1_paid_amount;
    let rounding_remainder = total_amount - user1_owed_amount - user2_owed_amount;

    SettlementProposal {
        period_start,
        period_end,
        expense_count: expenses.len(),
        total_amount,
        user1_paid_amount,
        user2_paid_amount,
        user1_owed_amount,
        user2_owed_amount,
        net_transfer_user1_to_user2,
        rounding_remainder,
        expense_ids,
        expenses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const USER1: i64 = 1;
    const USER2: i64 = 2;

    fn date(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn expense(id: i64, amount: i64, paid_by: i64, split1: i64, split2: i64) -> Expense {
        Expense {
            expense_id: id,
            couple_id: 1,
            paid_by_user_id: paid_by,
            amount,
            category: "groceries".to_string(),
            description: None,
            date: date(10),
            split_user1: split1,
            split_user2: split2,
            is_settled: false,
            created_at: date(10),
            updated_at: date(10),
        }
    }

    #[test]
    fn empty_period_yields_zero_proposal() {
        let proposal = calculate_proposal(USER1, USER2, date(1), date(31), vec![]);

        assert_eq!(proposal.expense_count, 0);
        assert_eq!(proposal.total_amount, 0);
        assert_eq!(proposal.net_transfer_user1_to_user2, 0);
        assert!(proposal.expense_ids.is_empty());
        assert!(proposal.expenses.is_empty());
    }

    #[test]
    fn both_paid_even_split() {
        // user1 paid $30, user2 paid $10, both 50/50: user2 owes user1 $10.
        let expenses = vec![
            expense(1, 3000, USER1, 50, 50),
            expense(2, 1000, USER2, 50, 50),
        ];
        let proposal = calculate_proposal(USER1, USER2, date(1), date(31), expenses);

        assert_eq!(proposal.total_amount, 4000);
        assert_eq!(proposal.user1_paid_amount, 3000);
        assert_eq!(proposal.user2_paid_amount, 1000);
        assert_eq!(proposal.user1_owed_amount, 2000);
        assert_eq!(proposal.user2_owed_amount, 2000);
        assert_eq!(proposal.net_transfer_user1_to_user2, -1000);
    }

    #[test]
    fn single_payer_uneven_split() {
        // Only user1 paid: $100 and $50 at 60/40. user2 owes user1 $60.
        let expenses = vec![
            expense(1, 10000, USER1, 60, 40),
            expense(2, 5000, USER1, 60, 40),
        ];
        let proposal = calculate_proposal(USER1, USER2, date(1), date(31), expenses);

        assert_eq!(proposal.total_amount, 15000);
        assert_eq!(proposal.user1_paid_amount, 15000);
        assert_eq!(proposal.user2_paid_amount, 0);
        assert_eq!(proposal.user1_owed_amount, 9000);
        assert_eq!(proposal.user2_owed_amount, 6000);
        assert_eq!(proposal.rounding_remainder, 0);
        assert_eq!(proposal.net_transfer_user1_to_user2, -6000);
    }

    #[test]
    fn single_payer_net_equals_other_members_share() {
        // With one payer, the net transfer is exactly the non-payer's owed
        // share (they paid nothing toward it).
        let expenses = vec![
            expense(1, 777, USER2, 30, 70),
            expense(2, 1234, USER2, 30, 70),
        ];
        let proposal = calculate_proposal(USER1, USER2, date(1), date(31), expenses);

        assert_eq!(proposal.user2_paid_amount, proposal.total_amount);
        assert_eq!(
            proposal.net_transfer_user1_to_user2,
            proposal.user1_owed_amount
        );
        assert!(proposal.net_transfer_user1_to_user2 > 0);
    }

    #[test]
    fn member_absent_from_expenses_still_counted() {
        // user2 appears in no expense row at all but still owes their
        // split. Identity comes from the couple, not the expense set.
        let expenses = vec![expense(1, 200, USER1, 50, 50)];
        let proposal = calculate_proposal(USER1, USER2, date(1), date(31), expenses);

        assert_eq!(proposal.user2_paid_amount, 0);
        assert_eq!(proposal.user2_owed_amount, 100);
        assert_eq!(proposal.net_transfer_user1_to_user2, -100);
    }

    #[test]
    fn truncation_leaves_remainder() {
        // 101 at 50/50 truncates to 50 + 50; one unit is left over and
        // reported, not redistributed.
        let expenses = vec![expense(1, 101, USER1, 50, 50)];
        let proposal = calculate_proposal(USER1, USER2, date(1), date(31), expenses);

        assert_eq!(proposal.user1_owed_amount, 50);
        assert_eq!(proposal.user2_owed_amount, 50);
        assert_eq!(proposal.rounding_remainder, 1);
        assert_eq!(proposal.total_amount, 101);
    }

    #[test]
    fn total_matches_sum_of_listed_expenses() {
        let expenses = vec![
            expense(1, 10, USER1, 50, 50),
            expense(2, 20, USER2, 50, 50),
            expense(3, 30, USER1, 100, 0),
        ];
        let proposal = calculate_proposal(USER1, USER2, date(1), date(31), expenses);

        let listed: i64 = proposal.expenses.iter().map(|e| e.amount).sum();
        assert_eq!(proposal.total_amount, listed);
        assert_eq!(proposal.expense_ids, vec![1, 2, 3]);
    }
}
