//! Trip Expenses
//!
//! Expenses have no flag; statistics sum amounts per category against the
//! trip budget. Money is kept in integer cents.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use trip_store::{GroupStats, SortFn, Summary, Tracked};

use super::{de_cents, de_count, de_id, ser_cents, Category, MemberRef, NoFilter, Resource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub title: String,
    /// Cents
    #[serde(deserialize_with = "de_cents", serialize_with = "ser_cents")]
    pub amount: i64,
    pub date: NaiveDate,
    pub category: Category,
    #[serde(default)]
    pub paid_by: Option<MemberRef>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Tracked for Expense {
    type Id = String;
    type Group = String;
    type Status = ();

    fn id(&self) -> String {
        self.id.clone()
    }

    fn group(&self) -> Option<String> {
        Some(self.category.id.clone())
    }

    fn status(&self) {}

    fn set_status(&mut self, _status: ()) {}

    fn weight(&self) -> i64 {
        self.amount
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExpenseCategoryStat {
    pub category: Category,
    #[serde(default, deserialize_with = "de_cents")]
    pub amount: i64,
    #[serde(default, deserialize_with = "de_count")]
    pub count: u32,
}

/// `statistics/` of expenses
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExpenseStatistics {
    #[serde(default, deserialize_with = "de_cents")]
    pub budget: i64,
    #[serde(default, deserialize_with = "de_cents")]
    pub amount_spent: i64,
    #[serde(default)]
    pub category_stats: Vec<ExpenseCategoryStat>,
}

impl ExpenseStatistics {
    pub fn budget_remaining(&self) -> i64 {
        self.budget - self.amount_spent
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewExpense {
    pub title: String,
    #[serde(serialize_with = "ser_cents")]
    pub amount: i64,
    pub date: NaiveDate,
    pub category_id: String,
    pub paid_by_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

impl Resource for Expense {
    const SEGMENT: &'static str = "expenses";
    const CATEGORIES: Option<&'static str> = Some("/expenses/categories/");

    type Statistics = ExpenseStatistics;
    type Filter = NoFilter;
    type Draft = NewExpense;

    fn summarize(stats: &ExpenseStatistics) -> Summary<String, ()> {
        let total = stats.category_stats.iter().map(|stat| stat.count).sum();
        stats.category_stats.iter().fold(
            Summary::new()
                .with_total(total)
                .with_amount(stats.amount_spent)
                .with_status((), total),
            |summary, stat| {
                summary.with_group(
                    stat.category.id.clone(),
                    GroupStats::with_counts(stat.count, stat.amount, [((), stat.count)]),
                )
            },
        )
    }

    fn sort() -> Option<SortFn<Self>> {
        Some(|a, b| b.date.cmp(&a.date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn food() -> Category {
        Category {
            id: "c1".into(),
            name: "Food & Dining".into(),
        }
    }

    fn expense(id: &str, amount: i64) -> Expense {
        Expense {
            id: id.into(),
            title: "Meal".into(),
            amount,
            date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            category: food(),
            paid_by: None,
            notes: String::new(),
            created_at: None,
        }
    }

    #[test]
    fn test_expense_amount_from_decimal_string() {
        let expense: Expense = serde_json::from_str(
            r#"{"id": 1, "title": "Dinner", "amount": "42.50", "date": "2025-06-02",
                "category": {"id": "c1", "name": "Food & Dining"},
                "paid_by": {"id": 3, "user": {"id": 8, "email": "ana@example.com", "first_name": "Ana"}}}"#,
        )
        .unwrap();

        assert_eq!(expense.amount, 4250);
        assert_eq!(expense.group(), Some("c1".to_string()));
        assert_eq!(expense.weight(), 4250);
        assert_eq!(expense.paid_by.unwrap().display_name(), "Ana");
    }

    #[test]
    fn test_summarize_matches_recomputed() {
        let stats: ExpenseStatistics = serde_json::from_str(
            r#"{"budget": "500.00", "amount_spent": "60.30", "budget_remaining": "439.70",
                "category_stats": [{"category": {"id": "c1", "name": "Food & Dining"}, "amount": "60.30", "count": 3}]}"#,
        )
        .unwrap();
        assert_eq!(stats.budget_remaining(), 43970);

        let expenses = vec![expense("1", 10), expense("2", 20), expense("3", 6000)];
        assert_eq!(Expense::summarize(&stats), Summary::from_items(&expenses));
    }

    #[test]
    fn test_new_expense_body() {
        let draft = NewExpense {
            title: "Taxi".into(),
            amount: 1205,
            date: NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
            category_id: "c2".into(),
            paid_by_id: "m-1".into(),
            notes: String::new(),
        };
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            serde_json::json!({
                "title": "Taxi",
                "amount": "12.05",
                "date": "2025-06-03",
                "category_id": "c2",
                "paid_by_id": "m-1"
            })
        );
    }
}
