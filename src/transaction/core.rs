//! Defines the core data models for transactions.

use std::{cmp::Ordering, fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};
use time::{
    Date, OffsetDateTime, format_description::BorrowedFormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};
use uuid::Uuid;

use crate::UserID;

/// The format transaction dates are written in, e.g. "2024-01-31".
pub(crate) const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Dates typed without leading zeros, e.g. "2024-1-5".
const UNPADDED_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month padding:none]-[day padding:none]");

/// The identifier of a transaction, a UUID v4 string assigned at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier, e.g. one taken from a URL.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(format!("\"{other}\" is not a transaction kind")),
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: String| FromSqlError::Other(error.into()))
    }
}

/// An income or expense belonging to one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub kind: TransactionKind,
    /// Never negative in practice, the kind gives the direction.
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: f64,
    /// Name of a category. Not checked against the category registry.
    #[serde(default)]
    pub category: String,
    /// An ISO calendar date. Kept as text so that malformed dates survive a
    /// round trip and can be grouped as invalid.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
    pub owner_id: UserID,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl Transaction {
    /// The record's date, if it is a valid calendar date.
    pub fn parsed_date(&self) -> Option<Date> {
        parse_date(&self.date)
    }
}

/// The data needed to create a transaction.
///
/// The amount is kept as the raw text the user entered and is coerced by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: String,
    pub category: String,
    /// Defaults to today when missing or blank.
    pub date: Option<String>,
    /// Defaults to the empty string.
    pub description: Option<String>,
}

/// A partial update, only the fields that are `Some` are changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub kind: Option<TransactionKind>,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
}

impl TransactionPatch {
    /// Merge the patch into `transaction` and stamp `updated_at`, even if the patch is empty.
    pub fn apply(self, transaction: &mut Transaction, now: OffsetDateTime) {
        if let Some(kind) = self.kind {
            transaction.kind = kind;
        }
        if let Some(amount) = self.amount {
            transaction.amount = coerce_amount(&amount);
        }
        if let Some(category) = self.category {
            transaction.category = category;
        }
        if let Some(date) = self.date {
            transaction.date = date;
        }
        if let Some(description) = self.description {
            transaction.description = description;
        }

        transaction.updated_at = Some(now);
    }
}

/// Convert user input into an amount.
///
/// Surrounding whitespace is ignored. Empty input, and anything that is not a
/// finite number, is 0.
pub fn coerce_amount(raw_amount: &str) -> f64 {
    raw_amount
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .unwrap_or(0.0)
}

/// Accepts numbers, numeric strings, and treats anything else as 0.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Number(f64),
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match RawAmount::deserialize(deserializer)? {
        RawAmount::Number(amount) if amount.is_finite() => amount,
        RawAmount::Number(_) | RawAmount::Other(_) => 0.0,
        RawAmount::Text(text) => coerce_amount(&text),
    })
}

/// Parse an ISO calendar date, or the date part of an RFC 3339 timestamp.
///
/// The month and day may be written without a leading zero.
pub fn parse_date(raw_date: &str) -> Option<Date> {
    let raw_date = raw_date.trim();

    Date::parse(raw_date, DATE_FORMAT)
        .or_else(|_| Date::parse(raw_date, UNPADDED_DATE_FORMAT))
        .ok()
        .or_else(|| {
            OffsetDateTime::parse(raw_date, &Rfc3339)
                .ok()
                .map(|date_time| date_time.date())
        })
}

/// Format `date` the way transaction dates are stored.
pub fn format_date(date: Date) -> String {
    // The format only has date components, which `Date` always has.
    date.format(DATE_FORMAT).unwrap_or_default()
}

/// Newest first: date descending, records with invalid dates last, then the
/// most recently created first.
pub fn sort_transactions(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        let by_date = match (a.parsed_date(), b.parsed_date()) {
            (Some(a_date), Some(b_date)) => b_date.cmp(&a_date),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };

        by_date.then_with(|| b.created_at.cmp(&a.created_at))
    });
}

#[cfg(test)]
mod transaction_core_tests {
    use time::{Duration, OffsetDateTime, macros::date};

    use crate::UserID;

    use super::{
        Transaction, TransactionId, TransactionKind, TransactionPatch, coerce_amount,
        parse_date, sort_transactions,
    };

    fn transaction(date: &str, created_offset_seconds: i64) -> Transaction {
        Transaction {
            id: TransactionId::generate(),
            kind: TransactionKind::Expense,
            amount: 1.0,
            category: "Food".to_owned(),
            date: date.to_owned(),
            description: String::new(),
            owner_id: UserID::new(1),
            created_at: OffsetDateTime::UNIX_EPOCH + Duration::seconds(created_offset_seconds),
            updated_at: None,
        }
    }

    #[test]
    fn coerce_amount_parses_numbers() {
        assert_eq!(coerce_amount("12.5"), 12.5);
        assert_eq!(coerce_amount(" 1000 "), 1000.0);
    }

    #[test]
    fn coerce_amount_defaults_to_zero() {
        assert_eq!(coerce_amount(""), 0.0);
        assert_eq!(coerce_amount("abc"), 0.0);
        assert_eq!(coerce_amount("NaN"), 0.0);
        assert_eq!(coerce_amount("inf"), 0.0);
    }

    #[test]
    fn parse_date_accepts_iso_dates_and_timestamps() {
        assert_eq!(parse_date("2024-01-02"), Some(date!(2024 - 01 - 02)));
        assert_eq!(
            parse_date("2024-01-02T10:00:00Z"),
            Some(date!(2024 - 01 - 02))
        );
        assert_eq!(parse_date("02/01/2024"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn parse_date_accepts_unpadded_month_and_day() {
        assert_eq!(parse_date("2024-1-5"), Some(date!(2024 - 01 - 05)));
        assert_eq!(parse_date("2024-12-5"), Some(date!(2024 - 12 - 05)));
        assert_eq!(parse_date("2024-13-5"), None);
    }

    #[test]
    fn sorts_by_date_then_created_at() {
        let mut transactions = vec![
            transaction("2024-01-01", 0),
            transaction("not a date", 5),
            transaction("2024-03-01", 1),
            transaction("2024-01-01", 2),
        ];
        let want = vec![
            transactions[2].id.clone(),
            transactions[3].id.clone(),
            transactions[0].id.clone(),
            transactions[1].id.clone(),
        ];

        sort_transactions(&mut transactions);

        let got = transactions
            .into_iter()
            .map(|transaction| transaction.id)
            .collect::<Vec<_>>();
        assert_eq!(got, want);
    }

    #[test]
    fn empty_patch_only_stamps_updated_at() {
        let original = transaction("2024-01-01", 0);
        let mut patched = original.clone();
        let now = OffsetDateTime::now_utc();

        TransactionPatch::default().apply(&mut patched, now);

        assert_eq!(patched.updated_at, Some(now));
        patched.updated_at = None;
        assert_eq!(patched, original);
    }

    #[test]
    fn patch_coerces_amount() {
        let mut patched = transaction("2024-01-01", 0);

        TransactionPatch {
            amount: Some("not a number".to_owned()),
            ..Default::default()
        }
        .apply(&mut patched, OffsetDateTime::now_utc());

        assert_eq!(patched.amount, 0.0);
    }

    #[test]
    fn deserialize_coerces_legacy_amounts() {
        let json = r#"[
            {"id":"a","kind":"income","amount":"1000","owner_id":1,"created_at":"2024-01-01T00:00:00Z"},
            {"id":"b","kind":"expense","amount":null,"owner_id":1,"created_at":"2024-01-01T00:00:00Z"},
            {"id":"c","kind":"expense","amount":"lots","owner_id":1,"created_at":"2024-01-01T00:00:00Z"}
        ]"#;

        let transactions: Vec<Transaction> = serde_json::from_str(json).unwrap();

        let amounts = transactions
            .iter()
            .map(|transaction| transaction.amount)
            .collect::<Vec<_>>();
        assert_eq!(amounts, vec![1000.0, 0.0, 0.0]);
        assert_eq!(transactions[0].category, "");
        assert_eq!(transactions[0].updated_at, None);
    }
}
