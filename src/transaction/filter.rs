//! Narrowing a set of transactions down to what the user asked to see.

use serde::Deserialize;

use crate::transaction::core::{Transaction, TransactionKind};

/// Which kinds of transaction to keep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KindFilter {
    #[default]
    All,
    Income,
    Expense,
}

impl KindFilter {
    /// Parse a query value. Anything other than "income" or "expense" keeps everything.
    pub fn from_query_value(value: &str) -> Self {
        match value.trim() {
            "income" => KindFilter::Income,
            "expense" => KindFilter::Expense,
            _ => KindFilter::All,
        }
    }

    pub fn as_query_value(&self) -> &'static str {
        match self {
            KindFilter::All => "all",
            KindFilter::Income => "income",
            KindFilter::Expense => "expense",
        }
    }

    fn matches(&self, kind: TransactionKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Income => kind == TransactionKind::Income,
            KindFilter::Expense => kind == TransactionKind::Expense,
        }
    }
}

/// Which category to keep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    /// Keep only transactions whose category equals this name exactly.
    Named(String),
}

impl CategoryFilter {
    /// Parse a query value. An empty value or "all" keeps everything.
    pub fn from_query_value(value: &str) -> Self {
        match value {
            "" | "all" => CategoryFilter::All,
            name => CategoryFilter::Named(name.to_owned()),
        }
    }

    pub fn as_query_value(&self) -> &str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Named(name) => name,
        }
    }

    fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => name == category,
        }
    }
}

/// The predicate the user picked on the transactions page.
///
/// The default keeps every transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// Free text matched against the description and category. Empty keeps everything.
    pub search: String,
    pub kind: KindFilter,
    pub category: CategoryFilter,
}

/// The query string for the transactions page and the export endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
}

impl From<FilterQuery> for FilterSpec {
    fn from(query: FilterQuery) -> Self {
        Self {
            search: query.search.unwrap_or_default(),
            kind: query
                .kind
                .as_deref()
                .map(KindFilter::from_query_value)
                .unwrap_or_default(),
            category: query
                .category
                .as_deref()
                .map(CategoryFilter::from_query_value)
                .unwrap_or_default(),
        }
    }
}

impl FilterSpec {
    /// Whether the filter keeps every transaction.
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.kind == KindFilter::All && self.category == CategoryFilter::All
    }

    /// Encode the filter as a query string, e.g. "search=rent&type=expense&category=all".
    pub fn to_query_string(&self) -> String {
        // Serializing a flat list of string pairs cannot fail.
        serde_urlencoded::to_string([
            ("search", self.search.as_str()),
            ("type", self.kind.as_query_value()),
            ("category", self.category.as_query_value()),
        ])
        .unwrap_or_default()
    }

    fn matches(&self, transaction: &Transaction, search: &str) -> bool {
        let matches_search = search.is_empty()
            || format!("{} {}", transaction.description, transaction.category)
                .to_lowercase()
                .contains(search);

        matches_search
            && self.kind.matches(transaction.kind)
            && self.category.matches(&transaction.category)
    }
}

/// The transactions that satisfy every active part of `spec`, in their original order.
pub fn filter_transactions(transactions: &[Transaction], spec: &FilterSpec) -> Vec<Transaction> {
    let search = spec.search.to_lowercase();

    transactions
        .iter()
        .filter(|transaction| spec.matches(transaction, &search))
        .cloned()
        .collect()
}

#[cfg(test)]
mod filter_tests {
    use time::OffsetDateTime;

    use crate::{
        UserID,
        transaction::core::{Transaction, TransactionId, TransactionKind},
    };

    use super::{CategoryFilter, FilterQuery, FilterSpec, KindFilter, filter_transactions};

    fn transaction(kind: TransactionKind, category: &str, description: &str) -> Transaction {
        Transaction {
            id: TransactionId::generate(),
            kind,
            amount: 10.0,
            category: category.to_owned(),
            date: "2024-01-01".to_owned(),
            description: description.to_owned(),
            owner_id: UserID::new(1),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: None,
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            transaction(TransactionKind::Income, "Salary", "January pay"),
            transaction(TransactionKind::Expense, "Food", "Lunch"),
            transaction(TransactionKind::Expense, "Rent", "Flat"),
        ]
    }

    #[test]
    fn default_spec_returns_input_unchanged() {
        let transactions = sample();

        let got = filter_transactions(&transactions, &FilterSpec::default());

        assert_eq!(got, transactions);
    }

    #[test]
    fn filters_by_kind() {
        let transactions = sample();
        let spec = FilterSpec {
            kind: KindFilter::Expense,
            ..Default::default()
        };

        let got = filter_transactions(&transactions, &spec);

        assert_eq!(got, transactions[1..].to_vec());
    }

    #[test]
    fn filters_by_exact_category() {
        let transactions = sample();
        let spec = FilterSpec {
            category: CategoryFilter::Named("Food".to_owned()),
            ..Default::default()
        };

        assert_eq!(
            filter_transactions(&transactions, &spec),
            vec![transactions[1].clone()]
        );

        let spec = FilterSpec {
            category: CategoryFilter::Named("food".to_owned()),
            ..Default::default()
        };

        assert!(filter_transactions(&transactions, &spec).is_empty());
    }

    #[test]
    fn search_is_case_insensitive_over_description_and_category() {
        let transactions = sample();
        let spec = FilterSpec {
            search: "SALARY".to_owned(),
            ..Default::default()
        };

        assert_eq!(
            filter_transactions(&transactions, &spec),
            vec![transactions[0].clone()]
        );
    }

    #[test]
    fn search_can_span_description_and_category() {
        let transactions = sample();
        let spec = FilterSpec {
            search: "lunch food".to_owned(),
            ..Default::default()
        };

        assert_eq!(
            filter_transactions(&transactions, &spec),
            vec![transactions[1].clone()]
        );
    }

    #[test]
    fn all_parts_must_match() {
        let transactions = sample();
        let spec = FilterSpec {
            search: "a".to_owned(),
            kind: KindFilter::Expense,
            category: CategoryFilter::Named("Rent".to_owned()),
        };

        assert_eq!(
            filter_transactions(&transactions, &spec),
            vec![transactions[2].clone()]
        );
    }

    #[test]
    fn query_values_parse_leniently() {
        let spec = FilterSpec::from(FilterQuery {
            search: Some("rent".to_owned()),
            kind: Some("transfer".to_owned()),
            category: Some("all".to_owned()),
        });

        assert_eq!(
            spec,
            FilterSpec {
                search: "rent".to_owned(),
                kind: KindFilter::All,
                category: CategoryFilter::All,
            }
        );
        assert!(FilterSpec::from(FilterQuery::default()).is_empty());
    }

    #[test]
    fn query_string_round_trips_through_query() {
        let spec = FilterSpec {
            search: "fish & chips".to_owned(),
            kind: KindFilter::Income,
            category: CategoryFilter::Named("Eating Out".to_owned()),
        };

        let query: FilterQuery = serde_urlencoded::from_str(&spec.to_query_string()).unwrap();

        assert_eq!(FilterSpec::from(query), spec);
    }
}
