//! Writing transactions out as a CSV file for download.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use time::Date;

use crate::{
    Error,
    transaction::core::{Transaction, format_date},
};

const HEADER: [&str; 5] = ["Description", "Category", "Type", "Amount", "Date"];

/// Format `transactions` as CSV text, one row per transaction in the given order.
///
/// The description is always quoted, the other fields never are. Rows are
/// separated by `\n` and there is no newline after the last row.
///
/// # Errors
/// Returns [Error::NothingToExport] if `transactions` is empty, or
/// [Error::CsvError] if the writer fails.
pub fn export_csv(transactions: &[Transaction]) -> Result<String, Error> {
    if transactions.is_empty() {
        return Err(Error::NothingToExport);
    }

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(HEADER)
        .map_err(|error| Error::CsvError(error.to_string()))?;

    for transaction in transactions {
        writer
            .write_record([
                quote(&transaction.description),
                transaction.category.clone(),
                transaction.kind.to_string(),
                transaction.amount.to_string(),
                transaction.date.clone(),
            ])
            .map_err(|error| Error::CsvError(error.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;
    let mut text = String::from_utf8(bytes).map_err(|error| Error::CsvError(error.to_string()))?;

    if text.ends_with('\n') {
        text.pop();
    }

    Ok(text)
}

/// The name of the download for an export made on `date`, e.g. "transactions_export_2024-01-31.csv".
pub fn export_file_name(date: Date) -> String {
    format!("transactions_export_{}.csv", format_date(date))
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

#[cfg(test)]
mod export_tests {
    use time::{OffsetDateTime, macros::date};

    use crate::{
        Error, UserID,
        transaction::core::{Transaction, TransactionId, TransactionKind},
    };

    use super::{export_csv, export_file_name};

    fn transaction(kind: TransactionKind, amount: f64, category: &str, description: &str) -> Transaction {
        Transaction {
            id: TransactionId::generate(),
            kind,
            amount,
            category: category.to_owned(),
            date: "2024-01-02".to_owned(),
            description: description.to_owned(),
            owner_id: UserID::new(1),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: None,
        }
    }

    #[test]
    fn quotes_description_and_doubles_inner_quotes() {
        let transactions = vec![transaction(
            TransactionKind::Expense,
            12.5,
            "Food",
            "Lunch \"special\"",
        )];

        let csv = export_csv(&transactions).unwrap();

        assert_eq!(
            csv,
            "Description,Category,Type,Amount,Date\n\
            \"Lunch \"\"special\"\"\",Food,expense,12.5,2024-01-02"
        );
    }

    #[test]
    fn writes_amounts_in_shortest_form() {
        let transactions = vec![
            transaction(TransactionKind::Income, 1000.0, "Salary", ""),
            transaction(TransactionKind::Expense, 0.1, "Food", "Gum"),
        ];

        let csv = export_csv(&transactions).unwrap();

        let rows = csv.lines().collect::<Vec<_>>();
        assert_eq!(
            rows,
            vec![
                "Description,Category,Type,Amount,Date",
                "\"\",Salary,income,1000,2024-01-02",
                "\"Gum\",Food,expense,0.1,2024-01-02",
            ]
        );
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn nothing_to_export() {
        assert_eq!(export_csv(&[]), Err(Error::NothingToExport));
    }

    #[test]
    fn file_name_has_date() {
        assert_eq!(
            export_file_name(date!(2024 - 01 - 31)),
            "transactions_export_2024-01-31.csv"
        );
    }
}
