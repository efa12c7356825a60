use std::{fs::File, io::Read, path::Path};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use crate::error::InvoiceError;
use crate::types::MonetaryAmount;

const TRANSACTION_DATE_FORMAT: &str = "%m-%d-%Y";

/// A bank transaction that may be billed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: MonetaryAmount,
}

fn us_date<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(d)?;
    // %Y takes a year of any width, statements always carry four digits
    let year = raw.rsplit('-').next().unwrap_or_default();
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(serde::de::Error::custom(format!(
            "invalid transaction date {:?}: year must have four digits",
            raw
        )));
    }
    NaiveDate::parse_from_str(&raw, TRANSACTION_DATE_FORMAT).map_err(|e| {
        serde::de::Error::custom(format!("invalid transaction date {:?}: {}", raw, e))
    })
}

#[derive(Debug, Deserialize)]
pub struct TransactionRowEntity {
    #[serde(rename = "Date (UTC)", deserialize_with = "us_date")]
    pub date: NaiveDate,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Amount", deserialize_with = "rust_decimal::serde::str::deserialize")]
    pub amount: Decimal,
}

impl TransactionRowEntity {
    fn into_domain(self) -> Transaction {
        Transaction {
            date: self.date,
            description: self.description,
            amount: MonetaryAmount::new(self.amount),
        }
    }
}

pub fn read_transactions<R: Read>(input: R) -> Result<Vec<Transaction>, InvoiceError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut rows: Vec<Transaction> = Vec::new();
    for row in reader.deserialize::<TransactionRowEntity>() {
        // fail if cannot deserialise, a half-read statement would bill the wrong set
        rows.push(row?.into_domain());
    }

    Ok(rows)
}

pub fn process_csv(csv_path: &Path) -> Result<Vec<Transaction>, InvoiceError> {
    let file = File::open(csv_path)?;
    read_transactions(file)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::error::InvoiceError;
    use crate::io::read_transactions;

    const HEADER: &str = "Date (UTC),Description,Amount\n";

    #[test]
    fn rows_are_parsed_in_order() {
        let csv = format!("{}01-05-2024,Client A,100.25\n01-06-2024, Client B ,-50\n", HEADER);
        let sut = read_transactions(csv.as_bytes()).unwrap();

        assert_eq!(sut.len(), 2);
        assert_eq!(sut[0].date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(sut[0].description, "Client A");
        assert_eq!(sut[0].amount.value(), Decimal::new(10025, 2));
        assert_eq!(sut[1].description, "Client B");
        assert!(sut[1].amount.is_negative());
    }

    #[test]
    fn malformed_date_fails() {
        let csv = format!("{}2024-01-05,Client A,100\n", HEADER);
        let err = read_transactions(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, InvoiceError::Csv(_)));
        assert!(err.to_string().contains("2024-01-05"));
    }

    #[test]
    fn two_digit_year_fails() {
        let csv = format!("{}01-05-24,Client A,100\n", HEADER);
        let err = read_transactions(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, InvoiceError::Csv(_)));
        assert!(err.to_string().contains("01-05-24"));
    }

    #[test]
    fn five_digit_year_fails() {
        let csv = format!("{}01-05-20245,Client A,100\n", HEADER);
        assert!(matches!(
            read_transactions(csv.as_bytes()),
            Err(InvoiceError::Csv(_))
        ));
    }

    #[test]
    fn malformed_amount_fails() {
        let csv = format!("{}01-05-2024,Client A,ten\n", HEADER);
        assert!(matches!(
            read_transactions(csv.as_bytes()),
            Err(InvoiceError::Csv(_))
        ));
    }

    #[test]
    fn empty_amount_is_not_zero() {
        let csv = format!("{}01-05-2024,Client A,\n", HEADER);
        assert!(read_transactions(csv.as_bytes()).is_err());
    }

    #[test]
    fn header_only_yields_nothing() {
        assert!(read_transactions(HEADER.as_bytes()).unwrap().is_empty());
    }
}
