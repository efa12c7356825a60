use chrono::{Datelike, NaiveDate};

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Formats a date as `DD Mon YYYY`, e.g. `05 Jan 2024`.
///
/// Month names come from a fixed English table so the output never depends on the
/// locale of the running process. The shape holds for years 0 through 9999; later years
/// print with five digits and negative years with a sign.
pub fn format_invoice_date(date: NaiveDate) -> String {
    format!(
        "{:02} {} {:04}",
        date.day(),
        MONTH_ABBREVIATIONS[date.month0() as usize],
        date.year()
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{format_invoice_date, MONTH_ABBREVIATIONS};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn single_digit_days_are_zero_padded() {
        assert_eq!(format_invoice_date(date(2024, 1, 5)), "05 Jan 2024");
    }

    #[test]
    fn last_day_of_year() {
        assert_eq!(format_invoice_date(date(1999, 12, 31)), "31 Dec 1999");
    }

    #[test]
    fn every_month_uses_three_letter_abbreviation() {
        for (idx, name) in MONTH_ABBREVIATIONS.iter().enumerate() {
            let sut = format_invoice_date(date(2023, idx as u32 + 1, 10));
            assert_eq!(sut, format!("10 {} 2023", name));
            assert_eq!(sut.len(), "DD Mon YYYY".len());
        }
    }

    #[test]
    fn early_years_are_zero_padded() {
        assert_eq!(format_invoice_date(date(999, 7, 1)), "01 Jul 0999");
    }

    #[test]
    fn leap_day() {
        assert_eq!(format_invoice_date(date(2024, 2, 29)), "29 Feb 2024");
    }
}
