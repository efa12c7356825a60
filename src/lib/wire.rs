use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::dates::format_invoice_date;
use crate::error::InvoiceError;
use crate::types::{CustomField, Invoice, Item, MonetaryAmount, SubtotalFields};

/// Request body in the shape the generation API expects. Built fresh from an [`Invoice`] on
/// every call so serializing never touches the invoice itself.
#[derive(Serialize)]
struct InvoiceBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    logo: Option<&'a str>,
    from: &'a str,
    to: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ship_to: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    number: Option<&'a str>,
    currency: &'a str,
    date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_terms: Option<&'a str>,
    items: Vec<&'a Item>,
    custom_fields: Vec<&'a CustomField>,
    fields: SubtotalFields,
    discounts: MonetaryAmount,
    tax: MonetaryAmount,
    shipping: MonetaryAmount,
    amount_paid: MonetaryAmount,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    terms: Option<&'a str>,
    #[serde(flatten)]
    template: BTreeMap<&'static str, &'a str>,
}

impl<'a> InvoiceBody<'a> {
    fn from_invoice(invoice: &'a Invoice) -> Self {
        Self {
            logo: invoice.logo.as_deref(),
            from: &invoice.from,
            to: &invoice.to,
            ship_to: invoice.ship_to.as_deref(),
            number: invoice.number.as_deref(),
            currency: &invoice.currency,
            date: format_invoice_date(invoice.date),
            due_date: invoice.due_date.map(format_invoice_date),
            payment_terms: invoice.payment_terms.as_deref(),
            items: invoice.items().iter().collect(),
            custom_fields: invoice.custom_fields().iter().collect(),
            fields: invoice.subtotal_fields(),
            discounts: invoice.discounts,
            tax: invoice.tax,
            shipping: invoice.shipping,
            amount_paid: invoice.amount_paid,
            notes: invoice.notes.as_deref(),
            terms: invoice.terms.as_deref(),
            template: invoice
                .template_overrides()
                .map(|(parameter, text)| (parameter.as_str(), text.as_str()))
                .collect(),
        }
    }
}

impl Invoice {
    /// Wire representation of the invoice. Template overrides become top level fields.
    pub fn to_json(&self) -> Result<Value, InvoiceError> {
        Ok(serde_json::to_value(InvoiceBody::from_invoice(self))?)
    }

    pub fn to_json_string(&self) -> Result<String, InvoiceError> {
        Ok(serde_json::to_string(&InvoiceBody::from_invoice(self))?)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use serde_json::Value;

    use crate::types::{Invoice, MonetaryAmount, TaxDisplay};

    fn sample_invoice() -> Invoice {
        let mut invoice = Invoice::new("Acme Ltd", "Bob");
        invoice.date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        invoice
    }

    #[test]
    fn sender_is_sent_as_from() {
        let sut = sample_invoice().to_json().unwrap();
        let object = sut.as_object().unwrap();
        assert_eq!(object["from"], "Acme Ltd");
        assert_eq!(object["to"], "Bob");
        assert!(!object.contains_key("sender"));
        assert!(!object.contains_key("template"));
    }

    #[test]
    fn dates_are_formatted() {
        let mut invoice = sample_invoice();
        invoice.due_date = NaiveDate::from_ymd_opt(2024, 2, 4);
        let sut = invoice.to_json().unwrap();
        assert_eq!(sut["date"], "05 Jan 2024");
        assert_eq!(sut["due_date"], "04 Feb 2024");
    }

    #[test]
    fn absent_optionals_are_omitted() {
        let sut = sample_invoice().to_json().unwrap();
        let object = sut.as_object().unwrap();
        for key in ["due_date", "logo", "ship_to", "number", "payment_terms", "notes", "terms"] {
            assert!(!object.contains_key(key), "{} should be omitted", key);
        }
        assert_eq!(object["currency"], "USD");
        assert_eq!(object["amount_paid"].as_f64(), Some(0.0));
    }

    #[test]
    fn items_are_flat_objects_in_order() {
        let mut invoice = sample_invoice();
        invoice.add_item("Design", 2, Decimal::new(12550, 2), Some("mockups".to_string()));
        invoice.add_item("Build", 1, 400, None);
        invoice.add_item("Support", 0, -10, None);

        let sut = invoice.to_json().unwrap();
        let items = sut["items"].as_array().unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["name"], "Design");
        assert_eq!(items[0]["quantity"].as_f64(), Some(2.0));
        assert_eq!(items[0]["unit_cost"].as_f64(), Some(125.5));
        assert_eq!(items[0]["description"], "mockups");
        assert_eq!(items[1]["name"], "Build");
        assert!(items[1].get("description").is_none());
        assert_eq!(items[2]["unit_cost"].as_f64(), Some(-10.0));
    }

    #[test]
    fn custom_fields_are_flat_objects() {
        let mut invoice = sample_invoice();
        invoice.add_custom_field("PO", "1234");
        let sut = invoice.to_json().unwrap();
        assert_eq!(
            sut["custom_fields"],
            serde_json::json!([{"name": "PO", "value": "1234"}])
        );
    }

    #[test]
    fn template_overrides_are_top_level() {
        let mut invoice = sample_invoice();
        invoice.set_template_text("header", "RECEIPT").unwrap();
        invoice.set_template_text("balance_title", "Due").unwrap();

        let sut = invoice.to_json().unwrap();
        assert_eq!(sut["header"], "RECEIPT");
        assert_eq!(sut["balance_title"], "Due");
        assert!(sut.get("template").is_none());
    }

    #[test]
    fn subtotal_fields_use_api_markers() {
        let mut invoice = sample_invoice();
        assert_eq!(
            invoice.to_json().unwrap()["fields"],
            serde_json::json!({"tax": "%", "discounts": false, "shipping": false})
        );

        invoice.toggle_subtotal(TaxDisplay::Flat, true, false);
        assert_eq!(
            invoice.to_json().unwrap()["fields"],
            serde_json::json!({"tax": true, "discounts": true, "shipping": false})
        );

        invoice.toggle_subtotal(TaxDisplay::Hidden, false, true);
        assert_eq!(
            invoice.to_json().unwrap()["fields"],
            serde_json::json!({"tax": false, "discounts": false, "shipping": true})
        );
    }

    #[test]
    fn monetary_totals_are_numbers() {
        let mut invoice = sample_invoice();
        invoice.tax = MonetaryAmount::new(Decimal::new(75, 1));
        invoice.shipping = MonetaryAmount::new(Decimal::from(12));
        let sut = invoice.to_json().unwrap();
        assert_eq!(sut["tax"].as_f64(), Some(7.5));
        assert_eq!(sut["shipping"].as_f64(), Some(12.0));
        assert!(matches!(sut["discounts"], Value::Number(_)));
    }

    #[test]
    fn serializing_twice_is_stable_and_leaves_invoice_untouched() {
        let mut invoice = sample_invoice();
        invoice.add_item("Design", 1, 100, None);
        invoice.set_template_text("header", "RECEIPT").unwrap();
        let before = invoice.clone();

        let first = invoice.to_json_string().unwrap();
        let second = invoice.to_json_string().unwrap();

        assert_eq!(first, second);
        assert_eq!(invoice, before);
    }
}
