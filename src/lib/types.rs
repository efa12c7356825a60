use std::{fmt, str::FromStr};

use chrono::{NaiveDate, Utc};
use im::{OrdMap, Vector};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::error::InvoiceError;

pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Default, Clone, Copy, PartialEq, Eq, PartialOrd, Debug, Serialize)]
pub struct MonetaryAmount(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl MonetaryAmount {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }
}

impl From<Decimal> for MonetaryAmount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

/// One billable line of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    pub unit_cost: MonetaryAmount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomField {
    pub name: String,
    pub value: String,
}

/// How the tax line of the subtotal block is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaxDisplay {
    /// Tax is a percentage of the subtotal.
    #[default]
    Percent,
    /// Tax is a fixed amount.
    Flat,
    /// No tax line.
    Hidden,
}

impl Serialize for TaxDisplay {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            TaxDisplay::Percent => s.serialize_str("%"),
            TaxDisplay::Flat => s.serialize_bool(true),
            TaxDisplay::Hidden => s.serialize_bool(false),
        }
    }
}

/// Toggles for the lines shown below the item table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SubtotalFields {
    pub tax: TaxDisplay,
    pub discounts: bool,
    pub shipping: bool,
}

macro_rules! template_parameters {
    ($($variant:ident => $wire:literal),+ $(,)?) => {
        /// A label of the rendered invoice that can be overridden.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum TemplateParameter {
            $($variant),+
        }

        impl TemplateParameter {
            pub const ALL: &'static [TemplateParameter] = &[$(TemplateParameter::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(TemplateParameter::$variant => $wire),+
                }
            }
        }

        impl FromStr for TemplateParameter {
            type Err = InvoiceError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(TemplateParameter::$variant),)+
                    other => Err(InvoiceError::InvalidTemplateParameter(other.to_string())),
                }
            }
        }
    };
}

template_parameters! {
    Header => "header",
    ToTitle => "to_title",
    ShipToTitle => "ship_to_title",
    InvoiceNumberTitle => "invoice_number_title",
    DateTitle => "date_title",
    PaymentTermsTitle => "payment_terms_title",
    DueDateTitle => "due_date_title",
    PurchaseOrderTitle => "purchase_order_title",
    QuantityHeader => "quantity_header",
    ItemHeader => "item_header",
    UnitCostHeader => "unit_cost_header",
    AmountHeader => "amount_header",
    SubtotalTitle => "subtotal_title",
    DiscountsTitle => "discounts_title",
    TaxTitle => "tax_title",
    ShippingTitle => "shipping_title",
    TotalTitle => "total_title",
    AmountPaidTitle => "amount_paid_title",
    BalanceTitle => "balance_title",
    TermsTitle => "terms_title",
    NotesTitle => "notes_title",
}

impl fmt::Display for TemplateParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The billing document sent to the generation service.
///
/// Header fields are public and may be set directly after [`Invoice::new`]. Items, custom
/// fields and template overrides only change through the methods below, which keep the
/// template allow-list enforced. The collections are persistent, so cloning an invoice to use
/// it as a starting point for others is cheap.
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub from: String,
    pub to: String,
    pub logo: Option<String>,
    pub ship_to: Option<String>,
    pub number: Option<String>,
    pub currency: String,
    pub date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub payment_terms: Option<String>,
    pub notes: Option<String>,
    pub terms: Option<String>,
    pub discounts: MonetaryAmount,
    pub tax: MonetaryAmount,
    pub shipping: MonetaryAmount,
    pub amount_paid: MonetaryAmount,
    fields: SubtotalFields,
    items: Vector<Item>,
    custom_fields: Vector<CustomField>,
    template: OrdMap<TemplateParameter, String>,
}

impl Invoice {
    /// Creates an invoice dated today (UTC) in the default currency.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            logo: None,
            ship_to: None,
            number: None,
            currency: DEFAULT_CURRENCY.to_string(),
            date: Utc::now().date_naive(),
            due_date: None,
            payment_terms: None,
            notes: None,
            terms: None,
            discounts: MonetaryAmount::default(),
            tax: MonetaryAmount::default(),
            shipping: MonetaryAmount::default(),
            amount_paid: MonetaryAmount::default(),
            fields: SubtotalFields::default(),
            items: Vector::new(),
            custom_fields: Vector::new(),
            template: OrdMap::new(),
        }
    }

    /// Appends a line item. Quantities and costs are not range checked.
    pub fn add_item(
        &mut self,
        name: impl Into<String>,
        quantity: impl Into<Decimal>,
        unit_cost: impl Into<Decimal>,
        description: Option<String>,
    ) {
        self.items.push_back(Item {
            name: name.into(),
            quantity: quantity.into(),
            unit_cost: MonetaryAmount::new(unit_cost.into()),
            description,
        });
    }

    pub fn add_custom_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.custom_fields.push_back(CustomField {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Overrides the text of one of the template labels.
    ///
    /// Fails with [`InvoiceError::InvalidTemplateParameter`] for keys outside
    /// [`TemplateParameter::ALL`], leaving the invoice untouched.
    pub fn set_template_text(
        &mut self,
        key: &str,
        value: impl Into<String>,
    ) -> Result<(), InvoiceError> {
        let parameter = key.parse::<TemplateParameter>()?;
        self.template.insert(parameter, value.into());
        Ok(())
    }

    /// Replaces the subtotal display toggles as a whole.
    pub fn toggle_subtotal(&mut self, tax: TaxDisplay, discounts: bool, shipping: bool) {
        self.fields = SubtotalFields {
            tax,
            discounts,
            shipping,
        };
    }

    pub fn items(&self) -> &Vector<Item> {
        &self.items
    }

    pub fn custom_fields(&self) -> &Vector<CustomField> {
        &self.custom_fields
    }

    pub fn subtotal_fields(&self) -> SubtotalFields {
        self.fields
    }

    pub fn template_text(&self, parameter: TemplateParameter) -> Option<&str> {
        self.template.get(&parameter).map(String::as_str)
    }

    pub fn template_overrides(&self) -> impl Iterator<Item = (&TemplateParameter, &String)> {
        self.template.iter()
    }
}
