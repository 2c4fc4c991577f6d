// Coerces raw field values into the types the estimator works with.
// Rows are never dropped: a value that fails to parse contributes zero.
use super::field_discovery::ResolvedFields;
use shared::models::{FieldValue, UsageRecord};
use shared::utils::truncate_chars;

/// Outcome of reading a numeric field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedNumber {
    Parsed(f64),
    /// Missing, empty, non-numeric or non-finite. Counts as zero.
    Coerced,
}

impl ParsedNumber {
    pub fn value(&self) -> f64 {
        match self {
            ParsedNumber::Parsed(v) => *v,
            ParsedNumber::Coerced => 0.0,
        }
    }

    pub fn is_coerced(&self) -> bool {
        matches!(self, ParsedNumber::Coerced)
    }

    fn abs(self) -> Self {
        match self {
            ParsedNumber::Parsed(v) => ParsedNumber::Parsed(v.abs()),
            ParsedNumber::Coerced => ParsedNumber::Coerced,
        }
    }
}

pub fn parse_number(value: Option<&FieldValue>) -> ParsedNumber {
    match value {
        Some(FieldValue::Number(n)) if n.is_finite() => ParsedNumber::Parsed(*n),
        Some(FieldValue::Text(s)) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => ParsedNumber::Parsed(n),
            _ => ParsedNumber::Coerced,
        },
        _ => ParsedNumber::Coerced,
    }
}

/// Identity key: the value's text with surrounding whitespace removed.
/// Nulls map to the empty key so the row still counts.
pub fn identity_key(value: Option<&FieldValue>) -> String {
    value
        .and_then(|v| v.as_text().map(|t| t.trim().to_string()))
        .unwrap_or_default()
}

fn display_text(value: Option<&FieldValue>, max_len: usize) -> Option<String> {
    value
        .and_then(|v| v.as_text())
        .map(|t| truncate_chars(t.trim(), max_len))
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub identity: String,
    /// Absolute requested quantity.
    pub quantity: ParsedNumber,
    /// `None` when the stock role is unresolved.
    pub stock: Option<ParsedNumber>,
    pub display_name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedBatch {
    pub records: Vec<NormalizedRecord>,
    pub coerced_quantities: usize,
    pub coerced_stock: usize,
}

pub fn normalize_records(records: &[UsageRecord], fields: &ResolvedFields, max_text_len: usize) -> NormalizedBatch {
    let mut batch = NormalizedBatch {
        records: Vec::with_capacity(records.len()),
        ..Default::default()
    };

    for record in records {
        let quantity = parse_number(record.get(&fields.quantity)).abs();
        if quantity.is_coerced() {
            batch.coerced_quantities += 1;
        }

        let stock = fields.stock.as_deref().map(|name| parse_number(record.get(name)));
        if stock.is_some_and(|s| s.is_coerced()) {
            batch.coerced_stock += 1;
        }

        batch.records.push(NormalizedRecord {
            identity: identity_key(record.get(&fields.identity)),
            quantity,
            stock,
            display_name: fields
                .display_name
                .as_deref()
                .and_then(|name| display_text(record.get(name), max_text_len)),
            description: fields
                .description
                .as_deref()
                .and_then(|name| display_text(record.get(name), max_text_len)),
        });
    }

    if batch.coerced_quantities > 0 || batch.coerced_stock > 0 {
        tracing::warn!(
            coerced_quantities = batch.coerced_quantities,
            coerced_stock = batch.coerced_stock,
            total = records.len(),
            "Unparsable numeric values counted as zero"
        );
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::field_discovery::FieldMapping;

    fn fields(columns: &[&str]) -> ResolvedFields {
        FieldMapping::resolve(columns).require().unwrap()
    }

    #[test]
    fn test_parse_number_variants() {
        assert_eq!(parse_number(Some(&FieldValue::from(" 12.5 "))), ParsedNumber::Parsed(12.5));
        assert_eq!(parse_number(Some(&FieldValue::Number(3.0))), ParsedNumber::Parsed(3.0));
        assert_eq!(parse_number(Some(&FieldValue::from("abc"))), ParsedNumber::Coerced);
        assert_eq!(parse_number(Some(&FieldValue::from(""))), ParsedNumber::Coerced);
        assert_eq!(parse_number(Some(&FieldValue::from("NaN"))), ParsedNumber::Coerced);
        assert_eq!(parse_number(Some(&FieldValue::Number(f64::INFINITY))), ParsedNumber::Coerced);
        assert_eq!(parse_number(Some(&FieldValue::Null)), ParsedNumber::Coerced);
        assert_eq!(parse_number(None), ParsedNumber::Coerced);
    }

    #[test]
    fn test_true_zero_is_distinguishable_from_coerced() {
        let zero = parse_number(Some(&FieldValue::from("0")));
        let junk = parse_number(Some(&FieldValue::from("n/a")));
        assert_eq!(zero.value(), junk.value());
        assert!(!zero.is_coerced());
        assert!(junk.is_coerced());
    }

    #[test]
    fn test_identity_key_trims() {
        assert_eq!(identity_key(Some(&FieldValue::from("  A1 "))), "A1");
        assert_eq!(identity_key(Some(&FieldValue::Number(42.0))), "42");
        assert_eq!(identity_key(Some(&FieldValue::Null)), "");
        assert_eq!(identity_key(None), "");
    }

    #[test]
    fn test_normalize_abs_and_coercion() {
        let records = vec![
            UsageRecord::new().with("Item Number", " A1").with("Requested Qty", "-4").with("On Hand", "12"),
            UsageRecord::new().with("Item Number", "A1").with("Requested Qty", "x").with("On Hand", "?"),
        ];
        let batch = normalize_records(&records, &fields(&["Item Number", "Requested Qty", "On Hand"]), 100);
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.records[0].identity, "A1");
        assert_eq!(batch.records[0].quantity, ParsedNumber::Parsed(4.0));
        assert_eq!(batch.records[0].stock, Some(ParsedNumber::Parsed(12.0)));
        assert_eq!(batch.records[1].quantity, ParsedNumber::Coerced);
        assert_eq!(batch.coerced_quantities, 1);
        assert_eq!(batch.coerced_stock, 1);
    }

    #[test]
    fn test_unresolved_stock_is_none() {
        let records = vec![UsageRecord::new().with("Item Number", "A1").with("Requested Qty", "1")];
        let batch = normalize_records(&records, &fields(&["Item Number", "Requested Qty"]), 100);
        assert_eq!(batch.records[0].stock, None);
        assert_eq!(batch.records[0].display_name, None);
        assert_eq!(batch.coerced_stock, 0);
    }

    #[test]
    fn test_display_text_is_truncated() {
        let records = vec![UsageRecord::new()
            .with("Item Number", "A1")
            .with("Requested Qty", "1")
            .with("Part Name", "  Hydraulic Pump Seal  ")];
        let batch = normalize_records(&records, &fields(&["Item Number", "Requested Qty", "Part Name"]), 9);
        assert_eq!(batch.records[0].display_name.as_deref(), Some("Hydraulic"));
    }
}
