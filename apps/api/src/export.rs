//! CSV rendering for the admin order export.

use storefront_core::OrderExportRow;

use crate::error::ApiError;

/// Column header of the export.
pub const EXPORT_HEADER: [&str; 6] = [
    "order_id",
    "user_email",
    "total",
    "status",
    "created_at",
    "shipping_address",
];

/// Renders export rows as CSV text, header first.
///
/// `total` is written in major units (`3.00`) and `created_at` as RFC 3339.
pub fn render_csv(rows: &[OrderExportRow]) -> Result<String, ApiError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(EXPORT_HEADER).map_err(csv_error)?;

    for row in rows {
        writer
            .write_record([
                row.order_id.to_string(),
                row.user_email.clone(),
                row.total.to_decimal_string(),
                row.status.to_string(),
                row.created_at.to_rfc3339(),
                row.shipping_address.clone().unwrap_or_default(),
            ])
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    String::from_utf8(bytes).map_err(|e| ApiError::Internal(e.to_string()))
}

fn csv_error(err: csv::Error) -> ApiError {
    ApiError::Internal(format!("CSV export failed: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use storefront_core::{Money, OrderStatus};

    #[test]
    fn test_header_only_when_empty() {
        let csv = render_csv(&[]).unwrap();
        assert_eq!(
            csv,
            "order_id,user_email,total,status,created_at,shipping_address\n"
        );
    }

    #[test]
    fn test_row_formatting_and_quoting() {
        let row = OrderExportRow {
            order_id: 12,
            user_email: "ann@example.com".to_string(),
            total: Money::from_cents(300),
            status: OrderStatus::Shipped,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
            shipping_address: Some("1 Main St, Springfield".to_string()),
        };

        let csv = render_csv(&[row]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "12,ann@example.com,3.00,Shipped,2024-05-01T09:30:00+00:00,\"1 Main St, Springfield\""
        );
    }

    #[test]
    fn test_missing_address_is_empty_field() {
        let row = OrderExportRow {
            order_id: 1,
            user_email: String::new(),
            total: Money::zero(),
            status: OrderStatus::Pending,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            shipping_address: None,
        };

        let csv = render_csv(&[row]).unwrap();
        assert!(csv.ends_with("0.00,Pending,2024-01-01T00:00:00+00:00,\n"));
    }
}
