use serde::Serialize;

/// Serialize rows as CSV with a header line taken from the field names.
/// No rows gives an empty document.
pub fn to_csv<T: Serialize>(rows: &[T]) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!("{}", e))?;
    Ok(String::from_utf8(bytes)?)
}

/// Download name for an export, e.g. `sr-performance-30d-20250817-1030.csv`
pub fn export_file_name(token: &str, stamp: chrono::NaiveDateTime, extension: &str) -> String {
    let token: String = token
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!(
        "sr-performance-{}-{}.{}",
        token,
        stamp.format("%Y%m%d-%H%M"),
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::dashboards::d412_sr_performance::SrExportRow;
    use contracts::enums::OrderStatus;

    #[test]
    fn test_csv_has_snake_case_headers_and_blank_missing_fields() {
        let rows = vec![
            SrExportRow {
                sr_name: "Amina Yusuf".into(),
                sr_code: "AMY7".into(),
                customer_name: Some("Tunde Bakare".into()),
                customer_phone: None,
                registration_date: NaiveDate::from_ymd_opt(2025, 8, 17),
                order_id: Some(42),
                order_value: Some(17.25),
                order_date: NaiveDate::from_ymd_opt(2025, 8, 17),
                order_status: Some(OrderStatus::Delivered),
            },
            SrExportRow {
                sr_name: "Amina Yusuf".into(),
                sr_code: "AMY7".into(),
                customer_name: Some("Ngozi".into()),
                customer_phone: None,
                registration_date: NaiveDate::from_ymd_opt(2025, 8, 16),
                order_id: None,
                order_value: None,
                order_date: None,
                order_status: None,
            },
        ];

        let csv = to_csv(&rows).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "sr_name,sr_code,customer_name,customer_phone,registration_date,order_id,order_value,order_date,order_status"
        );
        assert_eq!(
            lines[1],
            "Amina Yusuf,AMY7,Tunde Bakare,,2025-08-17,42,17.25,2025-08-17,delivered"
        );
        assert_eq!(lines[2], "Amina Yusuf,AMY7,Ngozi,,2025-08-16,,,,");
    }

    #[test]
    fn test_empty_export() {
        let rows: Vec<SrExportRow> = vec![];
        assert_eq!(to_csv(&rows).unwrap(), "");
    }

    #[test]
    fn test_file_name_sanitizes_custom_tokens() {
        let stamp = NaiveDate::from_ymd_opt(2025, 8, 17)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(
            export_file_name("custom:2025-08-01:2025-08-17", stamp, "csv"),
            "sr-performance-custom_2025-08-01_2025-08-17-20250817-1030.csv"
        );
    }
}
