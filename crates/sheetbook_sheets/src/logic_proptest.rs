#[cfg(test)]
mod tests {
    use crate::logic::{
        a1_range, submit_booking, validate_booking, BookingError, BookingRequest, REQUIRED_FIELDS,
    };
    use crate::service::mock::{MockConnector, MockSpreadsheetService};
    use proptest::prelude::*;
    use sheetbook_config::AppConfig;
    use std::sync::Arc;

    // Some(value) when present; None or "" when missing
    fn field(value: &str, present: bool, empty_instead_of_null: bool) -> Option<String> {
        if present {
            Some(value.to_string())
        } else if empty_instead_of_null {
            Some(String::new())
        } else {
            None
        }
    }

    proptest! {
        // The reported field is always the first missing one in name, phone, time, location order
        #[test]
        fn test_first_missing_field_is_reported(
            present in prop::array::uniform4(any::<bool>()),
            empty in prop::array::uniform4(any::<bool>()),
            value in "[a-zA-Z0-9 +:-]{1,24}",
        ) {
            let request = BookingRequest {
                name: field(&value, present[0], empty[0]),
                phone: field(&value, present[1], empty[1]),
                time: field(&value, present[2], empty[2]),
                location: field(&value, present[3], empty[3]),
            };

            match present.iter().position(|p| !p) {
                Some(first_missing) => {
                    let err = validate_booking(request).expect_err("a field is missing");
                    prop_assert!(matches!(err, BookingError::MissingField(f) if f == REQUIRED_FIELDS[first_missing]));
                    prop_assert_eq!(
                        err.to_string(),
                        format!("Missing required field: {}", REQUIRED_FIELDS[first_missing])
                    );
                }
                None => {
                    let row = validate_booking(request).expect("all fields present");
                    prop_assert_eq!(row.into_values(), vec![value.clone(); 4]);
                }
            }
        }

        // Invalid bookings never reach the spreadsheet
        #[test]
        fn test_invalid_booking_never_connects(missing in 0..4usize) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .expect("runtime");
            let service = Arc::new(MockSpreadsheetService::new());
            let connector = MockConnector::new(service.clone());

            let mut fields: [Option<String>; 4] = std::array::from_fn(|_| Some("x".to_string()));
            fields[missing] = None;
            let [name, phone, time, location] = fields;
            let request = BookingRequest { name, phone, time, location };

            let mut config = AppConfig::default();
            config.sheets.spreadsheet_id = Some("1AbCdEfGhIjKlMnOp".to_string());

            let result = runtime.block_on(submit_booking(&config, &connector, request));
            prop_assert!(result.is_err());
            prop_assert_eq!(connector.connects(), 0);
            prop_assert!(service.appends().is_empty());
        }

        // Quoting keeps the title recoverable: strip the outer quotes and undouble
        #[test]
        fn test_a1_range_title_round_trip(title in "[a-zA-Z0-9 ']{1,20}") {
            let range = a1_range(&title, "A1");
            let quoted = range.strip_suffix("!A1").expect("cell suffix");
            prop_assert!(quoted.starts_with('\'') && quoted.ends_with('\''));
            let inner = &quoted[1..quoted.len() - 1];
            prop_assert_eq!(inner.replace("''", "'"), title);
        }
    }
}
