use serde_json::json;
use time::macros::date;

use super::*;

// =============================================================================
// parse_amount
// =============================================================================

#[test]
fn parse_amount_accepts_numbers_and_numeric_strings() {
    assert_eq!(parse_amount(&json!(150.5)).unwrap(), 150.5);
    assert_eq!(parse_amount(&json!(0)).unwrap(), 0.0);
    assert_eq!(parse_amount(&json!(" 42.25 ")).unwrap(), 42.25);
}

#[test]
fn parse_amount_rejects_negative() {
    assert!(matches!(parse_amount(&json!(-1)), Err(InvoiceError::NegativeAmount)));
    assert!(matches!(parse_amount(&json!("-0.01")), Err(InvoiceError::NegativeAmount)));
}

#[test]
fn parse_amount_rejects_non_numeric() {
    for value in [json!(null), json!("abc"), json!(true), json!([1]), json!("NaN"), json!("inf")] {
        assert!(matches!(parse_amount(&value), Err(InvoiceError::InvalidAmount)), "{value}");
    }
}

// =============================================================================
// parse_date
// =============================================================================

#[test]
fn parse_date_accepts_iso() {
    assert_eq!(parse_date("2024-01-15").unwrap(), date!(2024 - 01 - 15));
    assert_eq!(parse_date(" 2024-02-29 ").unwrap(), date!(2024 - 02 - 29));
}

#[test]
fn parse_date_rejects_other_shapes() {
    for raw in ["15/01/2024", "2024-13-01", "2023-02-29", "2024-1-5x", ""] {
        assert!(matches!(parse_date(raw), Err(InvoiceError::InvalidDate)), "{raw}");
    }
}

#[test]
fn format_date_is_zero_padded() {
    assert_eq!(format_date(date!(2024 - 03 - 05)), "2024-03-05");
}

// =============================================================================
// generate_invoice_number
// =============================================================================

#[test]
fn generated_numbers_have_expected_shape() {
    let number = generate_invoice_number();
    let parts: Vec<&str> = number.split('-').collect();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "INV");
    assert!(parts[1].parse::<i128>().is_ok());
    assert_eq!(parts[2].len(), 4);
}

// =============================================================================
// Request bodies
// =============================================================================

#[test]
fn new_invoice_defaults_number_and_date() {
    let new = NewInvoice::from_json(&json!({ "invoice_amount": 10 })).unwrap();
    assert!(new.invoice_number.starts_with("INV-"));
    assert_eq!(new.invoice_date, OffsetDateTime::now_utc().date());
    assert_eq!(new.invoice_amount, 10.0);
}

#[test]
fn new_invoice_keeps_supplied_fields() {
    let body = json!({ "invoice_number": "INV-7", "invoice_amount": "99.5", "invoice_date": "2024-06-01" });
    let new = NewInvoice::from_json(&body).unwrap();
    assert_eq!(new.invoice_number, "INV-7");
    assert_eq!(new.invoice_amount, 99.5);
    assert_eq!(new.invoice_date, date!(2024 - 06 - 01));
}

#[test]
fn new_invoice_requires_amount() {
    assert!(matches!(NewInvoice::from_json(&json!({})), Err(InvoiceError::InvalidAmount)));
}

#[test]
fn new_invoice_blank_number_is_generated() {
    let new = NewInvoice::from_json(&json!({ "invoice_number": "  ", "invoice_amount": 1 })).unwrap();
    assert!(new.invoice_number.starts_with("INV-"));
}

#[test]
fn changes_accept_either_field() {
    let only_amount = InvoiceChanges::from_json(&json!({ "invoice_amount": 5 })).unwrap();
    assert_eq!(only_amount, InvoiceChanges { invoice_amount: Some(5.0), invoice_date: None });

    let only_date = InvoiceChanges::from_json(&json!({ "invoice_date": "2024-12-31" })).unwrap();
    assert_eq!(only_date, InvoiceChanges { invoice_amount: None, invoice_date: Some(date!(2024 - 12 - 31)) });

    assert_eq!(InvoiceChanges::from_json(&json!({})).unwrap(), InvoiceChanges::default());
}

#[test]
fn changes_validate_fields() {
    assert!(matches!(
        InvoiceChanges::from_json(&json!({ "invoice_amount": -3 })),
        Err(InvoiceError::NegativeAmount)
    ));
    assert!(matches!(
        InvoiceChanges::from_json(&json!({ "invoice_date": "yesterday" })),
        Err(InvoiceError::InvalidDate)
    ));
}

// =============================================================================
// Live database
// =============================================================================

#[cfg(feature = "live-db-tests")]
mod live {
    use super::*;
    use crate::services::auth::{self, UserRow};
    use crate::services::session::generate_token;

    async fn pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required for live-db-tests");
        crate::db::init_pool(&url, 2).await.expect("pool")
    }

    async fn user(pool: &PgPool) -> UserRow {
        let email = format!("invoice-{}@example.com", &generate_token()[..12]);
        auth::register_user(pool, &email, "password123").await.unwrap()
    }

    fn new_invoice(amount: f64) -> NewInvoice {
        NewInvoice {
            invoice_number: generate_invoice_number(),
            invoice_amount: amount,
            invoice_date: date!(2024 - 01 - 15),
        }
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let pool = pool().await;
        let owner = user(&pool).await;

        let first = create_invoice(&pool, owner.id, &new_invoice(10.0)).await.unwrap();
        let second = create_invoice(&pool, owner.id, &new_invoice(20.0)).await.unwrap();
        assert_eq!(first.invoice_date, "2024-01-15");

        let listed = list_invoices(&pool, owner.id).await.unwrap();
        assert_eq!(listed.iter().map(|i| i.id).collect::<Vec<_>>(), vec![second.id, first.id]);

        let changes = InvoiceChanges { invoice_amount: Some(15.0), invoice_date: None };
        let updated = update_invoice(&pool, owner.id, first.id, &changes).await.unwrap();
        assert_eq!(updated.invoice_amount, 15.0);
        assert_eq!(updated.invoice_date, first.invoice_date);

        delete_invoice(&pool, owner.id, first.id).await.unwrap();
        assert!(matches!(get_invoice(&pool, owner.id, first.id).await, Err(InvoiceError::NotFound)));
    }

    #[tokio::test]
    async fn other_users_invoices_are_not_found() {
        let pool = pool().await;
        let owner = user(&pool).await;
        let stranger = user(&pool).await;
        let invoice = create_invoice(&pool, owner.id, &new_invoice(1.0)).await.unwrap();

        assert!(matches!(get_invoice(&pool, stranger.id, invoice.id).await, Err(InvoiceError::NotFound)));
        assert!(matches!(delete_invoice(&pool, stranger.id, invoice.id).await, Err(InvoiceError::NotFound)));
        assert!(list_invoices(&pool, stranger.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_number_is_rejected() {
        let pool = pool().await;
        let owner = user(&pool).await;
        let invoice = new_invoice(1.0);
        create_invoice(&pool, owner.id, &invoice).await.unwrap();
        assert!(matches!(create_invoice(&pool, owner.id, &invoice).await, Err(InvoiceError::DuplicateNumber)));
    }
}
