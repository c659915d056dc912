use rust_decimal::Decimal;

use storefront::api::dto::{CartItemDto, CartSummaryDto};
use storefront::model::{CartLineModel, CartModel, CartModelError};

pub(crate) fn ut_item_dto(id: u64, product_id: u64, price: f64, quantity: u32) -> CartItemDto {
    let raw = format!(
        r#"{{
            "id": {id}, "product_id": {product_id}, "quantity": {quantity},
            "created_at": "2024-05-20T09:41:02",
            "product": {{"id": {product_id}, "name": "mock-product-{product_id}",
                         "price": {price}, "is_active": true, "has_image": false}}
        }}"#
    );
    serde_json::from_str::<CartItemDto>(raw.as_str()).unwrap()
}

pub(crate) fn ut_summary_dto(total: f64, item_count: u32) -> CartSummaryDto {
    let raw = format!(r#"{{"total_amount": {total}, "item_count": {item_count}}}"#);
    serde_json::from_str::<CartSummaryDto>(raw.as_str()).unwrap()
}

#[test]
fn line_from_dto_ok() {
    let d = ut_item_dto(83, 290, 12.5, 3);
    let m = CartLineModel::try_from(d).unwrap();
    assert_eq!(m.item_id, 83u64);
    assert_eq!(m.product.product_id, 290u64);
    assert_eq!(m.product.unit_price, Decimal::new(125, 1));
    assert_eq!(m.quantity, 3u32);
    assert!(m.product.active);
}

#[test]
fn line_from_dto_quantity_floor() {
    let d = ut_item_dto(83, 290, 12.5, 0);
    let result = CartLineModel::try_from(d);
    let e = result.err().unwrap();
    assert!(matches!(
        e,
        CartModelError::InvalidQuantity { item_id: 83, given: 0 }
    ));
}

#[test]
fn cart_from_parts_keeps_add_order() {
    let d_lines = vec![
        ut_item_dto(7, 290, 12.5, 1),
        ut_item_dto(3, 291, 3.99, 2),
        ut_item_dto(11, 292, 0.45, 10),
    ];
    let m = CartModel::try_from_parts(d_lines, ut_summary_dto(24.98, 13)).unwrap();
    assert_eq!(m.num_lines(), 3);
    // insertion order reflects add order, not item-id order
    let ids = m.lines.iter().map(|l| l.item_id).collect::<Vec<_>>();
    assert_eq!(ids, vec![7u64, 3, 11]);
    assert_eq!(m.unit_count, 13u32);
    assert_eq!(m.server_total, Decimal::new(2498, 2));
    assert!(m.find_line(11).is_some());
    assert!(m.find_line(12).is_none());
    assert!(!m.is_empty());
}

#[test]
fn cart_from_parts_malformed_price() {
    let raw = r#"{
        "id": 5, "product_id": 9, "quantity": 1, "created_at": null,
        "product": {"id": 9, "name": "x", "price": 1e40, "is_active": true}
    }"#;
    let d = serde_json::from_str::<CartItemDto>(raw).unwrap();
    let result = CartModel::try_from_parts(vec![d], ut_summary_dto(0.0, 0));
    let e = result.err().unwrap();
    assert!(matches!(e, CartModelError::AmountParse { item_id: 5, .. }));
}
