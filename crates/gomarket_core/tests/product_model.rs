use gomarket_core::{NewProduct, Product};

#[test]
fn product_serialization_uses_expected_wire_fields() {
    let product = Product {
        id: "42".to_string(),
        title: "Sneakers".to_string(),
        image_url: "https://cdn.example/sneakers.png".to_string(),
        price: 129.9,
        quantity: 2,
    };

    let json = serde_json::to_value(&product).unwrap();
    assert_eq!(json["id"], "42");
    assert_eq!(json["title"], "Sneakers");
    assert_eq!(json["image_url"], "https://cdn.example/sneakers.png");
    assert_eq!(json["price"], 129.9);
    assert_eq!(json["quantity"], 2);

    let decoded: Product = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, product);
}

#[test]
fn snapshot_wire_format_is_a_plain_product_array() {
    // Shape compatibility with snapshots written by earlier app releases.
    let raw = r#"[{"id":"2","title":"Hat","image_url":"x","price":5.0,"quantity":3}]"#;
    let decoded: Vec<Product> = serde_json::from_str(raw).unwrap();
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].id, "2");
    assert_eq!(decoded[0].quantity, 3);

    let encoded = serde_json::to_string(&decoded).unwrap();
    let reparsed: Vec<Product> = serde_json::from_str(&encoded).unwrap();
    assert_eq!(reparsed, decoded);
}

#[test]
fn new_product_has_no_quantity_field_on_the_wire() {
    let item = NewProduct {
        id: "1".to_string(),
        title: "Shirt".to_string(),
        image_url: "x".to_string(),
        price: 10.0,
    };

    let json = serde_json::to_value(&item).unwrap();
    assert!(json.get("quantity").is_none());
}
