//! Catalog, quotes, order submission and print tickets.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::{StatusCode, header};
use la_comanda_integration_tests::{BASE_URL, TestContext, WHATSAPP_NUMBER};
use serde_json::{Value, json};

fn pickup_order() -> Value {
    json!({
        "items": [
            { "productId": "1" },
            { "productId": "7", "observations": "bien crocantes" }
        ],
        "customerData": {
            "name": "  Juan  ",
            "phone": "3772406996",
            "paymentMethod": "efectivo",
            "orderType": "pickup"
        }
    })
}

fn delivery_order() -> Value {
    json!({
        "items": [{ "productId": "1" }],
        "customerData": {
            "name": "Marta",
            "phone": "3772111111",
            "paymentMethod": "transferencia",
            "orderType": "delivery",
            "address": {
                "street": "San Martín",
                "number": "450",
                "neighborhood": "Centro"
            },
            "generalObservations": "tocar timbre"
        }
    })
}

/// Path and query of an absolute URL issued by the storefront.
fn local_path(url: &str) -> &str {
    url.strip_prefix(BASE_URL).unwrap()
}

#[tokio::test]
async fn test_catalog_lists_products_with_orderable_flag() {
    let ctx = TestContext::new();

    let body = ctx.get("/catalog").await.json();
    let products = body.as_array().unwrap();

    assert_eq!(products.len(), 8);
    assert_eq!(products[0]["id"], "1");
    assert_eq!(products[0]["name"], "Argenta");
    assert_eq!(products[0]["price"], 8500);
    assert_eq!(products[0]["orderable"], true);
    let preview = products.iter().find(|p| p["id"] == "8").unwrap();
    assert_eq!(preview["orderable"], false);
}

#[tokio::test]
async fn test_quote_pickup_and_delivery() {
    let ctx = TestContext::new();

    let pickup = ctx
        .post_json("/quote", &json!({ "items": [{ "productId": "1" }] }))
        .await
        .json();
    assert_eq!(pickup, json!({ "subtotal": 8500, "deliveryFee": 0, "total": 8500 }));

    let delivery = ctx
        .post_json(
            "/quote",
            &json!({
                "items": [{ "productId": "1" }, { "productId": "7" }],
                "orderType": "delivery",
                "neighborhood": "Centro"
            }),
        )
        .await
        .json();
    assert_eq!(delivery["subtotal"], 15500);
    assert_eq!(delivery["deliveryFee"], 3000);
    assert_eq!(delivery["total"], 18500);

    let no_neighborhood = ctx
        .post_json(
            "/quote",
            &json!({ "items": [{ "productId": "1" }], "orderType": "delivery" }),
        )
        .await
        .json();
    assert_eq!(no_neighborhood["deliveryFee"], 2500);
}

#[tokio::test]
async fn test_quote_rejects_preview_product() {
    let ctx = TestContext::new();

    let response = ctx
        .post_json("/quote", &json!({ "items": [{ "productId": "8" }] }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["success"], false);
}

#[tokio::test]
async fn test_pickup_order_message_and_links() {
    let ctx = TestContext::new();

    let response = ctx.post_json("/orders", &pickup_order()).await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    let body = response.json();

    assert_eq!(body["success"], true);
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("*NUEVO PEDIDO - LA COMANDA*\n"));
    assert!(message.contains("*Cliente:* Juan\n"));
    assert!(message.contains("2. Papas Cheddar y Bacon LC - bien crocantes ($7000)\n"));
    assert!(message.contains("*Total:* 8500+7000=15500\n"));
    assert!(!message.contains("*Envio:*"));

    let whatsapp = body["whatsappUrl"].as_str().unwrap();
    assert!(whatsapp.starts_with(&format!("https://wa.me/{WHATSAPP_NUMBER}?text=")));

    assert_eq!(body["quote"]["total"], 15500);
    assert!(body["printUrl"].as_str().unwrap().starts_with(BASE_URL));
    assert!(body["shortPrintUrl"].as_str().unwrap().starts_with(BASE_URL));
}

#[tokio::test]
async fn test_delivery_order_includes_fee_and_address() {
    let ctx = TestContext::new();

    let body = ctx.post_json("/orders", &delivery_order()).await.json();
    let message = body["message"].as_str().unwrap();

    assert!(message.contains("*Direccion:*\nSan Martín 450\n"));
    assert!(message.contains("Barrio: Centro\n"));
    assert!(message.contains("*Envio:* $3000\n"));
    assert!(message.contains("*Total:* 8500+3000=11500\n"));
    assert!(message.ends_with("*Observaciones:* tocar timbre"));
}

#[tokio::test]
async fn test_order_validation_errors() {
    let ctx = TestContext::new();

    let mut missing_name = pickup_order();
    missing_name["customerData"]["name"] = json!("   ");
    let response = ctx.post_json("/orders", &missing_name).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let mut no_address = delivery_order();
    no_address["customerData"]
        .as_object_mut()
        .unwrap()
        .remove("address");
    let response = ctx.post_json("/orders", &no_address).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let mut empty = pickup_order();
    empty["items"] = json!([]);
    let response = ctx.post_json("/orders", &empty).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let mut unknown = pickup_order();
    unknown["items"] = json!([{ "productId": "99" }]);
    let response = ctx.post_json("/orders", &unknown).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["success"], false);
}

#[tokio::test]
async fn test_orders_refused_while_paused() {
    let ctx = TestContext::new();
    let token = ctx.login_token().await;
    ctx.post_json_bearer("/admin-status", &json!({ "orderingEnabled": false }), &token)
        .await;

    let response = ctx.post_json("/orders", &pickup_order()).await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.json()["success"], false);
}

#[tokio::test]
async fn test_print_links_render_ticket() {
    let ctx = TestContext::new();
    let body = ctx.post_json("/orders", &delivery_order()).await.json();

    for url in [&body["printUrl"], &body["shortPrintUrl"]] {
        let page = ctx.get(local_path(url.as_str().unwrap())).await;
        assert_eq!(page.status, StatusCode::OK);
        assert!(
            page.headers[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );
        assert!(page.body.contains("LA COMANDA - PEDIDO"));
        assert!(page.body.contains("Marta"));
        assert!(page.body.contains("San Martín 450"));
        assert!(page.body.contains("tocar timbre"));
    }
}

#[tokio::test]
async fn test_print_errors() {
    let ctx = TestContext::new();

    let missing = ctx.get("/print").await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert!(missing.body.contains("No hay datos para imprimir"));

    let garbage = ctx.get("/print?data=%25%25no-es-base64").await;
    assert_eq!(garbage.status, StatusCode::BAD_REQUEST);
    assert!(garbage.body.contains("Error al decodificar los datos"));

    let unknown = ctx.get("/print/zzzzzz").await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    assert!(unknown.body.contains("Pedido no encontrado o expirado"));
}
