//! The static product catalog.
//!
//! The menu is small and changes only with a deploy, so it lives in code.
//! Order is significant: it is the display order on the storefront.

use std::sync::LazyLock;

use crate::types::{Price, Product};

static CATALOG: LazyLock<Vec<Product>> = LazyLock::new(|| {
    vec![
        Product::new(
            "1",
            "Argenta",
            "Pan brioche, blend de carne x2, muzzarella x2, morrones asados, huevo, mayo chimi.",
            "/img/Hamburguesa-Argenta.png",
            Price::new(8500),
        ),
        Product::new(
            "2",
            "BIG Manda",
            "Pan brioche, blend de carne x2, cheddar x2, lechuga repollada, tomate, cebolla en cubitos, salsa big-manda.",
            "/img/Hamburguesa-BIG-manda.png",
            Price::new(8500),
        ),
        Product::new(
            "3",
            "Cheese Manda",
            "Pan brioche, blend de carne x2, cheddar x2, bacon, mayo comanda.",
            "/img/Hamburguesa-cheese-manda.png",
            Price::new(8500),
        ),
        Product::new(
            "4",
            "Rocky",
            "Pan brioche, blend de carne x2, roquefort, muzzarella, cebolla caramelizada, alioli.",
            "/img/Hamburguesa-Rocky.png",
            Price::new(8500),
        ),
        Product::new(
            "5",
            "Tennessee",
            "Pan brioche, blend de carne x2, cheddar x4, mermelada de bacon, mayo comanda.",
            "/img/hamburguesa-tennessee.png",
            Price::new(8500),
        ),
        Product::new(
            "6",
            "Sandwich Pulled Pork",
            "Pan brioche, bondiola ahumada y braseada, muzzarella x2, ensalada coleslaw, mayo comanda.",
            "/img/Sandwich-pulled-pork.png",
            Price::new(10000),
        ),
        Product::new(
            "7",
            "Papas Cheddar y Bacon LC",
            "Papas fritas con cheddar derretido y bacon crocante.",
            "/img/Papas-LaComanda.png",
            Price::new(7000),
        ),
        Product::new(
            "8",
            "Próximamente",
            "Nuevos sabores en camino...",
            "/LogoMenu.png",
            Price::ZERO,
        ),
    ]
});

/// All products, in display order.
#[must_use]
pub fn catalog() -> &'static [Product] {
    &CATALOG
}

/// Find a product by its identifier.
#[must_use]
pub fn find(id: &str) -> Option<&'static Product> {
    CATALOG.iter().find(|product| product.id == id)
}
