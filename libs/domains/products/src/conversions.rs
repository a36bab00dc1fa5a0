//! Mapping between wire types and the stored [`Product`].

use crate::models::{Product, ProductRequest, ProductView};

/// Field-for-field copy of a validated request.
pub fn to_entity(request: &ProductRequest) -> Product {
    Product {
        id: request.id,
        name: request.name.clone(),
        quantity: request.quantity,
        price: request.price,
    }
}

pub fn from_entity(product: Product) -> ProductView {
    ProductView {
        id: product.id,
        name: product.name,
        quantity: product.quantity,
        price: product.price,
    }
}

/// Projects every product, preserving order.
pub fn from_entities(products: Vec<Product>) -> Vec<ProductView> {
    products.into_iter().map(from_entity).collect()
}
