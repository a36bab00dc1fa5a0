use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

fn validate_not_blank(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("Name is required".into()));
    }
    Ok(())
}

/// A catalog product as stored.
///
/// `id` is assigned by the store on insert and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub quantity: i32,
    #[schema(value_type = String, example = "9.99")]
    pub price: Decimal,
}

/// Wire input for create, update and delete.
///
/// `id` is ignored on create and defaults to 0 when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProductRequest {
    #[serde(default)]
    pub id: i32,
    #[validate(
        length(min = 1, message = "Name is required"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    #[schema(value_type = String, example = "9.99")]
    pub price: Decimal,
}

/// Client-facing projection of a [`Product`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub quantity: i32,
    #[schema(value_type = String, example = "9.99")]
    pub price: Decimal,
}

/// Outcome of a mutating operation.
///
/// Business-rule failures (duplicate name, unknown id) and storage failures
/// are both reported here with `success = false`; only the message differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ResponseEnvelope {
    pub success: bool,
    pub message: String,
}

impl ResponseEnvelope {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Conjunction of field filters used by `ProductRepository::get_by`.
///
/// Unset fields do not constrain; the default predicate matches every product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPredicate {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub quantity: Option<i32>,
    pub price: Option<Decimal>,
    /// Inclusive lower bound on quantity
    pub min_quantity: Option<i32>,
    /// Inclusive upper bound on price
    pub max_price: Option<Decimal>,
}

impl ProductPredicate {
    pub fn by_id(id: i32) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_quantity(mut self, quantity: i32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_min_quantity(mut self, min_quantity: i32) -> Self {
        self.min_quantity = Some(min_quantity);
        self
    }

    pub fn with_max_price(mut self, max_price: Decimal) -> Self {
        self.max_price = Some(max_price);
        self
    }

    /// Evaluate against an in-memory product; names compare exactly.
    pub fn matches(&self, product: &Product) -> bool {
        self.id.is_none_or(|id| product.id == id)
            && self.name.as_deref().is_none_or(|name| product.name == name)
            && self.quantity.is_none_or(|q| product.quantity == q)
            && self.price.is_none_or(|p| product.price == p)
            && self.min_quantity.is_none_or(|min| product.quantity >= min)
            && self.max_price.is_none_or(|max| product.price <= max)
    }
}
