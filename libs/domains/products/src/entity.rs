use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::models::Product;

/// Sea-ORM entity for the `products` table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text", unique)]
    pub name: String,
    pub quantity: i32,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub price: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            quantity: model.quantity,
            price: model.price,
        }
    }
}

impl ActiveModel {
    /// Row for insertion; the id is left to the `SERIAL` column.
    pub fn for_insert(product: &Product) -> Self {
        Self {
            id: NotSet,
            name: Set(product.name.clone()),
            quantity: Set(product.quantity),
            price: Set(product.price),
        }
    }

    /// Full replacement of the row keyed by `product.id`.
    pub fn for_replace(product: &Product) -> Self {
        Self {
            id: Set(product.id),
            name: Set(product.name.clone()),
            quantity: Set(product.quantity),
            price: Set(product.price),
        }
    }
}
