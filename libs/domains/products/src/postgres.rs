use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, SqlErr, TransactionTrait,
};
use std::sync::Arc;
use tracing::instrument;

use crate::{
    entity,
    error::{ProductError, ProductResult},
    logging::{ErrorLogger, TracingErrorLogger},
    models::{Product, ProductPredicate, ResponseEnvelope},
    repository::{messages, ProductRepository},
};

/// PostgreSQL implementation of [`ProductRepository`].
///
/// Updates and deletes run inside a transaction; any storage failure is
/// handed to the [`ErrorLogger`] and reported with a generic message.
pub struct PgProductRepository {
    db: DatabaseConnection,
    logger: Arc<dyn ErrorLogger>,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_logger(db, Arc::new(TracingErrorLogger))
    }

    pub fn with_logger(db: DatabaseConnection, logger: Arc<dyn ErrorLogger>) -> Self {
        Self { db, logger }
    }

    fn storage_failure(&self, operation: &str, err: &DbErr, message: &str) -> ResponseEnvelope {
        self.logger.log_exception(operation, err);
        ResponseEnvelope::fail(message)
    }

    async fn replace(&self, product: &Product) -> Result<(), DbErr> {
        let txn = self.db.begin().await?;
        entity::ActiveModel::for_replace(product).update(&txn).await?;
        txn.commit().await
    }

    async fn remove(&self, id: i32) -> Result<u64, DbErr> {
        let txn = self.db.begin().await?;
        let result = entity::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(result.rows_affected)
    }
}

/// Every set predicate field becomes one conjunct.
fn condition_for(predicate: &ProductPredicate) -> Condition {
    let mut condition = Condition::all();

    if let Some(id) = predicate.id {
        condition = condition.add(entity::Column::Id.eq(id));
    }
    if let Some(name) = &predicate.name {
        condition = condition.add(entity::Column::Name.eq(name.as_str()));
    }
    if let Some(quantity) = predicate.quantity {
        condition = condition.add(entity::Column::Quantity.eq(quantity));
    }
    if let Some(price) = predicate.price {
        condition = condition.add(entity::Column::Price.eq(price));
    }
    if let Some(min_quantity) = predicate.min_quantity {
        condition = condition.add(entity::Column::Quantity.gte(min_quantity));
    }
    if let Some(max_price) = predicate.max_price {
        condition = condition.add(entity::Column::Price.lte(max_price));
    }

    condition
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    #[instrument(skip(self), fields(name = %product.name))]
    async fn create(&self, product: Product) -> ResponseEnvelope {
        match self.get_by(ProductPredicate::by_name(product.name.clone())).await {
            Ok(Some(_)) => return ResponseEnvelope::fail(messages::already_added(&product.name)),
            Ok(None) => {}
            Err(_) => return ResponseEnvelope::fail(messages::CREATE_FAILED),
        }

        match entity::ActiveModel::for_insert(&product).insert(&self.db).await {
            Ok(model) if model.id > 0 => {
                tracing::info!(product_id = model.id, "Created product");
                ResponseEnvelope::ok(messages::added(&product.name))
            }
            Ok(_) => ResponseEnvelope::fail(messages::not_added(&product.name)),
            // Lost a race with a concurrent insert of the same name
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                ResponseEnvelope::fail(messages::already_added(&product.name))
            }
            Err(err) => self.storage_failure("create", &err, messages::CREATE_FAILED),
        }
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i32) -> ProductResult<Option<Product>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| {
                self.logger.log_exception("find_by_id", &e);
                ProductError::Storage(messages::READ_ONE_FAILED.to_string())
            })?;

        Ok(model.map(Product::from))
    }

    #[instrument(skip(self))]
    async fn get_all(&self) -> ProductResult<Vec<Product>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                self.logger.log_exception("get_all", &e);
                ProductError::Storage(messages::READ_ALL_FAILED.to_string())
            })?;

        Ok(models.into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self))]
    async fn get_by(&self, predicate: ProductPredicate) -> ProductResult<Option<Product>> {
        let model = entity::Entity::find()
            .filter(condition_for(&predicate))
            .order_by_asc(entity::Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| {
                self.logger.log_exception("get_by", &e);
                ProductError::Storage(messages::READ_ONE_FAILED.to_string())
            })?;

        Ok(model.map(Product::from))
    }

    #[instrument(skip(self), fields(id = product.id))]
    async fn update(&self, product: Product) -> ResponseEnvelope {
        match self.find_by_id(product.id).await {
            Ok(Some(_)) => {}
            Ok(None) => return ResponseEnvelope::fail(messages::update_target_missing(&product.name)),
            Err(_) => return ResponseEnvelope::fail(messages::UPDATE_FAILED),
        }

        match self.replace(&product).await {
            Ok(()) => {
                tracing::info!(product_id = product.id, "Updated product");
                ResponseEnvelope::ok(messages::updated(&product.name))
            }
            Err(err) => self.storage_failure("update", &err, messages::UPDATE_FAILED),
        }
    }

    #[instrument(skip(self), fields(id = product.id))]
    async fn delete(&self, product: Product) -> ResponseEnvelope {
        match self.find_by_id(product.id).await {
            Ok(Some(_)) => {}
            Ok(None) => return ResponseEnvelope::fail(messages::delete_target_missing(&product.name)),
            Err(_) => return ResponseEnvelope::fail(messages::DELETE_FAILED),
        }

        match self.remove(product.id).await {
            Ok(rows) if rows > 0 => {
                tracing::info!(product_id = product.id, "Deleted product");
                ResponseEnvelope::ok(messages::deleted(&product.name))
            }
            // Removed by someone else between the lookup and the delete
            Ok(_) => ResponseEnvelope::fail(messages::delete_target_missing(&product.name)),
            Err(err) => self.storage_failure("delete", &err, messages::DELETE_FAILED),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingLogger {
        calls: AtomicUsize,
    }

    impl ErrorLogger for CountingLogger {
        fn log_exception(&self, _operation: &str, _error: &(dyn Error + 'static)) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn widget_model(id: i32) -> entity::Model {
        entity::Model {
            id,
            name: "Widget".to_string(),
            quantity: 5,
            price: Decimal::new(999, 2),
        }
    }

    fn widget_input() -> Product {
        Product {
            id: 0,
            name: "Widget".to_string(),
            quantity: 5,
            price: Decimal::new(999, 2),
        }
    }

    fn repo_with(db: MockDatabase) -> (PgProductRepository, Arc<CountingLogger>) {
        let logger = Arc::new(CountingLogger::default());
        let repo = PgProductRepository::with_logger(db.into_connection(), logger.clone());
        (repo, logger)
    }

    #[tokio::test]
    async fn test_create_duplicate_name() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![widget_model(1)]]);
        let (repo, logger) = repo_with(db);

        let envelope = repo.create(widget_input()).await;

        assert_eq!(envelope, ResponseEnvelope::fail("Widget already added"));
        assert_eq!(logger.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_success() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .append_query_results([vec![widget_model(7)]]);
        let (repo, _) = repo_with(db);

        let envelope = repo.create(widget_input()).await;

        assert_eq!(
            envelope,
            ResponseEnvelope::ok("Widget added to database successfully")
        );
    }

    #[tokio::test]
    async fn test_create_storage_failure_is_logged_and_generic() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .append_query_errors([DbErr::Custom("connection reset".to_string())]);
        let (repo, logger) = repo_with(db);

        let envelope = repo.create(widget_input()).await;

        assert_eq!(
            envelope,
            ResponseEnvelope::fail("Error occurred adding new product")
        );
        assert_eq!(logger.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()]);
        let (repo, _) = repo_with(db);

        let mut product = widget_input();
        product.id = 999;

        assert_eq!(
            repo.update(product).await,
            ResponseEnvelope::fail("Widget not found!")
        );
    }

    #[tokio::test]
    async fn test_update_success() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![widget_model(1)], vec![widget_model(1)]]);
        let (repo, logger) = repo_with(db);

        let mut product = widget_input();
        product.id = 1;

        assert_eq!(
            repo.update(product).await,
            ResponseEnvelope::ok("Widget is updated successfully")
        );
        assert_eq!(logger.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_update_storage_failure_is_logged_and_generic() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![widget_model(1)]])
            .append_query_errors([DbErr::Custom("deadlock detected".to_string())]);
        let (repo, logger) = repo_with(db);

        let mut product = widget_input();
        product.id = 1;

        assert_eq!(
            repo.update(product).await,
            ResponseEnvelope::fail("Error occurred updating product")
        );
        assert_eq!(logger.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_update_lookup_failure_is_generic() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("timeout".to_string())]);
        let (repo, logger) = repo_with(db);

        let mut product = widget_input();
        product.id = 1;

        assert_eq!(
            repo.update(product).await,
            ResponseEnvelope::fail("Error occurred updating product")
        );
        assert_eq!(logger.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_delete_success() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![widget_model(1)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }]);
        let (repo, logger) = repo_with(db);

        let mut product = widget_input();
        product.id = 1;

        assert_eq!(
            repo.delete(product).await,
            ResponseEnvelope::ok("Widget is deleted succesfully!")
        );
        assert_eq!(logger.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_delete_storage_failure_is_logged_and_generic() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![widget_model(1)]])
            .append_exec_errors([DbErr::Custom("connection reset".to_string())]);
        let (repo, logger) = repo_with(db);

        let mut product = widget_input();
        product.id = 1;

        assert_eq!(
            repo.delete(product).await,
            ResponseEnvelope::fail("Error occurred deleting product")
        );
        assert_eq!(logger.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_delete_row_gone_before_delete() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![widget_model(1)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }]);
        let (repo, logger) = repo_with(db);

        let mut product = widget_input();
        product.id = 1;

        assert_eq!(
            repo.delete(product).await,
            ResponseEnvelope::fail("Widget not found")
        );
        assert_eq!(logger.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_delete_unknown_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()]);
        let (repo, _) = repo_with(db);

        let mut product = widget_input();
        product.id = 999;

        assert_eq!(
            repo.delete(product).await,
            ResponseEnvelope::fail("Widget not found")
        );
    }

    #[tokio::test]
    async fn test_get_all_maps_rows_in_order() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![widget_model(1), widget_model(2)]]);
        let (repo, _) = repo_with(db);

        let products = repo.get_all().await.unwrap();

        assert_eq!(products.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_read_failure_maps_to_storage_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("timeout".to_string())]);
        let (repo, logger) = repo_with(db);

        let err = repo.find_by_id(1).await.unwrap_err();

        assert!(matches!(err, ProductError::Storage(ref msg) if msg == "Error occurred retrieving product"));
        assert_eq!(logger.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_predicate_has_no_conjuncts() {
        assert!(condition_for(&ProductPredicate::default()).is_empty());
        assert_eq!(
            condition_for(&ProductPredicate::by_name("Widget").with_min_quantity(2)).len(),
            2
        );
    }
}
