//! Order lifecycle engine.

use std::time::Instant;

use catalog::{Catalog, Product, StockRequest, lock_order};
use chrono::Utc;
use common::{LineItemId, Money, OrderId, OrderStatus, ProductId};
use order_store::{OrderQuery, OrderStore};

use crate::config::Config;
use crate::error::DomainError;
use crate::repository::OrderRepository;

use super::{
    AddItem, CancelOrder, CreateOrder, FinalizeOrder, LineItem, Order, OrderError, RemoveItem,
    UpdateQuantities, rules,
};

/// Service for managing orders.
///
/// Every operation loads the order, runs the validation rules, mutates the
/// aggregate and persists it. Nothing is written when a rule fails.
pub struct OrderService<S: OrderStore, C: Catalog> {
    repository: OrderRepository<S>,
    catalog: C,
    config: Config,
}

impl<S: OrderStore, C: Catalog> OrderService<S, C> {
    /// Creates a new order service with the default configuration.
    pub fn new(store: S, catalog: C) -> Self {
        Self::with_config(store, catalog, Config::default())
    }

    pub fn with_config(store: S, catalog: C, config: Config) -> Self {
        Self {
            repository: OrderRepository::new(store),
            catalog,
            config,
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &OrderRepository<S> {
        &self.repository
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Creates a new draft order.
    #[tracing::instrument(skip(self, cmd), fields(requester = %cmd.requester, items = cmd.items.len()))]
    pub async fn create_order(&self, cmd: CreateOrder) -> Result<Order, DomainError> {
        self.create(cmd)
            .await
            .inspect_err(|e| rejected("create_order", e))
    }

    /// Adds an item to a draft order.
    #[tracing::instrument(skip(self), fields(order_id = %cmd.order_id))]
    pub async fn add_item(&self, cmd: AddItem) -> Result<Order, DomainError> {
        self.add(cmd).await.inspect_err(|e| rejected("add_item", e))
    }

    /// Changes the requester and listed item quantities of a draft order.
    #[tracing::instrument(skip(self), fields(order_id = %cmd.order_id))]
    pub async fn update_quantities(&self, cmd: UpdateQuantities) -> Result<Order, DomainError> {
        self.update(cmd)
            .await
            .inspect_err(|e| rejected("update_quantities", e))
    }

    /// Removes an item from a draft order.
    #[tracing::instrument(skip(self), fields(order_id = %cmd.order_id))]
    pub async fn remove_item(&self, cmd: RemoveItem) -> Result<Order, DomainError> {
        self.remove(cmd)
            .await
            .inspect_err(|e| rejected("remove_item", e))
    }

    /// Cancels a draft order.
    #[tracing::instrument(skip(self), fields(order_id = %cmd.order_id))]
    pub async fn cancel_order(&self, cmd: CancelOrder) -> Result<Order, DomainError> {
        self.cancel(cmd)
            .await
            .inspect_err(|e| rejected("cancel_order", e))
    }

    /// Finalizes a draft order, committing stock for every line item.
    ///
    /// Either every line item's stock is decremented or none is. If the
    /// finalized order cannot be saved, the decrements are released again.
    #[tracing::instrument(skip(self), fields(order_id = %cmd.order_id))]
    pub async fn finalize_order(&self, cmd: FinalizeOrder) -> Result<Order, DomainError> {
        self.finalize(cmd)
            .await
            .inspect_err(|e| rejected("finalize_order", e))
    }

    /// Loads an order by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, order_id: OrderId) -> Result<Order, DomainError> {
        self.repository.load(order_id).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_orders(&self, query: OrderQuery) -> Result<Vec<Order>, DomainError> {
        self.repository.list(query).await
    }

    /// Lists the catalog's products.
    #[tracing::instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        Ok(self.catalog.list_products().await?)
    }
}

// Operation bodies
impl<S: OrderStore, C: Catalog> OrderService<S, C> {
    async fn create(&self, cmd: CreateOrder) -> Result<Order, DomainError> {
        rules::requester_required(&cmd.requester)?;
        rules::date_not_future(cmd.order_date, Utc::now())?;
        rules::non_empty_order(&cmd.items)?;

        let mut line_items: Vec<LineItem> = Vec::with_capacity(cmd.items.len());
        for requested in &cmd.items {
            let product = self
                .lookup_product(requested.product_id, requested.quantity)
                .await?;
            rules::no_duplicate_in(&line_items, product.id)?;
            rules::stock_sufficient(&product, requested.quantity)?;
            line_items.push(LineItem::new(product.id, requested.quantity, product.price));
        }

        let mut order = Order::draft(OrderId::new(), cmd.requester, cmd.order_date, line_items);
        rules::value_ceiling(order.total(), self.config.value_ceiling)?;

        self.repository.save(&mut order).await?;

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = %order.id(), total = %order.total(), "order created");
        Ok(order)
    }

    async fn add(&self, cmd: AddItem) -> Result<Order, DomainError> {
        let mut order = self.repository.load(cmd.order_id).await?;
        require_draft(&order, "add items")?;

        let product = self.lookup_product(cmd.product_id, cmd.quantity).await?;
        rules::no_duplicate_product(&order, product.id)?;
        rules::stock_sufficient(&product, cmd.quantity)?;

        let item = LineItem::new(product.id, cmd.quantity, product.price);
        rules::value_ceiling(order.total() + item.total(), self.config.value_ceiling)?;
        let item_id = item.id();
        order.add_item(item)?;

        self.repository.save(&mut order).await?;

        tracing::info!(%item_id, product_id = %cmd.product_id, total = %order.total(), "item added");
        Ok(order)
    }

    async fn update(&self, cmd: UpdateQuantities) -> Result<Order, DomainError> {
        let mut order = self.repository.load(cmd.order_id).await?;
        require_draft(&order, "update items")?;

        if let Some(ref requester) = cmd.requester {
            rules::requester_required(requester)?;
        }

        for change in &cmd.quantities {
            if order.get_item(change.item_id).is_none() {
                tracing::debug!(item_id = %change.item_id, "ignoring quantity for unknown item");
            }
        }

        // Validate everything and price the result before touching the order.
        let mut changes: Vec<(LineItemId, u32, Product)> = Vec::new();
        let mut prospective_total = Money::zero();
        for item in order.line_items() {
            let Some(change) = cmd.quantities.iter().find(|c| c.item_id == item.id()) else {
                prospective_total += item.total();
                continue;
            };

            let product = self
                .lookup_product(item.product_id(), change.quantity)
                .await?;
            rules::stock_sufficient(&product, change.quantity)?;

            prospective_total += product.price.multiply(change.quantity);
            changes.push((item.id(), change.quantity, product));
        }
        rules::value_ceiling(prospective_total, self.config.value_ceiling)?;

        for (item_id, quantity, product) in &changes {
            order.update_item_quantity(*item_id, *quantity)?;
            order.update_item_price(*item_id, product.price)?;
        }
        if let Some(requester) = cmd.requester {
            order.set_requester(requester);
        }

        self.repository.save(&mut order).await?;

        tracing::info!(updated = changes.len(), total = %order.total(), "order updated");
        Ok(order)
    }

    async fn remove(&self, cmd: RemoveItem) -> Result<Order, DomainError> {
        let mut order = self.repository.load(cmd.order_id).await?;
        require_draft(&order, "remove items")?;

        self.repository.delete_item(&mut order, cmd.item_id).await?;

        tracing::info!(item_id = %cmd.item_id, total = %order.total(), "item removed");
        Ok(order)
    }

    async fn cancel(&self, cmd: CancelOrder) -> Result<Order, DomainError> {
        let mut order = self.repository.load(cmd.order_id).await?;
        require_draft(&order, "cancel")?;

        order.transition_to(OrderStatus::Cancelled);
        self.repository.save(&mut order).await?;

        metrics::counter!("orders_cancelled_total").increment(1);
        tracing::info!("order cancelled");
        Ok(order)
    }

    async fn finalize(&self, cmd: FinalizeOrder) -> Result<Order, DomainError> {
        let started = Instant::now();
        let mut order = self.repository.load(cmd.order_id).await?;
        require_draft(&order, "finalize")?;

        // Stock may have moved since the order was drafted.
        for item in order.line_items() {
            let product = rules::product_exists(
                item.product_id(),
                self.catalog.get_product(item.product_id()).await?,
            )?;
            rules::stock_sufficient(&product, item.quantity())?;
        }

        let requests: Vec<StockRequest> = order
            .line_items()
            .iter()
            .map(|item| StockRequest::new(item.product_id(), item.quantity()))
            .collect();
        let requests = lock_order(&requests);
        self.catalog.decrement_all(&requests).await?;

        order.transition_to(OrderStatus::Finalized);
        if let Err(err) = self.repository.save(&mut order).await {
            metrics::counter!("order_finalize_stock_rollbacks_total").increment(1);
            tracing::warn!(error = %err, "saving finalized order failed, releasing stock");

            if let Err(release_err) = self.catalog.release_all(&requests).await {
                tracing::error!(error = %release_err, "stock release failed");
                return Err(DomainError::RollbackFailed {
                    order_id: cmd.order_id,
                    reason: release_err.to_string(),
                });
            }
            return Err(err);
        }

        let duration = started.elapsed().as_secs_f64();
        metrics::histogram!("order_finalize_duration_seconds").record(duration);
        metrics::counter!("orders_finalized_total").increment(1);
        tracing::info!(total = %order.total(), duration, "order finalized");
        Ok(order)
    }

    /// Checks quantity and product existence, in that order.
    async fn lookup_product(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Product, DomainError> {
        rules::quantity_positive(quantity)?;
        let product = self.catalog.get_product(product_id).await?;
        Ok(rules::product_exists(product_id, product)?)
    }
}

fn require_draft(order: &Order, action: &'static str) -> Result<(), OrderError> {
    match order.status() {
        OrderStatus::Draft => Ok(()),
        current_state @ (OrderStatus::Finalized | OrderStatus::Cancelled) => {
            Err(OrderError::InvalidStateTransition {
                current_state,
                action,
            })
        }
    }
}

fn rejected(operation: &'static str, err: &DomainError) {
    let kind = err.kind();
    metrics::counter!("order_operations_rejected_total", "kind" => kind.as_str()).increment(1);
    tracing::warn!(operation, kind = %kind, reason = %err, "order operation rejected");
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use catalog::InMemoryCatalog;
    use order_store::{
        InMemoryOrderStore, OrderRecord, OrderStoreError, SaveOptions, Version,
    };

    use super::*;
    use crate::error::ErrorKind;
    use crate::order::NewLineItem;

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::with_products([
            Product::new(ProductId::new(1), "Widget", Money::from_units(20), 10),
            Product::new(ProductId::new(2), "Gadget", Money::from_units(5), 100),
            Product::new(ProductId::new(3), "Bulk", Money::from_units(20), 10_000),
        ])
    }

    fn service() -> OrderService<InMemoryOrderStore, InMemoryCatalog> {
        OrderService::new(InMemoryOrderStore::new(), catalog())
    }

    async fn create_ana_order(
        service: &OrderService<InMemoryOrderStore, InMemoryCatalog>,
    ) -> Order {
        service
            .create_order(CreateOrder::now("Ana", vec![NewLineItem::new(ProductId::new(1), 5)]))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_order() {
        let service = service();
        let order = create_ana_order(&service).await;

        assert_eq!(order.status(), OrderStatus::Draft);
        assert_eq!(order.total(), Money::from_units(100));
        assert_eq!(order.line_items()[0].unit_price(), Money::from_units(20));
        assert_eq!(order.version(), Version::first());

        let loaded = service.get_order(order.id()).await.unwrap();
        assert_eq!(loaded, order);
    }

    #[tokio::test]
    async fn test_create_rule_order() {
        let service = service();

        let blank = service
            .create_order(CreateOrder::now(" ", vec![]))
            .await
            .unwrap_err();
        assert!(matches!(blank, DomainError::Order(OrderError::RequesterRequired)));

        let empty = service
            .create_order(CreateOrder::now("Ana", vec![]))
            .await
            .unwrap_err();
        assert!(matches!(empty, DomainError::Order(OrderError::NoItems)));

        let future = service
            .create_order(CreateOrder::new(
                "Ana",
                Utc::now() + chrono::Duration::days(1),
                vec![NewLineItem::new(ProductId::new(1), 1)],
            ))
            .await
            .unwrap_err();
        assert_eq!(future.kind(), ErrorKind::ValidationFailed);

        let duplicate = service
            .create_order(CreateOrder::now(
                "Ana",
                vec![NewLineItem::new(ProductId::new(1), 1), NewLineItem::new(ProductId::new(1), 2)],
            ))
            .await
            .unwrap_err();
        assert_eq!(duplicate.kind(), ErrorKind::DuplicateProduct);

        let missing = service
            .create_order(CreateOrder::now("Ana", vec![NewLineItem::new(ProductId::new(99), 1)]))
            .await
            .unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::NotFound);

        assert_eq!(service.repository().store().order_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_over_ceiling() {
        let service = service();
        let err = service
            .create_order(CreateOrder::now("Ana", vec![NewLineItem::new(ProductId::new(3), 501)]))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ValueExceeded);
        assert_eq!(
            err.to_string(),
            "Order total 10020.00 exceeds the limit of 10000.00"
        );
    }

    #[tokio::test]
    async fn test_create_with_overflowing_price_exceeds_ceiling() {
        let catalog = catalog();
        catalog
            .upsert(Product::new(
                ProductId::new(4),
                "Heirloom",
                Money::from_cents(i64::MAX / 2),
                10,
            ))
            .await;
        let service = OrderService::new(InMemoryOrderStore::new(), catalog);

        let err = service
            .create_order(CreateOrder::now("Ana", vec![NewLineItem::new(ProductId::new(4), 3)]))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ValueExceeded);
    }

    #[tokio::test]
    async fn test_add_item_with_overflowing_price_exceeds_ceiling() {
        let catalog = catalog();
        catalog
            .upsert(Product::new(
                ProductId::new(4),
                "Heirloom",
                Money::from_cents(i64::MAX / 2),
                10,
            ))
            .await;
        let service = OrderService::new(InMemoryOrderStore::new(), catalog);
        let order = create_ana_order(&service).await;

        let err = service
            .add_item(AddItem::new(order.id(), ProductId::new(4), 3))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ValueExceeded);
        let reloaded = service.get_order(order.id()).await.unwrap();
        assert_eq!(reloaded.line_items().len(), 1);
    }

    #[tokio::test]
    async fn test_update_after_overflowing_reprice_exceeds_ceiling() {
        let service = service();
        let order = create_ana_order(&service).await;
        service
            .catalog()
            .upsert(Product::new(
                ProductId::new(1),
                "Widget",
                Money::from_cents(i64::MAX / 2),
                10,
            ))
            .await;

        let item_id = order.line_items()[0].id();
        let err = service
            .update_quantities(UpdateQuantities::new(order.id()).quantity(item_id, 3))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ValueExceeded);
    }

    #[tokio::test]
    async fn test_configured_ceiling() {
        let config = Config::default().with_value_ceiling(Money::from_units(50));
        let service = OrderService::with_config(InMemoryOrderStore::new(), catalog(), config);

        let err = service
            .create_order(CreateOrder::now("Ana", vec![NewLineItem::new(ProductId::new(1), 3)]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueExceeded);
    }

    #[tokio::test]
    async fn test_add_item() {
        let service = service();
        let order = create_ana_order(&service).await;

        let order = service
            .add_item(AddItem::new(order.id(), ProductId::new(2), 4))
            .await
            .unwrap();
        assert_eq!(order.item_count(), 2);
        assert_eq!(order.total(), Money::from_units(120));
        assert_eq!(order.version(), Version::new(2));
    }

    #[tokio::test]
    async fn test_add_duplicate_product() {
        let service = service();
        let order = create_ana_order(&service).await;

        let err = service
            .add_item(AddItem::new(order.id(), ProductId::new(1), 1))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateProduct);

        let loaded = service.get_order(order.id()).await.unwrap();
        assert_eq!(loaded, order);
    }

    #[tokio::test]
    async fn test_update_quantities() {
        let service = service();
        let order = create_ana_order(&service).await;
        let item_id = order.line_items()[0].id();

        let order = service
            .update_quantities(
                UpdateQuantities::new(order.id())
                    .requester("Bruno")
                    .quantity(item_id, 2)
                    .quantity(LineItemId::new(), 7),
            )
            .await
            .unwrap();

        assert_eq!(order.requester(), "Bruno");
        assert_eq!(order.get_item(item_id).unwrap().quantity(), 2);
        assert_eq!(order.total(), Money::from_units(40));
    }

    #[tokio::test]
    async fn test_update_quantities_recaptures_price() {
        let service = service();
        let order = create_ana_order(&service).await;
        let item_id = order.line_items()[0].id();

        service
            .catalog()
            .upsert(Product::new(ProductId::new(1), "Widget", Money::from_units(25), 10))
            .await;

        let order = service
            .update_quantities(UpdateQuantities::new(order.id()).quantity(item_id, 2))
            .await
            .unwrap();
        assert_eq!(order.total(), Money::from_units(50));
    }

    #[tokio::test]
    async fn test_update_quantities_rejections_leave_order_unchanged() {
        let service = service();
        let order = create_ana_order(&service).await;
        let item_id = order.line_items()[0].id();

        let stock = service
            .update_quantities(UpdateQuantities::new(order.id()).quantity(item_id, 1000))
            .await
            .unwrap_err();
        assert_eq!(stock.kind(), ErrorKind::StockInsufficient);

        let zero = service
            .update_quantities(UpdateQuantities::new(order.id()).quantity(item_id, 0))
            .await
            .unwrap_err();
        assert!(matches!(
            zero,
            DomainError::Order(OrderError::InvalidQuantity { quantity: 0 })
        ));

        let blank = service
            .update_quantities(UpdateQuantities::new(order.id()).requester(""))
            .await
            .unwrap_err();
        assert_eq!(blank.kind(), ErrorKind::ValidationFailed);

        let loaded = service.get_order(order.id()).await.unwrap();
        assert_eq!(loaded, order);
    }

    #[tokio::test]
    async fn test_remove_item() {
        let service = service();
        let order = create_ana_order(&service).await;
        let order = service
            .add_item(AddItem::new(order.id(), ProductId::new(2), 2))
            .await
            .unwrap();
        let item_id = order.line_items()[0].id();

        let order = service
            .remove_item(RemoveItem::new(order.id(), item_id))
            .await
            .unwrap();
        assert_eq!(order.item_count(), 1);
        assert_eq!(order.total(), Money::from_units(10));

        let again = service
            .remove_item(RemoveItem::new(order.id(), item_id))
            .await
            .unwrap_err();
        assert_eq!(again.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_cancel_twice() {
        let service = service();
        let order = create_ana_order(&service).await;

        let cancelled = service
            .cancel_order(CancelOrder::new(order.id()))
            .await
            .unwrap();
        assert_eq!(cancelled.status(), OrderStatus::Cancelled);
        assert_eq!(cancelled.total(), order.total());

        let err = service
            .cancel_order(CancelOrder::new(order.id()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTransition);
        assert_eq!(
            service.get_order(order.id()).await.unwrap(),
            cancelled
        );
    }

    #[tokio::test]
    async fn test_finalize_decrements_stock() {
        let service = service();
        let order = create_ana_order(&service).await;

        let finalized = service
            .finalize_order(FinalizeOrder::new(order.id()))
            .await
            .unwrap();
        assert_eq!(finalized.status(), OrderStatus::Finalized);
        assert_eq!(service.catalog().stock_of(ProductId::new(1)).await, Some(5));

        let err = service
            .add_item(AddItem::new(order.id(), ProductId::new(2), 1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Order(OrderError::InvalidStateTransition {
                current_state: OrderStatus::Finalized,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_finalize_is_all_or_nothing() {
        let service = service();
        let order = service
            .create_order(CreateOrder::now(
                "Ana",
                vec![NewLineItem::new(ProductId::new(2), 10), NewLineItem::new(ProductId::new(1), 5)],
            ))
            .await
            .unwrap();

        service
            .catalog()
            .set_stock(ProductId::new(1), 4)
            .await
            .unwrap();

        let err = service
            .finalize_order(FinalizeOrder::new(order.id()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StockInsufficient);
        assert!(err.is_retryable());

        assert_eq!(service.catalog().stock_of(ProductId::new(2)).await, Some(100));
        assert_eq!(service.catalog().stock_of(ProductId::new(1)).await, Some(4));
        assert_eq!(
            service.get_order(order.id()).await.unwrap().status(),
            OrderStatus::Draft
        );
    }

    /// Store that refuses to persist finalized orders.
    #[derive(Clone, Default)]
    struct RefuseFinalizedStore {
        inner: InMemoryOrderStore,
    }

    #[async_trait]
    impl OrderStore for RefuseFinalizedStore {
        async fn load_order(&self, order_id: OrderId) -> order_store::Result<Option<OrderRecord>> {
            self.inner.load_order(order_id).await
        }

        async fn save_order(
            &self,
            order: &OrderRecord,
            options: SaveOptions,
        ) -> order_store::Result<Version> {
            if order.status == OrderStatus::Finalized {
                return Err(OrderStoreError::Corrupt {
                    order_id: order.id,
                    reason: "write refused".to_string(),
                });
            }
            self.inner.save_order(order, options).await
        }

        async fn delete_line_item(
            &self,
            order_id: OrderId,
            item_id: LineItemId,
            options: SaveOptions,
        ) -> order_store::Result<Version> {
            self.inner.delete_line_item(order_id, item_id, options).await
        }

        async fn list_orders(&self, query: OrderQuery) -> order_store::Result<Vec<OrderRecord>> {
            self.inner.list_orders(query).await
        }
    }

    #[tokio::test]
    async fn test_finalize_releases_stock_when_save_fails() {
        let service = OrderService::new(RefuseFinalizedStore::default(), catalog());
        let order = service
            .create_order(CreateOrder::now(
                "Ana",
                vec![NewLineItem::new(ProductId::new(1), 5), NewLineItem::new(ProductId::new(2), 3)],
            ))
            .await
            .unwrap();

        let err = service
            .finalize_order(FinalizeOrder::new(order.id()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Infrastructure);

        assert_eq!(service.catalog().stock_of(ProductId::new(1)).await, Some(10));
        assert_eq!(service.catalog().stock_of(ProductId::new(2)).await, Some(100));
        assert_eq!(
            service.get_order(order.id()).await.unwrap().status(),
            OrderStatus::Draft
        );
    }

    #[tokio::test]
    async fn test_missing_order() {
        let service = service();
        let err = service
            .finalize_order(FinalizeOrder::new(OrderId::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::OrderNotFound(_)));
    }

    #[tokio::test]
    async fn test_list_products_and_orders() {
        let service = service();
        create_ana_order(&service).await;

        let products = service.list_products().await.unwrap();
        assert_eq!(products.len(), 3);
        assert_eq!(products[0].id, ProductId::new(1));

        let drafts = service
            .list_orders(OrderQuery::new().status(OrderStatus::Draft))
            .await
            .unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].requester(), "Ana");
    }
}
