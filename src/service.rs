use serde::Serialize;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::order::{
    CostBreakdown, NewOrder, Order, OrderCommandHandler, OrderError, OrderStatus, PricingPolicy,
    RevenueBreakdown, ShippingAddress,
};
use crate::domain::product::{NewProduct, Product};
use crate::infra::{Clock, IdGenerator, RandomIds, SystemClock};
use crate::metrics::Metrics;
use crate::repository::{ActivityEntry, ActivityLog, OrderChange, OrderRepository, ProductRepository};
use crate::storage::{KeyValueStore, StorageError};

// ============================================================================
// Order Service - the entry point callers (UI, demo binary) use
// ============================================================================
//
// Wires pricing, the product catalog, the order repository and the command
// handler over one key/value store.
//
// ============================================================================

/// Customer cost and business revenue for one product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub cost: CostBreakdown,
    pub revenue: RevenueBreakdown,
}

/// Totals across every stored order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueSummary {
    pub order_count: usize,
    pub completed_count: usize,
    /// Sum of what customers pay.
    pub gross_sales: f64,
    pub total_profit: f64,
}

/// Outcome of one simulation tick.
#[derive(Debug, Default)]
pub struct TickReport {
    /// Ids of orders that moved one stage.
    pub advanced: Vec<String>,
    /// Orders that could not be advanced, with the reason.
    pub failed: Vec<(String, OrderError)>,
}

pub struct OrderService {
    orders: Arc<OrderRepository>,
    products: Arc<ProductRepository>,
    activity: Arc<ActivityLog>,
    commands: OrderCommandHandler,
    pricing: PricingPolicy,
    metrics: Option<Arc<Metrics>>,
}

impl OrderService {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        namespace: &str,
        pricing: PricingPolicy,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let orders = Arc::new(OrderRepository::new(store.clone(), namespace, clock.clone(), ids));
        let products = Arc::new(ProductRepository::new(store.clone(), namespace, clock.clone()));
        let activity = Arc::new(ActivityLog::new(store, namespace));
        let commands = OrderCommandHandler::new(orders.clone(), activity.clone(), clock);

        Self {
            orders,
            products,
            activity,
            commands,
            pricing,
            metrics: None,
        }
    }

    /// Open the configured store with the wall clock and random ids.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StorageError> {
        let store = config.storage.open().await?;
        Ok(Self::new(
            store,
            &config.storage.namespace,
            config.pricing.clone(),
            Arc::new(SystemClock),
            Arc::new(RandomIds),
        ))
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.commands = self.commands.with_metrics(metrics.clone());
        self.metrics = Some(metrics);
        self
    }

    pub fn pricing(&self) -> &PricingPolicy {
        &self.pricing
    }

    // ------------------------------------------------------------------------
    // Pricing
    // ------------------------------------------------------------------------

    pub fn quote(&self, product_price: f64, weight_kg: Option<f64>) -> Result<Quote, OrderError> {
        let cost = self.pricing.cost_breakdown(product_price, weight_kg)?;
        let revenue = self.pricing.revenue_breakdown(&cost)?;
        Ok(Quote { cost, revenue })
    }

    pub async fn quote_product(&self, product_id: &str) -> Result<Quote, OrderError> {
        let product = self.products.get_product(product_id).await?;
        self.quote(product.price, Some(product.effective_weight(self.pricing.default_weight_kg)))
    }

    // ------------------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------------------

    pub async fn add_product(&self, product: NewProduct) -> Result<Product, OrderError> {
        self.products.add_product(product).await
    }

    pub async fn get_product(&self, product_id: &str) -> Result<Product, OrderError> {
        self.products.get_product(product_id).await
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, OrderError> {
        self.products.list_products().await
    }

    pub async fn remove_product(&self, product_id: &str) -> Result<bool, OrderError> {
        self.products.remove_product(product_id).await
    }

    // ------------------------------------------------------------------------
    // Orders
    // ------------------------------------------------------------------------

    /// Create an order from caller-supplied breakdowns.
    pub async fn create_order(&self, draft: NewOrder) -> Result<Order, OrderError> {
        let order = self.commands.create(draft).await?;
        self.refresh_active_gauge().await;
        Ok(order)
    }

    /// Price a catalog product and open an order for it.
    pub async fn place_order(
        &self,
        product_id: &str,
        customer_id: &str,
        customer_email: &str,
        shipping_address: ShippingAddress,
    ) -> Result<Order, OrderError> {
        let product = self.products.get_product(product_id).await?;
        let quote = self.quote(
            product.price,
            Some(product.effective_weight(self.pricing.default_weight_kg)),
        )?;

        self.create_order(NewOrder {
            product_id: product.id,
            customer_id: customer_id.to_string(),
            customer_email: customer_email.to_string(),
            shipping_address,
            cost_breakdown: quote.cost,
            revenue_breakdown: quote.revenue,
        })
        .await
    }

    pub async fn get_order(&self, order_id: &str) -> Result<Order, OrderError> {
        self.orders.get_order(order_id).await
    }

    pub async fn get_order_by_tracking(&self, tracking_number: &str) -> Result<Order, OrderError> {
        self.orders.get_order_by_tracking(tracking_number).await
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, OrderError> {
        self.orders.list_orders().await
    }

    pub async fn orders_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, OrderError> {
        self.orders.orders_for_customer(customer_id).await
    }

    pub async fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<OrderChange, OrderError> {
        let change = self.commands.update_order_status(order_id, status).await?;
        self.refresh_active_gauge().await;
        Ok(change)
    }

    pub async fn progress_order(&self, order_id: &str) -> Result<OrderChange, OrderError> {
        let change = self.commands.progress_order(order_id).await?;
        self.refresh_active_gauge().await;
        Ok(change)
    }

    /// Advance every order that is not completed by one step.
    ///
    /// A failure on one order is logged and reported; the remaining orders
    /// are still advanced.
    pub async fn tick(&self) -> Result<TickReport, OrderError> {
        let mut report = TickReport::default();
        for order in self.orders.active_orders().await? {
            match self.commands.progress_order(&order.id).await {
                Ok(change) if change.changed() => report.advanced.push(change.order.id),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(order_id = %order.id, error = %e, "Could not advance order");
                    report.failed.push((order.id, e));
                }
            }
        }

        tracing::info!(
            advanced = report.advanced.len(),
            failed = report.failed.len(),
            "Simulation tick"
        );
        self.refresh_active_gauge().await;
        Ok(report)
    }

    pub async fn delete_order(&self, order_id: &str) -> Result<bool, OrderError> {
        let removed = self.orders.delete_order(order_id).await?;
        if removed {
            if let Some(metrics) = &self.metrics {
                metrics.orders_deleted_total.inc();
            }
            self.refresh_active_gauge().await;
        }
        Ok(removed)
    }

    /// Remove every order and the activity that refers to them.
    pub async fn clear_orders(&self) -> Result<(), OrderError> {
        self.orders.clear_orders().await?;
        self.activity.clear().await?;
        self.refresh_active_gauge().await;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Reporting
    // ------------------------------------------------------------------------

    pub async fn revenue_summary(&self) -> Result<RevenueSummary, OrderError> {
        let orders = self.orders.list_orders().await?;

        Ok(orders.iter().fold(RevenueSummary::default(), |mut summary, order| {
            summary.order_count += 1;
            if order.is_completed() {
                summary.completed_count += 1;
            }
            summary.gross_sales += order.cost_breakdown.total;
            summary.total_profit += order.revenue_breakdown.total_profit;
            summary
        }))
    }

    pub async fn activity_for(&self, order_id: &str) -> Result<Vec<ActivityEntry>, OrderError> {
        Ok(self.activity.for_order(order_id).await?)
    }

    pub async fn customer_activity(&self, customer_id: &str) -> Result<Vec<ActivityEntry>, OrderError> {
        Ok(self.activity.for_customer(customer_id).await?)
    }

    async fn refresh_active_gauge(&self) {
        let Some(metrics) = &self.metrics else {
            return;
        };
        match self.orders.list_orders().await {
            Ok(orders) => metrics.set_active_orders(&orders),
            Err(e) => tracing::warn!(error = %e, "Could not refresh active order gauge"),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
