use serde::{Deserialize, Serialize};

use super::errors::OrderError;

// ============================================================================
// Cost Engine - customer cost and business revenue for one product
// ============================================================================
//
// Pure arithmetic, no rounding. Presentation rounds to 2 decimals.
//
//   service_fee     = price * 0.12
//   shipping_cost   = 25 + weight_kg * 8
//   customs_fees    = max(0, price - 50) * 0.20
//   affiliate       = price * 0.08          (not charged to the customer)
//   total           = price + service_fee + shipping_cost + customs_fees
//
//   shipping_margin = shipping_cost - actual_shipping_cost (default 15)
//   total_profit    = affiliate + service_fee + shipping_margin
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub product_price: f64,
    pub service_fee: f64,
    pub shipping_cost: f64,
    pub customs_fees: f64,
    pub affiliate_commission: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueBreakdown {
    pub affiliate_commission: f64,
    pub service_fee: f64,
    pub shipping_margin: f64,
    pub total_profit: f64,
}

impl CostBreakdown {
    /// Every field must be finite and non-negative. A non-finite amount
    /// serializes as `null` and would make the stored collection unreadable.
    pub fn validate(&self) -> Result<(), OrderError> {
        OrderError::check_amount("product price", self.product_price)?;
        OrderError::check_amount("service fee", self.service_fee)?;
        OrderError::check_amount("shipping cost", self.shipping_cost)?;
        OrderError::check_amount("customs fees", self.customs_fees)?;
        OrderError::check_amount("affiliate commission", self.affiliate_commission)?;
        OrderError::check_amount("total", self.total)?;
        Ok(())
    }
}

impl RevenueBreakdown {
    /// Every field must be finite; the shipping margin may go negative.
    pub fn validate(&self) -> Result<(), OrderError> {
        OrderError::check_finite("affiliate commission", self.affiliate_commission)?;
        OrderError::check_finite("service fee", self.service_fee)?;
        OrderError::check_finite("shipping margin", self.shipping_margin)?;
        OrderError::check_finite("total profit", self.total_profit)?;
        Ok(())
    }
}

/// Rates and fixed amounts behind the breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingPolicy {
    pub service_fee_rate: f64,
    pub base_shipping: f64,
    pub shipping_per_kg: f64,
    /// Prices at or below this pay no customs.
    pub customs_threshold: f64,
    pub customs_rate: f64,
    pub affiliate_rate: f64,
    /// What the carrier actually charges us per package.
    pub actual_shipping_cost: f64,
    pub default_weight_kg: f64,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            service_fee_rate: 0.12,
            base_shipping: 25.0,
            shipping_per_kg: 8.0,
            customs_threshold: 50.0,
            customs_rate: 0.20,
            affiliate_rate: 0.08,
            actual_shipping_cost: 15.0,
            default_weight_kg: 1.0,
        }
    }
}

impl PricingPolicy {
    /// Customer-facing cost for a product. `weight_kg` falls back to the
    /// policy default when `None`.
    pub fn cost_breakdown(
        &self,
        product_price: f64,
        weight_kg: Option<f64>,
    ) -> Result<CostBreakdown, OrderError> {
        let product_price = OrderError::check_amount("product price", product_price)?;
        let weight_kg = OrderError::check_amount("weight", weight_kg.unwrap_or(self.default_weight_kg))?;

        let service_fee = product_price * self.service_fee_rate;
        let shipping_cost = self.base_shipping + weight_kg * self.shipping_per_kg;
        let customs_fees = if product_price > self.customs_threshold {
            (product_price - self.customs_threshold) * self.customs_rate
        } else {
            0.0
        };
        let affiliate_commission = product_price * self.affiliate_rate;

        let cost = CostBreakdown {
            product_price,
            service_fee,
            shipping_cost,
            customs_fees,
            affiliate_commission,
            total: product_price + service_fee + shipping_cost + customs_fees,
        };
        cost.validate()?;
        Ok(cost)
    }

    /// Business-side revenue using the policy's actual shipping cost.
    pub fn revenue_breakdown(&self, cost: &CostBreakdown) -> Result<RevenueBreakdown, OrderError> {
        revenue_with_shipping(cost, self.actual_shipping_cost)
    }
}

/// Cost breakdown with the default rates.
pub fn calculate_cost_breakdown(
    product_price: f64,
    weight_kg: Option<f64>,
) -> Result<CostBreakdown, OrderError> {
    PricingPolicy::default().cost_breakdown(product_price, weight_kg)
}

/// Revenue breakdown; `actual_shipping_cost` defaults to 15.
pub fn calculate_revenue_breakdown(
    cost: &CostBreakdown,
    actual_shipping_cost: Option<f64>,
) -> Result<RevenueBreakdown, OrderError> {
    let actual = actual_shipping_cost.unwrap_or(PricingPolicy::default().actual_shipping_cost);
    revenue_with_shipping(cost, actual)
}

fn revenue_with_shipping(
    cost: &CostBreakdown,
    actual_shipping_cost: f64,
) -> Result<RevenueBreakdown, OrderError> {
    let shipping_margin = cost.shipping_cost - actual_shipping_cost;

    let revenue = RevenueBreakdown {
        affiliate_commission: cost.affiliate_commission,
        service_fee: cost.service_fee,
        shipping_margin,
        total_profit: cost.affiliate_commission + cost.service_fee + shipping_margin,
    };
    revenue.validate()?;
    Ok(revenue)
}

// ============================================================================
// Unit Tests
// ============================================================================
