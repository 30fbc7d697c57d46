use crate::error::{ReconcileError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Base amount used when a request carries no usable price.
pub const DEFAULT_BASE_AMOUNT: u64 = 25_000;

/// Rates applied on top of the creator's price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeSchedule {
    pub platform_fee_rate: Decimal,
    pub gst_rate: Decimal,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            platform_fee_rate: dec!(0.10),
            gst_rate: dec!(0.18),
        }
    }
}

/// Price breakdown in major currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceQuote {
    pub base: u64,
    pub platform_fee: u64,
    pub gst: u64,
    pub total: u64,
}

impl FeeSchedule {
    /// Platform fee is charged on the base; GST on base plus fee.
    pub fn quote(&self, base: u64) -> Result<PriceQuote> {
        let platform_fee = round_units(Decimal::from(base) * self.platform_fee_rate)?;
        let gst = round_units((Decimal::from(base) + Decimal::from(platform_fee)) * self.gst_rate)?;
        let total = base
            .checked_add(platform_fee)
            .and_then(|sum| sum.checked_add(gst))
            .ok_or_else(|| ReconcileError::Validation("Amount out of range".to_string()))?;

        Ok(PriceQuote {
            base,
            platform_fee,
            gst,
            total,
        })
    }
}

fn round_units(value: Decimal) -> Result<u64> {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or_else(|| ReconcileError::Validation(format!("Amount out of range: {}", value)))
}

/// A price as it appears on a service request: a number, or display text like `"₹50,000"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PriceField {
    Number(f64),
    Text(String),
}

impl PriceField {
    /// Positive integral value, if one can be read.
    pub fn amount(&self) -> Option<u64> {
        match self {
            PriceField::Number(value) if value.is_finite() && *value >= 1.0 => {
                Some(value.round() as u64)
            }
            PriceField::Number(_) => None,
            PriceField::Text(text) => {
                let cleaned: String = text
                    .chars()
                    .filter(|c| !matches!(c, '₹' | ',') && !c.is_whitespace())
                    .collect();
                let digits: String = cleaned
                    .chars()
                    .skip_while(|c| !c.is_ascii_digit())
                    .take_while(|c| c.is_ascii_digit())
                    .collect();
                digits.parse::<u64>().ok().filter(|value| *value > 0)
            }
        }
    }
}

/// Every place a service request may carry its price, highest priority first.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceSources {
    #[serde(default)]
    pub final_offer: Option<PriceField>,
    #[serde(default)]
    pub current_offer: Option<PriceField>,
    #[serde(default)]
    pub package_price: Option<PriceField>,
    #[serde(default)]
    pub budget: Option<PriceField>,
    #[serde(default)]
    pub starting_price: Option<PriceField>,
}

impl PriceSources {
    pub fn resolve_base_amount(&self) -> u64 {
        [
            &self.final_offer,
            &self.current_offer,
            &self.package_price,
            &self.budget,
            &self.starting_price,
        ]
        .into_iter()
        .flatten()
        .find_map(PriceField::amount)
        .unwrap_or(DEFAULT_BASE_AMOUNT)
    }
}

/// An offer negotiated on a service request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Offer {
    #[serde(default)]
    pub price: Option<PriceField>,
    #[serde(default)]
    pub deliverables: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Package {
    #[serde(default)]
    pub price: Option<PriceField>,
}

/// The service request a payment is made for, as the marketplace returns it.
///
/// Both snake_case and camelCase field names are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceRequest {
    #[serde(default, alias = "creatorId")]
    pub creator_id: Option<String>,
    #[serde(default, alias = "creatorName")]
    pub creator_name: Option<String>,
    #[serde(default, alias = "projectType", alias = "category")]
    pub project_type: Option<String>,
    #[serde(default, alias = "eventDate")]
    pub event_date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, alias = "finalOffer")]
    pub final_offer: Option<Offer>,
    #[serde(default, alias = "currentOffer")]
    pub current_offer: Option<Offer>,
    #[serde(default)]
    pub package: Option<Package>,
    #[serde(default)]
    pub budget: Option<PriceField>,
    #[serde(default, alias = "creatorStartingPrice")]
    pub creator_starting_price: Option<PriceField>,
}

impl ServiceRequest {
    pub fn price_sources(&self) -> PriceSources {
        let offer_price = |offer: &Option<Offer>| offer.as_ref().and_then(|o| o.price.clone());
        PriceSources {
            final_offer: offer_price(&self.final_offer),
            current_offer: offer_price(&self.current_offer),
            package_price: self.package.as_ref().and_then(|p| p.price.clone()),
            budget: self.budget.clone(),
            starting_price: self.creator_starting_price.clone(),
        }
    }

    fn deliverables(&self) -> Option<&str> {
        [&self.final_offer, &self.current_offer]
            .into_iter()
            .flatten()
            .find_map(|offer| non_empty(&offer.deliverables))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// The booking being paid for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDetails {
    pub creator_id: String,
    pub creator_name: String,
    pub project_type: String,
    pub event_date: String,
    pub location: String,
    pub deliverables: String,
    pub quote: PriceQuote,
}

impl OrderDetails {
    pub fn new(creator_id: impl Into<String>, quote: PriceQuote) -> Self {
        Self {
            creator_id: creator_id.into(),
            creator_name: "Creator".to_string(),
            project_type: "Photography".to_string(),
            event_date: "TBD".to_string(),
            location: "TBD".to_string(),
            deliverables: "As discussed".to_string(),
            quote,
        }
    }

    /// Builds the order from a service request, pricing its resolved base amount.
    pub fn from_request(request: &ServiceRequest, fees: &FeeSchedule) -> Result<Self> {
        let quote = fees.quote(request.price_sources().resolve_base_amount())?;
        let mut order = Self::new(non_empty(&request.creator_id).unwrap_or_default(), quote);
        if let Some(name) = non_empty(&request.creator_name) {
            order.creator_name = name.to_string();
        }
        if let Some(project_type) = non_empty(&request.project_type) {
            order.project_type = project_type.to_string();
        }
        if let Some(event_date) = non_empty(&request.event_date) {
            order.event_date = event_date.to_string();
        }
        if let Some(location) = non_empty(&request.location) {
            order.location = location.to_string();
        }
        if let Some(deliverables) = request.deliverables() {
            order.deliverables = deliverables.to_string();
        }
        Ok(order)
    }

    pub fn with_quote(mut self, quote: PriceQuote) -> Self {
        self.quote = quote;
        self
    }

    pub fn with_creator_name(mut self, name: impl Into<String>) -> Self {
        self.creator_name = name.into();
        self
    }

    pub fn with_project_type(mut self, project_type: impl Into<String>) -> Self {
        self.project_type = project_type.into();
        self
    }

    pub fn description(&self) -> String {
        format!(
            "Booking for {} with {}",
            self.project_type, self.creator_name
        )
    }
}
