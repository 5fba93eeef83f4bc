//! Domain primitives: ProductKey, CustomerKey, ChannelType.

use serde::{Deserialize, Serialize};

/// Stable identifier for a product in the master catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductKey(pub String);

impl ProductKey {
    /// Create a ProductKey from a string.
    pub fn new(key: impl Into<String>) -> Self {
        ProductKey(key.into())
    }

    /// Get the key as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identifier for a customer (client/channel account).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CustomerKey(pub String);

impl CustomerKey {
    /// Create a CustomerKey from a string.
    pub fn new(key: impl Into<String>) -> Self {
        CustomerKey(key.into())
    }

    /// Get the key as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CustomerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fee labels every channel carries regardless of its logistics shape.
pub const COMMON_FEE_LABELS: &[&str] = &["vendor_fee", "discount"];

/// Distribution channel. Each channel has its own characteristic set of
/// contractual fee items on top of [`COMMON_FEE_LABELS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    /// Direct truck or parcel into the buyer's own warehouse.
    Wholesale,
    /// Marketplace fresh program: inbound into the operator's fulfillment center.
    MarketplaceFresh,
    /// Grocery chain: 3PL into regional warehouses, then store delivery.
    RetailChain,
    /// Franchise head office with a designated receiving warehouse.
    Franchise,
    /// Catering company with compound 3PL handling fees.
    Catering,
    /// Anything that does not fit the named channels.
    Other,
}

impl ChannelType {
    /// Short description of the delivery process for this channel.
    pub fn description(&self) -> &'static str {
        match self {
            ChannelType::Wholesale => "truck/parcel into buyer warehouse",
            ChannelType::MarketplaceFresh => "truck into marketplace fulfillment center",
            ChannelType::RetailChain => "3PL to regional warehouses, then stores",
            ChannelType::Franchise => "truck into designated franchise warehouse",
            ChannelType::Catering => "3PL to regional warehouses, compound fees",
            ChannelType::Other => "default delivery process",
        }
    }

    /// Channel-specific fee labels, excluding [`COMMON_FEE_LABELS`].
    pub fn fee_labels(&self) -> &'static [&'static str] {
        match self {
            ChannelType::Wholesale => &["freight"],
            ChannelType::MarketplaceFresh => &["inbound_freight", "marketplace_commission"],
            ChannelType::RetailChain => &[
                "third_party_logistics_base",
                "regional_trunk_fee",
                "store_delivery",
            ],
            ChannelType::Franchise => &["designated_warehouse_inbound"],
            ChannelType::Catering => &[
                "third_party_logistics_base",
                "picking_fee",
                "zone_sorting_fee",
            ],
            ChannelType::Other => &["base_logistics"],
        }
    }

    /// All fee labels a customer on this channel starts out with.
    pub fn all_fee_labels(&self) -> Vec<&'static str> {
        COMMON_FEE_LABELS
            .iter()
            .chain(self.fee_labels().iter())
            .copied()
            .collect()
    }

    /// Parse a channel from its wire name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "wholesale" => Some(ChannelType::Wholesale),
            "marketplace_fresh" => Some(ChannelType::MarketplaceFresh),
            "retail_chain" => Some(ChannelType::RetailChain),
            "franchise" => Some(ChannelType::Franchise),
            "catering" => Some(ChannelType::Catering),
            "other" => Some(ChannelType::Other),
            _ => None,
        }
    }

    /// Wire name of the channel.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelType::Wholesale => "wholesale",
            ChannelType::MarketplaceFresh => "marketplace_fresh",
            ChannelType::RetailChain => "retail_chain",
            ChannelType::Franchise => "franchise",
            ChannelType::Catering => "catering",
            ChannelType::Other => "other",
        }
    }
}

impl std::fmt::Display for ChannelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
