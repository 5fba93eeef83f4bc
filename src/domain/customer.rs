//! Customer (client account) with its contractual fee schedule.

use crate::domain::{ChannelType, CustomerKey, Decimal, FeeSchedule};
use serde::{Deserialize, Serialize};

/// One confirmed client and the fee percentages contracted with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub key: CustomerKey,
    pub channel: ChannelType,
    pub fees: FeeSchedule,
}

impl Customer {
    /// A freshly registered customer: every fee label its channel knows,
    /// all rates zero, to be filled in once the contract is negotiated.
    pub fn new_on_channel(key: CustomerKey, channel: ChannelType) -> Self {
        let fees = channel
            .all_fee_labels()
            .into_iter()
            .map(|label| (label.to_string(), Decimal::zero()))
            .collect();
        Customer {
            key,
            channel,
            fees,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_customer_has_zeroed_channel_fees() {
        let customer = Customer::new_on_channel(
            CustomerKey::new("dawn-catering"),
            ChannelType::Catering,
        );
        assert_eq!(customer.fees.len(), 5);
        assert_eq!(customer.fees.get("picking_fee"), Some(Decimal::zero()));
        assert_eq!(customer.fees.get("vendor_fee"), Some(Decimal::zero()));
        assert_eq!(customer.fees.total_percent(), Decimal::zero());
    }
}
