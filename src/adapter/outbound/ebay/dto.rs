//! Browse API `item_summary/search` response types.

use serde::Deserialize;

use crate::adapter::outbound::loose::opt_text;
use crate::domain::id::Source;
use crate::domain::listing::RawListing;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub item_summaries: Vec<ItemSummary>,
    /// URL of the next page, absent on the last page.
    pub next: Option<String>,
    pub total: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    #[serde(default, deserialize_with = "opt_text")]
    pub item_id: Option<String>,
    pub title: Option<String>,
    pub price: Option<Amount>,
    #[serde(default)]
    pub shipping_options: Vec<ShippingOption>,
    pub item_web_url: Option<String>,
    pub item_href: Option<String>,
    pub item_creation_date: Option<String>,
    #[serde(default)]
    pub categories: Vec<Category>,
    pub seller: Option<Seller>,
}

#[derive(Debug, Deserialize)]
pub struct Amount {
    #[serde(default, deserialize_with = "opt_text")]
    pub value: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingOption {
    pub shipping_cost: Option<Amount>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    #[serde(default, deserialize_with = "opt_text")]
    pub feedback_percentage: Option<String>,
}

impl From<ItemSummary> for RawListing {
    fn from(item: ItemSummary) -> Self {
        let (price, currency) = item
            .price
            .map_or((None, None), |amount| (amount.value, amount.currency));
        let shipping = item
            .shipping_options
            .into_iter()
            .next()
            .and_then(|option| option.shipping_cost)
            .and_then(|cost| cost.value);

        Self {
            external_id: item.item_id,
            title: item.title,
            price,
            currency,
            shipping,
            url: item.item_web_url.or(item.item_href),
            posted_at: item.item_creation_date,
            category: item
                .categories
                .into_iter()
                .find_map(|category| category.category_name),
            seller_feedback: item.seller.and_then(|seller| seller.feedback_percentage),
            ..RawListing::new(Source::Ebay)
        }
    }
}
