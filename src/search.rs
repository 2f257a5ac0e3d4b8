//! In-memory filtering and sorting over fully fetched lists.
//!
//! The backend hands over the whole table; every predicate is applied
//! conjunctively in one pass, then a fixed comparator orders the result.
//! There is no pagination and no index.

use crate::models::{Property, ServiceProvider};

/// Conjunctive filter over a property list. Empty sets and `None` bounds
/// mean "don't care".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyFilter {
    /// Match any of these locations (substring, case-insensitive).
    pub locations: Vec<String>,
    /// Minor-unit Pula bounds, inclusive.
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    /// Exact bedroom count.
    pub bedrooms: Option<u32>,
    pub property_types: Vec<String>,
    /// Every listed amenity must be present.
    pub amenities: Vec<String>,
    /// Free-text match over title and location.
    pub query: Option<String>,
}

impl PropertyFilter {
    pub fn matches(&self, property: &Property) -> bool {
        if !self.locations.is_empty() {
            let location = property.location.to_lowercase();
            if !self
                .locations
                .iter()
                .any(|l| location.contains(&l.to_lowercase()))
            {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if property.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if property.price > max {
                return false;
            }
        }
        if let Some(bedrooms) = self.bedrooms {
            if property.bedrooms != bedrooms {
                return false;
            }
        }
        if !self.property_types.is_empty()
            && !self
                .property_types
                .iter()
                .any(|t| t.eq_ignore_ascii_case(&property.property_type))
        {
            return false;
        }
        if !self.amenities.iter().all(|wanted| {
            property
                .amenities
                .iter()
                .any(|a| a.eq_ignore_ascii_case(wanted))
        }) {
            return false;
        }
        if let Some(query) = &self.query {
            let query = query.to_lowercase();
            if !query.is_empty()
                && !property.title.to_lowercase().contains(&query)
                && !property.location.to_lowercase().contains(&query)
            {
                return false;
            }
        }
        true
    }

    /// Single pass over the list; the input is left untouched.
    pub fn apply(&self, properties: &[Property]) -> Vec<Property> {
        properties
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect()
    }
}

/// The fixed comparator set the sort dropdown offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    RatingDesc,
    ReviewsDesc,
    PriceLow,
    PriceHigh,
}

impl SortOrder {
    /// Dropdown values as the UI submits them.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "rating" => Some(Self::RatingDesc),
            "reviews" => Some(Self::ReviewsDesc),
            "price-low" => Some(Self::PriceLow),
            "price-high" => Some(Self::PriceHigh),
            _ => None,
        }
    }
}

pub fn sort_properties(properties: &mut [Property], order: SortOrder) {
    match order {
        SortOrder::RatingDesc => {
            properties.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        }
        SortOrder::ReviewsDesc => {
            properties.sort_by(|a, b| b.review_count.cmp(&a.review_count));
        }
        SortOrder::PriceLow => properties.sort_by_key(|p| p.price),
        SortOrder::PriceHigh => properties.sort_by_key(|p| std::cmp::Reverse(p.price)),
    }
}

/// Filter for the services marketplace; same conjunctive shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderFilter {
    pub categories: Vec<String>,
    pub query: Option<String>,
}

impl ProviderFilter {
    pub fn matches(&self, provider: &ServiceProvider) -> bool {
        if !self.categories.is_empty()
            && !self
                .categories
                .iter()
                .any(|c| c.eq_ignore_ascii_case(&provider.category))
        {
            return false;
        }
        if let Some(query) = &self.query {
            let query = query.to_lowercase();
            if !query.is_empty()
                && !provider.name.to_lowercase().contains(&query)
                && !provider.description.to_lowercase().contains(&query)
            {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, providers: &[ServiceProvider]) -> Vec<ServiceProvider> {
        providers
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect()
    }
}

pub fn sort_providers(providers: &mut [ServiceProvider], order: SortOrder) {
    match order {
        SortOrder::ReviewsDesc => {
            providers.sort_by(|a, b| b.review_count.cmp(&a.review_count));
        }
        // Price sorting does not apply to providers (the price range is a
        // display string), so anything else falls back to rating.
        _ => providers.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
    }
}
