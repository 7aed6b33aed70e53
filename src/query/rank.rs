use std::cmp::Ordering;

use crate::query::pricing::PricedProvider;

/// Order priced providers by the composite ranking key:
/// total cost ascending, then distance ascending, then hospital rating
/// descending, then doctor rating descending.
///
/// The sort is stable, so providers with fully equal keys keep their
/// original catalog order.
pub fn rank_providers(mut priced: Vec<PricedProvider>) -> Vec<PricedProvider> {
    priced.sort_by(compare_rank);
    priced
}

fn compare_rank(a: &PricedProvider, b: &PricedProvider) -> Ordering {
    a.total_cost_usd
        .cmp(&b.total_cost_usd)
        .then_with(|| {
            a.provider
                .distance_miles
                .total_cmp(&b.provider.distance_miles)
        })
        .then_with(|| {
            b.provider
                .hospital_rating
                .total_cmp(&a.provider.hospital_rating)
        })
        .then_with(|| {
            b.provider
                .doctor_rating
                .total_cmp(&a.provider.doctor_rating)
        })
}
