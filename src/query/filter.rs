use crate::catalog::Provider;

/// Filter predicate set for a single query
#[derive(Debug, Clone)]
pub struct FilterCriteria {
    pub radius_miles: f64,
    pub require_hospital_rating: bool,
    pub require_doctor_rating: bool,
    /// Ratings must be strictly greater than this when the matching toggle is set
    pub rating_threshold: f32,
}

/// Select providers matching the criteria.
///
/// Predicates are conjunctive and applied in a fixed order: distance bound
/// first, then the optional hospital rating floor, then the optional doctor
/// rating floor. An empty result is a valid outcome, not an error.
pub fn filter_providers<'a>(
    providers: &'a [Provider],
    criteria: &FilterCriteria,
) -> Vec<&'a Provider> {
    let mut matches: Vec<&Provider> = providers
        .iter()
        .filter(|p| p.distance_miles <= criteria.radius_miles)
        .collect();

    if criteria.require_hospital_rating {
        matches.retain(|p| p.hospital_rating > criteria.rating_threshold);
    }

    if criteria.require_doctor_rating {
        matches.retain(|p| p.doctor_rating > criteria.rating_threshold);
    }

    matches
}
