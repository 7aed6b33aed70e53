use serde::Serialize;

use crate::catalog::{Catalog, Provider};

/// Breakdown label for the selected procedure itself
pub const MAIN_SERVICE_LABEL: &str = "Main Service";

/// One itemized line of a price breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownLine {
    pub label: String,
    pub amount_usd: u64,
}

/// A provider annotated with the cost of the requested service mix.
///
/// Built fresh for every query; the catalog `Provider` record is never
/// mutated. Breakdown lines sum exactly to `total_cost_usd`.
#[derive(Debug, Clone, Serialize)]
pub struct PricedProvider {
    #[serde(flatten)]
    pub provider: Provider,
    pub total_cost_usd: u64,
    pub breakdown: Vec<BreakdownLine>,
}

/// Price one provider for the selected procedure plus add-ons.
///
/// Unlisted hospital/procedure pairs contribute zero; the breakdown starts
/// with the main service line followed by one line per add-on in selection
/// order, labeled with the add-on's display name.
pub fn price_provider(
    catalog: &Catalog,
    provider: &Provider,
    procedure_code: &str,
    addon_codes: &[String],
) -> PricedProvider {
    let main_cost = catalog.price_for(&provider.hospital_name, procedure_code);

    let mut total_cost = main_cost;
    let mut breakdown = vec![BreakdownLine {
        label: MAIN_SERVICE_LABEL.to_string(),
        amount_usd: main_cost,
    }];

    for code in addon_codes {
        let amount = catalog.price_for(&provider.hospital_name, code);
        total_cost += amount;
        breakdown.push(BreakdownLine {
            label: catalog.procedure_name_for(code).to_string(),
            amount_usd: amount,
        });
    }

    PricedProvider {
        provider: provider.clone(),
        total_cost_usd: total_cost,
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_named(catalog: &Catalog, hospital: &str) -> Provider {
        catalog
            .providers()
            .iter()
            .find(|p| p.hospital_name == hospital)
            .unwrap()
            .clone()
    }

    #[test]
    fn test_main_service_only() {
        let catalog = Catalog::builtin();
        let provider = provider_named(&catalog, "General Hospital");

        let priced = price_provider(&catalog, &provider, "45378", &[]);
        assert_eq!(priced.total_cost_usd, 800);
        assert_eq!(priced.breakdown.len(), 1);
        assert_eq!(priced.breakdown[0].label, MAIN_SERVICE_LABEL);
        assert_eq!(priced.breakdown[0].amount_usd, 800);
    }

    #[test]
    fn test_addon_costs_are_summed() {
        let catalog = Catalog::builtin();
        let provider = provider_named(&catalog, "General Hospital");

        let priced = price_provider(&catalog, &provider, "45378", &["00810".to_string()]);
        assert_eq!(priced.total_cost_usd, 1100);
        assert_eq!(priced.breakdown.len(), 2);
        assert_eq!(
            priced.breakdown[1].label,
            "Anesthesia for lower intestinal endoscopic procedures"
        );
        assert_eq!(priced.breakdown[1].amount_usd, 300);
    }

    #[test]
    fn test_breakdown_sums_to_total() {
        let catalog = Catalog::builtin();

        for provider in catalog.providers() {
            let priced = price_provider(
                &catalog,
                provider,
                "45378",
                &["00810".to_string(), "70450".to_string()],
            );
            let sum: u64 = priced.breakdown.iter().map(|line| line.amount_usd).sum();
            assert_eq!(sum, priced.total_cost_usd);
        }
    }

    #[test]
    fn test_unknown_procedure_prices_at_zero() {
        let catalog = Catalog::builtin();
        let provider = provider_named(&catalog, "City Clinic");

        let priced = price_provider(&catalog, &provider, "99999", &[]);
        assert_eq!(priced.total_cost_usd, 0);
        assert_eq!(
            priced.breakdown,
            vec![BreakdownLine {
                label: MAIN_SERVICE_LABEL.to_string(),
                amount_usd: 0,
            }]
        );
    }

    #[test]
    fn test_unlisted_hospital_prices_at_zero() {
        let catalog = Catalog::builtin();
        let mut provider = provider_named(&catalog, "City Clinic");
        provider.hospital_name = "Mercy West".to_string();

        let priced = price_provider(&catalog, &provider, "45378", &["00810".to_string()]);
        assert_eq!(priced.total_cost_usd, 0);
    }

    #[test]
    fn test_catalog_provider_is_not_mutated() {
        let catalog = Catalog::builtin();
        let before = catalog.providers().to_vec();

        let _ = price_provider(&catalog, &before[0], "45378", &["00810".to_string()]);

        assert_eq!(catalog.providers().len(), before.len());
        assert_eq!(
            catalog.providers()[0].hospital_name,
            before[0].hospital_name
        );
    }
}
