/// Integration tests for the filter -> price -> rank pipeline
use care_compare::catalog::{Catalog, UNKNOWN_PROCEDURE};
use care_compare::config::Config;
use care_compare::query::{run_query, DisplayMode, QueryRequest, MAIN_SERVICE_LABEL};

fn request(procedure: &str, radius: u32) -> QueryRequest {
    QueryRequest {
        procedure_code: procedure.to_string(),
        zip_code: None,
        radius_miles: radius,
        require_hospital_rating: false,
        require_doctor_rating: false,
        addon_codes: vec![],
        display: DisplayMode::Table,
    }
}

#[test]
fn colonoscopy_with_anesthesia_addon_prices_main_plus_addon() {
    let catalog = Catalog::builtin();
    let config = Config::default();

    let mut req = request("45378", 20);
    req.addon_codes = vec!["00810".to_string()];

    let response = run_query(&catalog, &config, &req).unwrap();
    assert_eq!(response.procedure_name, "Colonoscopy");
    assert_eq!(response.providers.len(), 3);

    for priced in &response.providers {
        let hospital = &priced.provider.hospital_name;
        let expected =
            catalog.price_for(hospital, "45378") + catalog.price_for(hospital, "00810");
        assert_eq!(priced.total_cost_usd, expected);
    }

    let general = response
        .providers
        .iter()
        .find(|p| p.provider.hospital_name == "General Hospital")
        .unwrap();
    assert_eq!(general.total_cost_usd, 1100);
}

#[test]
fn unknown_procedure_yields_sentinel_and_zero_costs() {
    let catalog = Catalog::builtin();
    let config = Config::default();

    let response = run_query(&catalog, &config, &request("99999", 50)).unwrap();

    assert_eq!(response.procedure_name, UNKNOWN_PROCEDURE);
    for priced in &response.providers {
        assert_eq!(priced.total_cost_usd, 0);
        assert_eq!(priced.breakdown.len(), 1);
        assert_eq!(priced.breakdown[0].label, MAIN_SERVICE_LABEL);
        assert_eq!(priced.breakdown[0].amount_usd, 0);
    }
}

#[test]
fn tight_radius_yields_empty_result_not_error() {
    let catalog = Catalog::builtin();
    let config = Config::default();

    // All built-in providers sit at >= 5 miles
    let response = run_query(&catalog, &config, &request("45378", 1)).unwrap();
    assert!(response.providers.is_empty());
}

#[test]
fn all_results_respect_the_radius_bound() {
    let catalog = Catalog::builtin();
    let config = Config::default();

    for radius in [1, 5, 10, 15, 50] {
        let response = run_query(&catalog, &config, &request("45378", radius)).unwrap();
        for priced in &response.providers {
            assert!(priced.provider.distance_miles <= f64::from(radius));
        }
    }
}

#[test]
fn rating_flags_exclude_providers_at_or_below_threshold() {
    let catalog = Catalog::builtin();
    let config = Config::default();

    let mut req = request("45378", 50);
    req.require_hospital_rating = true;

    let response = run_query(&catalog, &config, &req).unwrap();
    assert!(!response.providers.is_empty());
    for priced in &response.providers {
        assert!(priced.provider.hospital_rating > 4.0);
    }
    // Health Center (rating exactly 4.0) must be excluded
    assert!(!response
        .providers
        .iter()
        .any(|p| p.provider.hospital_name == "Health Center"));

    let mut req = request("45378", 50);
    req.require_doctor_rating = true;

    let response = run_query(&catalog, &config, &req).unwrap();
    for priced in &response.providers {
        assert!(priced.provider.doctor_rating > 4.0);
    }
}

#[test]
fn breakdown_always_sums_to_total() {
    let catalog = Catalog::builtin();
    let config = Config::default();

    let cases = [
        ("45378", vec!["00810".to_string()]),
        ("99215", vec!["70450".to_string()]),
        ("73721", vec!["70450".to_string()]),
        ("99213", vec![]),
        ("99999", vec![]),
    ];

    for (procedure, addons) in cases {
        let mut req = request(procedure, 50);
        req.addon_codes = addons;

        let response = run_query(&catalog, &config, &req).unwrap();
        for priced in &response.providers {
            let sum: u64 = priced.breakdown.iter().map(|line| line.amount_usd).sum();
            assert_eq!(sum, priced.total_cost_usd);
        }
    }
}

#[test]
fn ranking_keys_are_applied_in_order() {
    let catalog = Catalog::builtin();
    let config = Config::default();

    let response = run_query(&catalog, &config, &request("45378", 50)).unwrap();

    for pair in response.providers.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.total_cost_usd <= b.total_cost_usd);
        if a.total_cost_usd == b.total_cost_usd {
            assert!(a.provider.distance_miles <= b.provider.distance_miles);
            if a.provider.distance_miles == b.provider.distance_miles {
                assert!(a.provider.hospital_rating >= b.provider.hospital_rating);
                if a.provider.hospital_rating == b.provider.hospital_rating {
                    assert!(a.provider.doctor_rating >= b.provider.doctor_rating);
                }
            }
        }
    }

    // With the built-in price table, City Clinic is cheapest for 45378
    assert_eq!(response.providers[0].provider.hospital_name, "City Clinic");
}

#[test]
fn repeated_queries_are_stateless() {
    let catalog = Catalog::builtin();
    let config = Config::default();

    let mut req = request("45378", 20);
    req.addon_codes = vec!["00810".to_string()];

    let first = run_query(&catalog, &config, &req).unwrap();
    let second = run_query(&catalog, &config, &req).unwrap();

    // Fresh annotations each time; same totals and order
    assert_ne!(first.query_id, second.query_id);
    let totals = |r: &care_compare::query::QueryResponse| -> Vec<(String, u64)> {
        r.providers
            .iter()
            .map(|p| (p.provider.hospital_name.clone(), p.total_cost_usd))
            .collect()
    };
    assert_eq!(totals(&first), totals(&second));
}

#[test]
fn catalog_loads_from_toml_file() {
    use std::io::Write;

    let toml_text = toml::to_string(&Catalog::builtin()).unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(toml_text.as_bytes()).unwrap();

    let catalog = Catalog::from_toml_file(file.path()).unwrap();
    assert_eq!(catalog.providers().len(), 3);
    assert_eq!(catalog.price_for("General Hospital", "45378"), 800);

    let config = Config::default();
    let response = run_query(&catalog, &config, &request("45378", 20)).unwrap();
    assert_eq!(response.providers.len(), 3);
}

#[test]
fn invalid_catalog_file_is_rejected() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"providers = 3\n").unwrap();

    assert!(Catalog::from_toml_file(file.path()).is_err());
}
