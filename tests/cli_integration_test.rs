//! CLI integration tests for command orchestration.
//!
//! Tests cover:
//! - Fetch request resolution from INI files on disk (config, flags, defaults)
//! - Config validation failures
//! - Report store directory resolution
//! - Chart selection defaults against a real store

mod common;

use common::*;
use std::io::Write;
use std::path::PathBuf;
use storefront_sales::adapters::file_config_adapter::FileConfigAdapter;
use storefront_sales::adapters::fs_report_store::FsReportStore;
use storefront_sales::cli::{self, FetchOverrides};
use storefront_sales::domain::aggregator::{
    bucket_series, coverage, selectable_months, selectable_years, PeriodSelection,
    ReportingPeriod,
};
use storefront_sales::domain::config_validation::validate_fetch_config;
use storefront_sales::domain::error::SalesError;
use storefront_sales::domain::report_loader::load_records;
use storefront_sales::ports::report_store_port::ReportStorePort;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const VALID_INI: &str = r#"
[vendor]
number = 88123456

[product]
sku = com.example.App

[store]
dir = /var/lib/sales

[fetch]
skip_existing = true
max_concurrent = 4
start_date = 2024-01-01
end_date = 2024-01-31

[api]
base_url = http://localhost:9000
token = secret
timeout_secs = 10
"#;

mod config_loading {
    use super::*;

    #[test]
    fn load_config_reads_file_from_disk() {
        let file = write_temp_ini(VALID_INI);
        let config = cli::load_config(&file.path().to_path_buf()).unwrap();
        assert!(validate_fetch_config(&config).is_ok());
        assert_eq!(cli::store_dir(&config), PathBuf::from("/var/lib/sales"));
    }

    #[test]
    fn load_config_fails_for_missing_file() {
        let result = cli::load_config(&PathBuf::from("/nonexistent/sales.ini"));
        assert!(result.is_err());
    }

    #[test]
    fn store_dir_defaults_to_working_directory() {
        let config = FileConfigAdapter::from_string("[vendor]\nnumber = 1\n").unwrap();
        assert_eq!(cli::store_dir(&config), PathBuf::from("."));
    }
}

mod fetch_request {
    use super::*;

    #[test]
    fn built_from_config() {
        let config = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let req =
            cli::build_fetch_request(&config, &FetchOverrides::default(), date(2024, 6, 1))
                .unwrap();

        assert_eq!(req.vendor_number, "88123456");
        assert_eq!(req.interval.start(), date(2024, 1, 1));
        assert_eq!(req.interval.end(), date(2024, 1, 31));
        assert!(req.skip_existing);
        assert_eq!(req.max_concurrent, 4);
    }

    #[test]
    fn flags_override_config() {
        let config = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let overrides = FetchOverrides {
            start: Some(date(2024, 1, 10)),
            end: Some(date(2024, 1, 12)),
            vendor: Some("99000000".into()),
            no_skip_existing: true,
        };
        let req = cli::build_fetch_request(&config, &overrides, date(2024, 6, 1)).unwrap();

        assert_eq!(req.vendor_number, "99000000");
        assert_eq!(req.interval.start(), date(2024, 1, 10));
        assert_eq!(req.interval.end(), date(2024, 1, 12));
        assert!(!req.skip_existing);
    }

    #[test]
    fn defaults_to_last_month_through_today() {
        let config = FileConfigAdapter::from_string("[vendor]\nnumber = 88123456\n").unwrap();
        let req =
            cli::build_fetch_request(&config, &FetchOverrides::default(), date(2024, 3, 15))
                .unwrap();

        assert_eq!(req.interval.start(), date(2024, 2, 15));
        assert_eq!(req.interval.end(), date(2024, 3, 15));
        assert!(req.skip_existing);
        assert_eq!(req.max_concurrent, 8);
    }

    #[test]
    fn missing_vendor_is_config_error() {
        let config = FileConfigAdapter::from_string("[fetch]\nmax_concurrent = 2\n").unwrap();
        let err = cli::build_fetch_request(&config, &FetchOverrides::default(), date(2024, 1, 1))
            .unwrap_err();
        assert!(matches!(err, SalesError::ConfigMissing { ref key, .. } if key == "number"));
    }

    #[test]
    fn reversed_flag_dates_are_rejected() {
        let config = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let overrides = FetchOverrides {
            start: Some(date(2024, 2, 1)),
            end: Some(date(2024, 1, 1)),
            ..FetchOverrides::default()
        };
        let err = cli::build_fetch_request(&config, &overrides, date(2024, 6, 1)).unwrap_err();
        assert!(matches!(err, SalesError::InvalidInterval { .. }));
    }

    #[test]
    fn oversized_concurrency_is_rejected() {
        let config = FileConfigAdapter::from_string(
            "[vendor]\nnumber = 1\n[fetch]\nmax_concurrent = 9000000000000000000\n",
        )
        .unwrap();
        let err = cli::build_fetch_request(&config, &FetchOverrides::default(), date(2024, 1, 1))
            .unwrap_err();
        assert!(
            matches!(err, SalesError::ConfigInvalid { ref key, .. } if key == "max_concurrent")
        );
    }

    #[test]
    fn skip_existing_can_be_disabled_in_config() {
        let config = FileConfigAdapter::from_string(
            "[vendor]\nnumber = 1\n[fetch]\nskip_existing = false\n",
        )
        .unwrap();
        let req = cli::build_fetch_request(&config, &FetchOverrides::default(), date(2024, 1, 1))
            .unwrap();
        assert!(!req.skip_existing);
    }
}

mod view_pipeline {
    use super::*;

    fn seeded_store(dir: &tempfile::TempDir) -> FsReportStore {
        let store = FsReportStore::new(dir.path().to_path_buf());
        store
            .write(
                date(2023, 11, 20),
                &sales_report(&[(TARGET_SKU, date(2023, 11, 20), "2")]),
            )
            .unwrap();
        store
            .write(
                date(2024, 2, 3),
                &sales_report(&[
                    (TARGET_SKU, date(2024, 2, 3), "5"),
                    ("com.example.Other", date(2024, 2, 3), "50"),
                ]),
            )
            .unwrap();
        store
    }

    #[test]
    fn selectable_ranges_follow_coverage() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = seeded_store(&dir);
        let loaded = load_records(&store, TARGET_SKU).unwrap();
        let cov = coverage(&loaded.records, date(2024, 6, 1));

        assert_eq!(cov.total_units, 7);
        assert_eq!(selectable_years(&cov), vec![2023, 2024]);
        assert_eq!(selectable_months(2023, &cov), vec![11, 12]);
        assert_eq!(selectable_months(2024, &cov), vec![1, 2]);
    }

    #[test]
    fn chart_defaults_to_last_covered_month() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = seeded_store(&dir);
        let loaded = load_records(&store, TARGET_SKU).unwrap();
        let today = date(2024, 6, 1);
        let cov = coverage(&loaded.records, today);

        let selection = cli::resolve_selection(ReportingPeriod::Monthly, None, None, &cov);
        assert_eq!(
            selection,
            PeriodSelection::Monthly {
                year: 2024,
                month: 2
            }
        );

        let series = bucket_series(&loaded.records, selection, today);
        assert_eq!(series.axis_label, "Day");
        assert_eq!(series.buckets.len(), 29);
        assert_eq!(series.buckets[2].label, "03");
        assert_eq!(series.buckets[2].total_units, 5);
        assert_eq!(series.total_units(), 5);
    }

    #[test]
    fn yearly_chart_for_earlier_year() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = seeded_store(&dir);
        assert_eq!(store.list().unwrap().len(), 2);
        let loaded = load_records(&store, TARGET_SKU).unwrap();
        let cov = coverage(&loaded.records, date(2024, 6, 1));

        let selection = cli::resolve_selection(ReportingPeriod::Yearly, Some(2023), None, &cov);
        let series = bucket_series(&loaded.records, selection, date(2024, 6, 1));
        assert_eq!(series.axis_label, "Month");
        assert_eq!(series.buckets.len(), 12);
        assert_eq!(series.buckets[10].label, "November");
        assert_eq!(series.buckets[10].total_units, 2);
        assert_eq!(series.total_units(), 2);
    }
}
