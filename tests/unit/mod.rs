mod usecase;

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use storefront::config::AppConfig;
use storefront::constant::env_vars::{CFG_FILEPATH, SERVICE_BASEPATH};
use storefront::logging::AppLogContext;
use storefront::model::PricingRuleSet;

pub(crate) const EXAMPLE_REL_PATH: &str = "tests/unit/examples/";

fn ut_setup_config(cfg_filename: &str) -> AppConfig {
    let service_basepath = env!("CARGO_MANIFEST_DIR").to_string();
    let mut env_var_map = HashMap::new();
    let _old = env_var_map.insert(SERVICE_BASEPATH.to_string(), service_basepath);
    let _old = env_var_map.insert(
        CFG_FILEPATH.to_string(),
        EXAMPLE_REL_PATH.to_string() + cfg_filename,
    );
    AppConfig::new(env_var_map).unwrap()
}

fn ut_setup_log_context() -> Arc<AppLogContext> {
    static GUARD_LOG_CTX: OnceLock<Arc<AppLogContext>> = OnceLock::new();
    GUARD_LOG_CTX
        .get_or_init(|| {
            let cfg = ut_setup_config("config_ok.json");
            Arc::new(AppLogContext::new(&cfg.basepath, &cfg.api_client.logging))
        })
        .clone()
}

fn ut_default_pricing_rules() -> PricingRuleSet {
    let cfg = ut_setup_config("config_ok.json");
    PricingRuleSet::try_from(&cfg.api_client.pricing).unwrap()
}

#[test]
fn cfg_load_ok() {
    let cfg = ut_setup_config("config_ok.json");
    assert_eq!(cfg.api_client.backend.host.as_str(), "localhost");
    assert_eq!(cfg.api_client.backend.port, 8006u16);
    assert!(!cfg.api_client.backend.secure_conn);
    assert_eq!(cfg.api_client.backend.timeout_secs, 8u16);
    let rules = PricingRuleSet::try_from(&cfg.api_client.pricing).unwrap();
    assert_eq!(rules.free_shipping_threshold.to_string().as_str(), "50.0");
    assert_eq!(rules.flat_shipping_fee.to_string().as_str(), "9.99");
    assert_eq!(rules.tax_rate.to_string().as_str(), "0.08");
}

#[test]
fn cfg_missing_env_path() {
    use storefront::error::AppErrorCode;
    let env_var_map = HashMap::new();
    let result = AppConfig::new(env_var_map);
    let e = result.err().unwrap();
    assert_eq!(e.code, AppErrorCode::MissingAppBasePath);
}
