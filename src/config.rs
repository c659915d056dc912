use std::collections::hash_map::RandomState;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::result::Result as DefaultResult;

use serde::de::{Error as DeserializeError, Expected};
use serde::Deserialize;
use serde_json::Number as JsnNum;

use crate::constant::{env_vars, logging as const_log};
use crate::error::{AppError, AppErrorCode};
use crate::AppLogAlias;

#[derive(Deserialize)]
pub struct AppLogHandlerCfg {
    pub min_level: const_log::Level,
    pub destination: const_log::Destination,
    pub alias: AppLogAlias,
    pub path: Option<String>,
}

#[derive(Deserialize)]
pub struct AppLoggerCfg {
    pub alias: AppLogAlias,
    pub handlers: Vec<String>,
    pub level: Option<const_log::Level>,
}

#[derive(Deserialize)]
pub struct AppLoggingCfg {
    pub handlers: Vec<AppLogHandlerCfg>,
    pub loggers: Vec<AppLoggerCfg>,
}

// remote shop-backend endpoint this client talks to, the session
// bearer token is NOT part of the config, callers receive it from
// the auth layer at login time
#[derive(Deserialize)]
pub struct AppBackendApiCfg {
    #[serde(deserialize_with = "jsn_deny_empty_string")]
    pub host: String,
    pub port: u16,
    // TLS-wrapped in production deployment, plain TCP in dev / test
    pub secure_conn: bool,
    pub timeout_secs: u16,
}

// monetary figures come in as raw JSON numbers, conversion to `Decimal`
// and the non-negative check happen in `model::PricingRuleSet`
#[derive(Deserialize)]
pub struct AppPricingRuleCfg {
    pub free_shipping_threshold: JsnNum,
    pub flat_shipping_fee: JsnNum,
    pub tax_rate: JsnNum,
}

#[derive(Deserialize)]
pub struct AppApiClientCfg {
    pub logging: AppLoggingCfg,
    pub backend: AppBackendApiCfg,
    pub pricing: AppPricingRuleCfg,
}

pub struct AppBasepathCfg {
    pub service: String,
}

pub struct AppConfig {
    pub basepath: AppBasepathCfg,
    pub api_client: AppApiClientCfg,
}

impl AppConfig {
    pub fn new(
        mut env_var_map: HashMap<String, String, RandomState>,
    ) -> DefaultResult<Self, AppError> {
        let app_basepath = if let Some(a) = env_var_map.remove(env_vars::SERVICE_BASEPATH) {
            a + "/"
        } else {
            return Err(AppError {
                detail: None,
                code: AppErrorCode::MissingAppBasePath,
            });
        };
        let cli_cfg = if let Some(cfg_path) = env_var_map.remove(env_vars::CFG_FILEPATH) {
            let fullpath = app_basepath.clone() + &cfg_path;
            Self::parse_from_file(fullpath)?
        } else {
            return Err(AppError {
                detail: None,
                code: AppErrorCode::MissingConfigPath,
            });
        };
        Ok(Self {
            api_client: cli_cfg,
            basepath: AppBasepathCfg {
                service: app_basepath,
            },
        })
    } // end of new

    pub fn parse_from_file(filepath: String) -> DefaultResult<AppApiClientCfg, AppError> {
        match File::open(filepath) {
            Ok(fileobj) => {
                let reader = BufReader::new(fileobj);
                match serde_json::from_reader::<BufReader<File>, AppApiClientCfg>(reader) {
                    Ok(jsnobj) => {
                        Self::_check_backend(&jsnobj.backend)?;
                        Self::_check_logging(&jsnobj.logging)?;
                        Ok(jsnobj)
                    }
                    Err(e) => Err(AppError {
                        detail: Some(e.to_string()),
                        code: AppErrorCode::InvalidJsonFormat,
                    }),
                }
            }
            Err(e) => Err(AppError {
                detail: Some(e.to_string()),
                code: AppErrorCode::IOerror(e.kind()),
            }),
        }
    }

    fn _check_backend(obj: &AppBackendApiCfg) -> DefaultResult<(), AppError> {
        if obj.port == 0 {
            Err(AppError {
                detail: Some("backend port must be non-zero".to_string()),
                code: AppErrorCode::InvalidInput,
            })
        } else if obj.timeout_secs == 0 {
            Err(AppError {
                detail: Some("request timeout must be non-zero".to_string()),
                code: AppErrorCode::InvalidInput,
            })
        } else {
            Ok(())
        }
    }

    fn _check_logging(obj: &AppLoggingCfg) -> DefaultResult<(), AppError> {
        let mut no_hdlr_logger = obj.loggers.iter().filter(|item| item.handlers.is_empty());
        let mut fs_without_path = obj.handlers.iter().filter(|item| match &item.destination {
            const_log::Destination::LOCALFS => item.path.is_none(),
            _other => false,
        }); // for file-type handler, the field `path` has to be provided
        if obj.handlers.is_empty() {
            Err(AppError {
                detail: None,
                code: AppErrorCode::NoLogHandlerCfg,
            })
        } else if obj.loggers.is_empty() {
            Err(AppError {
                detail: None,
                code: AppErrorCode::NoLoggerCfg,
            })
        } else if let Some(alogger) = no_hdlr_logger.next() {
            let msg = format!("the logger does not have handler: {}", alogger.alias);
            Err(AppError {
                detail: Some(msg),
                code: AppErrorCode::InvalidHandlerLoggerCfg,
            })
        } else if let Some(ahdlr) = fs_without_path.next() {
            let msg = format!("file-type handler does not contain path: {}", ahdlr.alias);
            Err(AppError {
                detail: Some(msg),
                code: AppErrorCode::InvalidHandlerLoggerCfg,
            })
        } else {
            let iter = obj.handlers.iter().map(|i| i.alias.as_str());
            let hdlr_alias_map: HashSet<&str> = HashSet::from_iter(iter);
            let mut bad_ref = obj.loggers.iter().filter(|item| {
                item.handlers
                    .iter()
                    .any(|i| !hdlr_alias_map.contains(i.as_str()))
            }); // handler alias in each logger has to be present
            if let Some(alogger) = bad_ref.next() {
                let msg = format!(
                    "the logger contains invalid handler alias: {}",
                    alogger.alias
                );
                Err(AppError {
                    detail: Some(msg),
                    code: AppErrorCode::InvalidHandlerLoggerCfg,
                })
            } else {
                Ok(())
            }
        }
    } // end of _check_logging
} // end of impl AppConfig

struct ExpectNonEmptyString {
    min_len: u32,
}

impl Expected for ExpectNonEmptyString {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        let msg = format!("minimum string length >= {}", self.min_len);
        formatter.write_str(msg.as_str())
    }
}

fn jsn_deny_empty_string<'de, D>(raw: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(raw)?;
    if s.is_empty() {
        let exp = ExpectNonEmptyString { min_len: 1 };
        Err(DeserializeError::invalid_length(0, &exp))
    } else {
        Ok(s)
    }
}
