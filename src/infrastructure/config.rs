use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CrmConfig {
    #[serde(default)]
    pub crm: CrmSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CrmSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Left empty when unset; the repository reports a missing key at fetch
    /// time so the failure surfaces in the dashboard response.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

impl Default for CrmSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            page_limit: default_page_limit(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.hubapi.com".to_string()
}

fn default_page_limit() -> u32 {
    100
}

pub fn load_crm_config() -> anyhow::Result<CrmConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/crm").required(false))
        .add_source(config::Environment::with_prefix("DASHBOARD").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
