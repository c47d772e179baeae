use serde::{Deserialize, Serialize};

/// One electricity pricing plan as delivered by the tariff list endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tariff {
    pub stromanbieter: String,
    pub tarifname: String,
    pub tarifart: String,
    pub preisanpassung: String,
    pub strompreis: String,
    pub kurzbeschreibung: String,
}

/// Report information attached by newer API versions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportMetadata {
    /// `YYYY-MM-DD` of the crawl the list was built from
    pub report_date: Option<String>,
    pub last_modified: Option<String>,
}

/// Both shapes the tariff endpoint has answered with over time
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TariffResponse {
    /// Legacy plain list
    Flat(Vec<Tariff>),
    /// `{ "metadata": {...}, "tariffs": [...] }`
    Wrapped {
        #[serde(default)]
        metadata: Option<ReportMetadata>,
        tariffs: Vec<Tariff>,
    },
}

/// Normalized tariff list handed to the renderers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TariffTable {
    pub metadata: Option<ReportMetadata>,
    pub tariffs: Vec<Tariff>,
}

impl From<TariffResponse> for TariffTable {
    fn from(response: TariffResponse) -> Self {
        match response {
            TariffResponse::Flat(tariffs) => Self {
                metadata: None,
                tariffs,
            },
            TariffResponse::Wrapped { metadata, tariffs } => Self { metadata, tariffs },
        }
    }
}

impl TariffTable {
    /// Report date of the list, if the API supplied one
    pub fn report_date(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.report_date.as_deref())
            .filter(|d| !d.trim().is_empty())
    }
}
