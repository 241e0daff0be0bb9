use serde::{Deserialize, Serialize};

/// Company profile data from the upstream.
///
/// Only used for best-effort enrichment; every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    #[serde(default)]
    pub symbol: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    /// Logo URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Market capitalization as reported by the profile endpoint (native currency)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mkt_cap: Option<f64>,
}

impl CompanyProfile {
    /// Logo URL if the upstream sent a non-blank one.
    pub fn image_url(&self) -> Option<&str> {
        self.image
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_deserialization() {
        let json = r#"{
            "symbol": "AAPL",
            "companyName": "Apple Inc.",
            "image": "https://images.financialmodelingprep.com/symbol/AAPL.png",
            "sector": "Technology",
            "mktCap": 3400000000000
        }"#;

        let profile: CompanyProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.company_name.as_deref(), Some("Apple Inc."));
        assert_eq!(
            profile.image_url(),
            Some("https://images.financialmodelingprep.com/symbol/AAPL.png")
        );
        assert_eq!(profile.industry, None);
    }

    #[test]
    fn test_blank_image_is_none() {
        let profile = CompanyProfile {
            image: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(profile.image_url(), None);

        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("sector"));
    }
}
