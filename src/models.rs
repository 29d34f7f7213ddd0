//! Data models for the SII captcha and tax-status records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Captcha token pair that must accompany a tax-status request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    /// Base64 blob exactly as returned by the service (`txt_captcha`).
    pub challenge_text: String,
    /// Solution extracted from the decoded blob (`txt_code`).
    pub solution_code: String,
}

/// Response from the `CViewCaptcha.cgi` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptchaResponse {
    #[serde(default)]
    pub codigorespuesta: Option<i64>,
    #[serde(default)]
    pub glosarespuesta: Option<String>,
    /// Base64 captcha text
    #[serde(rename = "txtCaptcha")]
    pub txt_captcha: String,
    /// Always false in practice, kept for completeness
    #[serde(default)]
    pub validez: bool,
}

/// Tax status ("situación tributaria") of a taxpayer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxStatus {
    /// RUT formatted as `<number>-<check digit>`
    pub rut: String,
    /// Razón social
    pub legal_name: String,
    pub activities_started: bool,
    pub activities_start_date: Option<NaiveDate>,
    /// Authorized to file and pay taxes in foreign currency
    pub foreign_currency_authorized: bool,
    /// Empresa de Menor Tamaño (ProPyme)
    pub small_enterprise: bool,
    pub activities: Vec<Activity>,
    /// Documents authorized for use in non-electronic format
    pub non_electronic_documents: Vec<NonElectronicDocumentAuthorization>,
    /// Documents with their last stamping (timbraje) year
    pub stamped_documents: Vec<DocumentStamping>,
}

/// Economic activity (giro) registered for the taxpayer.
///
/// Numeric and date cells that do not parse are kept as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub description: String,
    pub code: Option<u32>,
    /// 1 for "Primera" category, 2 otherwise
    pub category: u8,
    pub subject_to_tax: bool,
    pub date: Option<NaiveDate>,
}

/// Document type authorized in non-electronic format for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonElectronicDocumentAuthorization {
    pub document: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Document type with the year of its last stamping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStamping {
    pub document: String,
    pub last_stamping_year: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captcha_response_full() {
        let json = r#"{
            "codigorespuesta": 0,
            "glosarespuesta": "OK",
            "imgCaptcha": null,
            "txtCaptcha": "c2lp",
            "largoCaptcha": null,
            "validez": false
        }"#;
        let resp: CaptchaResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.codigorespuesta, Some(0));
        assert_eq!(resp.glosarespuesta.as_deref(), Some("OK"));
        assert_eq!(resp.txt_captcha, "c2lp");
        assert!(!resp.validez);
    }

    #[test]
    fn test_captcha_response_minimal() {
        let resp: CaptchaResponse = serde_json::from_str(r#"{"txtCaptcha": "abc"}"#).unwrap();
        assert_eq!(resp.txt_captcha, "abc");
        assert!(resp.codigorespuesta.is_none());
    }

    #[test]
    fn test_captcha_response_missing_blob() {
        let resp = serde_json::from_str::<CaptchaResponse>(r#"{"codigorespuesta": 0}"#);
        assert!(resp.is_err());
    }

    #[test]
    fn test_tax_status_serializes_iso_dates() {
        let status = TaxStatus {
            rut: "1-9".into(),
            legal_name: "ACME".into(),
            activities_started: true,
            activities_start_date: NaiveDate::from_ymd_opt(2017, 6, 5),
            foreign_currency_authorized: false,
            small_enterprise: false,
            activities: vec![],
            non_electronic_documents: vec![],
            stamped_documents: vec![],
        };
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(value["activities_start_date"], "2017-06-05");
        assert_eq!(value["activities"], serde_json::json!([]));
    }
}
