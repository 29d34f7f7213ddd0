//! Extraction of a [`TaxStatus`] from the STC HTML page.
//!
//! Everything is read from inside the `div#contenedor` element. A missing
//! container or a missing mandatory field aborts the whole extraction; the
//! start date and the three tables degrade to `None` / empty instead.

pub mod fields;
pub mod locate;
pub mod tables;

use chrono::NaiveDate;
use scraper::{Html, Selector};

use crate::error::{Result, StcError};
use crate::models::TaxStatus;
use locate::{selector, FirstMatch, Locate, TextContains};

/// Parse a `dd-mm-yyyy` date by reassembling it as `yyyy-mm-dd`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.trim().splitn(3, '-');
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
    NaiveDate::parse_from_str(&format!("{year}-{month}-{day}"), "%Y-%m-%d").ok()
}

/// Lookup strategy for every field of the page.
pub struct Anchors {
    pub legal_name: Box<dyn Locate>,
    pub activities_started: Box<dyn Locate>,
    pub start_date: Box<dyn Locate>,
    pub foreign_currency: Box<dyn Locate>,
    pub small_enterprise: Box<dyn Locate>,
    pub activities: Box<dyn Locate>,
    pub non_electronic_documents: Box<dyn Locate>,
    pub stamped_documents: Box<dyn Locate>,
}

impl Anchors {
    /// Anchors matching the current SII markup.
    pub fn sii() -> Result<Self> {
        Ok(Self {
            legal_name: Box::new(FirstMatch::nth_div(4)?),
            activities_started: Box::new(TextContains::span(fields::ACTIVITIES_STARTED)?),
            start_date: Box::new(TextContains::span(fields::START_DATE)?),
            foreign_currency: Box::new(TextContains::span(fields::FOREIGN_CURRENCY)?),
            small_enterprise: Box::new(TextContains::span(fields::SMALL_ENTERPRISE)?),
            activities: Box::new(TextContains::table(tables::ACTIVITIES)?),
            non_electronic_documents: Box::new(TextContains::table(
                tables::NON_ELECTRONIC_DOCUMENTS,
            )?),
            stamped_documents: Box::new(TextContains::table(tables::STAMPED_DOCUMENTS)?),
        })
    }
}

/// Turns STC pages into [`TaxStatus`] records.
pub struct Extractor {
    container: Selector,
    anchors: Anchors,
}

impl Extractor {
    /// Extractor with the default SII anchors.
    pub fn new() -> Result<Self> {
        Self::with_anchors(Anchors::sii()?)
    }

    pub fn with_anchors(anchors: Anchors) -> Result<Self> {
        Ok(Self {
            container: selector("div#contenedor")?,
            anchors,
        })
    }

    /// Extract the record. `rut` and `dv` come from the caller, never from
    /// the page.
    pub fn extract(&self, html: &str, rut: &str, dv: &str) -> Result<TaxStatus> {
        let document = Html::parse_document(html);
        let container = document.select(&self.container).next().ok_or_else(|| {
            tracing::error!(
                "STC page without container: {}",
                html.chars().take(200).collect::<String>()
            );
            StcError::Extraction("No se logró cargar correctamente la situación tributaria".into())
        })?;

        let a = &self.anchors;
        let status = TaxStatus {
            rut: format!("{rut}-{dv}"),
            legal_name: fields::legal_name(container, a.legal_name.as_ref())?,
            activities_started: fields::activities_started(
                container,
                a.activities_started.as_ref(),
            )?,
            activities_start_date: fields::activities_start_date(container, a.start_date.as_ref()),
            foreign_currency_authorized: fields::foreign_currency_authorized(
                container,
                a.foreign_currency.as_ref(),
            )?,
            small_enterprise: fields::small_enterprise(container, a.small_enterprise.as_ref())?,
            activities: tables::activities(container, a.activities.as_ref())?,
            non_electronic_documents: tables::non_electronic_documents(
                container,
                a.non_electronic_documents.as_ref(),
            )?,
            stamped_documents: tables::stamped_documents(
                container,
                a.stamped_documents.as_ref(),
            )?,
        };

        tracing::debug!(
            rut = %status.rut,
            activities = status.activities.len(),
            non_electronic = status.non_electronic_documents.len(),
            stamped = status.stamped_documents.len(),
            "Parsed STC page"
        );

        Ok(status)
    }
}

/// Parse an STC page with the default anchors.
pub fn parse_stc(html: &str, rut: &str, dv: &str) -> Result<TaxStatus> {
    Extractor::new()?.extract(html, rut, dv)
}
