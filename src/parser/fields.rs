//! Header fields of the STC page (name, flags and start date).

use chrono::NaiveDate;
use scraper::ElementRef;

use super::locate::{element_text, Locate};
use super::parse_date;
use crate::error::{Result, StcError};

pub const ACTIVITIES_STARTED: &str = "Contribuyente presenta Inicio de Actividades";
pub const START_DATE: &str = "Fecha de Inicio de Actividades";
pub const FOREIGN_CURRENCY: &str =
    "Contribuyente autorizado para declarar y pagar sus impuestos en moneda extranjera";
pub const SMALL_ENTERPRISE: &str = "Contribuyente es Empresa de Menor";

/// Text of a mandatory anchor, or an extraction error naming the field.
fn required_text(container: ElementRef<'_>, anchor: &dyn Locate, field: &str) -> Result<String> {
    anchor
        .locate(container)
        .map(element_text)
        .ok_or_else(|| StcError::Extraction(format!("{field} not found")))
}

pub fn legal_name(container: ElementRef<'_>, anchor: &dyn Locate) -> Result<String> {
    Ok(required_text(container, anchor, "legal name")?.trim().to_string())
}

/// True only on the literal "...: SI" answer.
pub fn activities_started(container: ElementRef<'_>, anchor: &dyn Locate) -> Result<bool> {
    let text = required_text(container, anchor, "activities started flag")?;
    Ok(text.trim() == format!("{ACTIVITIES_STARTED}: SI"))
}

pub fn activities_start_date(container: ElementRef<'_>, anchor: &dyn Locate) -> Option<NaiveDate> {
    let text = element_text(anchor.locate(container)?);
    let raw = text.replace(&format!("{START_DATE}:"), "");
    let raw = raw.trim();

    let date = parse_date(raw);
    if date.is_none() {
        tracing::warn!(raw, "Unparseable start of activities date");
    }
    date
}

/// Defaults to authorized; only the literal "...: NO" answer clears it.
pub fn foreign_currency_authorized(
    container: ElementRef<'_>,
    anchor: &dyn Locate,
) -> Result<bool> {
    let text = required_text(container, anchor, "foreign currency authorization")?;
    Ok(text.trim() != format!("{FOREIGN_CURRENCY}: NO"))
}

pub fn small_enterprise(container: ElementRef<'_>, anchor: &dyn Locate) -> Result<bool> {
    let text = required_text(container, anchor, "small enterprise flag")?;
    Ok(text.split_whitespace().last() == Some("SI"))
}
