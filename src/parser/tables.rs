//! Table-backed collections of the STC page.
//!
//! A missing table is not an error: the taxpayer simply has no entries of
//! that kind and the collection comes back empty.

use scraper::ElementRef;

use super::locate::{element_text, selector, Locate};
use super::parse_date;
use crate::error::Result;
use crate::models::{Activity, DocumentStamping, NonElectronicDocumentAuthorization};

pub const ACTIVITIES: &str = "Actividades";
pub const NON_ELECTRONIC_DOCUMENTS: &str = "Documentos autorizados en formato no electrónico";
pub const STAMPED_DOCUMENTS: &str = "Año último timbraje";

/// Trimmed `td` texts of every row after the header, keeping only rows with
/// at least `min_cells` cells.
fn data_rows(
    container: ElementRef<'_>,
    anchor: &dyn Locate,
    min_cells: usize,
) -> Result<Vec<Vec<String>>> {
    let Some(table) = anchor.locate(container) else {
        return Ok(Vec::new());
    };

    let row_selector = selector("tr")?;
    let td_selector = selector("td")?;

    let mut rows = Vec::new();
    for (index, row) in table.select(&row_selector).enumerate().skip(1) {
        let cells: Vec<String> = row
            .select(&td_selector)
            .map(|td| element_text(td).trim().to_string())
            .collect();

        if cells.len() < min_cells {
            tracing::debug!(index, cells = cells.len(), min_cells, "Skipping short table row");
            continue;
        }
        rows.push(cells);
    }

    Ok(rows)
}

fn parse_number<T: std::str::FromStr>(raw: &str, column: &str) -> Option<T> {
    let value = raw.parse().ok();
    if value.is_none() {
        tracing::warn!(raw, column, "Unparseable numeric cell");
    }
    value
}

fn parse_date_cell(raw: &str, column: &str) -> Option<chrono::NaiveDate> {
    let value = parse_date(raw);
    if value.is_none() {
        tracing::warn!(raw, column, "Unparseable date cell");
    }
    value
}

/// "Primera" category maps to 1, anything else to 2.
pub fn category(raw: &str) -> u8 {
    if raw == "Primera" {
        1
    } else {
        2
    }
}

pub fn activities(container: ElementRef<'_>, anchor: &dyn Locate) -> Result<Vec<Activity>> {
    let activities = data_rows(container, anchor, 5)?
        .into_iter()
        .map(|cells| Activity {
            code: parse_number(&cells[1], "codigo"),
            category: category(&cells[2]),
            subject_to_tax: cells[3] == "Si",
            date: parse_date_cell(&cells[4], "fecha"),
            description: cells[0].clone(),
        })
        .collect();

    Ok(activities)
}

pub fn non_electronic_documents(
    container: ElementRef<'_>,
    anchor: &dyn Locate,
) -> Result<Vec<NonElectronicDocumentAuthorization>> {
    let documents = data_rows(container, anchor, 3)?
        .into_iter()
        .map(|cells| NonElectronicDocumentAuthorization {
            from: parse_date_cell(&cells[0], "desde"),
            to: parse_date_cell(&cells[1], "hasta"),
            document: cells[2].clone(),
        })
        .collect();

    Ok(documents)
}

pub fn stamped_documents(
    container: ElementRef<'_>,
    anchor: &dyn Locate,
) -> Result<Vec<DocumentStamping>> {
    let documents = data_rows(container, anchor, 2)?
        .into_iter()
        .map(|cells| DocumentStamping {
            last_stamping_year: parse_number(&cells[1], "ultimo_timbraje"),
            document: cells[0].clone(),
        })
        .collect();

    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::locate::TextContains;
    use chrono::NaiveDate;
    use scraper::Html;

    fn with_container<T>(body: &str, f: impl FnOnce(ElementRef<'_>) -> T) -> T {
        let doc = Html::parse_document(&format!(r#"<div id="contenedor">{body}</div>"#));
        let sel = selector("div#contenedor").unwrap();
        f(doc.select(&sel).next().unwrap())
    }

    const ACTIVITIES_TABLE: &str = r#"
        <table class="tabla">
          <tr><th>Actividades</th><th>Código</th><th>Categoría</th><th>Afecta IVA</th><th>Fecha</th></tr>
          <tr><td><font>SERVICIOS DE ASESORIA </font></td><td>702000</td><td>Primera</td><td>Si</td><td>01-03-2019</td></tr>
          <tr><td>VENTA AL POR MENOR</td><td>479100</td><td>Segunda</td><td>No</td><td>31-12-2020</td></tr>
        </table>"#;

    #[test]
    fn test_activities_rows() {
        let anchor = TextContains::table(ACTIVITIES).unwrap();
        let list = with_container(ACTIVITIES_TABLE, |c| activities(c, &anchor)).unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].description, "SERVICIOS DE ASESORIA");
        assert_eq!(list[0].code, Some(702000));
        assert_eq!(list[0].category, 1);
        assert!(list[0].subject_to_tax);
        assert_eq!(list[0].date, NaiveDate::from_ymd_opt(2019, 3, 1));

        assert_eq!(list[1].category, 2);
        assert!(!list[1].subject_to_tax);
        assert_eq!(list[1].date, NaiveDate::from_ymd_opt(2020, 12, 31));
    }

    #[test]
    fn test_missing_tables_are_empty() {
        let body = "<span>sin tablas</span>";
        let acts = with_container(body, |c| {
            activities(c, &TextContains::table(ACTIVITIES).unwrap())
        });
        let docs = with_container(body, |c| {
            non_electronic_documents(c, &TextContains::table(NON_ELECTRONIC_DOCUMENTS).unwrap())
        });
        let stamps = with_container(body, |c| {
            stamped_documents(c, &TextContains::table(STAMPED_DOCUMENTS).unwrap())
        });

        assert!(acts.unwrap().is_empty());
        assert!(docs.unwrap().is_empty());
        assert!(stamps.unwrap().is_empty());
    }

    #[test]
    fn test_malformed_cells_are_none() {
        let body = r#"
            <table class="tabla">
              <tr><th>Actividades</th></tr>
              <tr><td>X</td><td>abc</td><td>Primera</td><td>Si</td><td>32-13-2020</td></tr>
            </table>"#;
        let list = with_container(body, |c| {
            activities(c, &TextContains::table(ACTIVITIES).unwrap())
        })
        .unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(list[0].code, None);
        assert_eq!(list[0].date, None);
    }

    #[test]
    fn test_short_rows_skipped() {
        let body = r#"
            <table class="tabla">
              <tr><th>Documento</th><th>Año último timbraje</th></tr>
              <tr><td colspan="2">Sin información</td></tr>
              <tr><td>Factura Electronica</td><td>2023</td></tr>
            </table>"#;
        let list = with_container(body, |c| {
            stamped_documents(c, &TextContains::table(STAMPED_DOCUMENTS).unwrap())
        })
        .unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(list[0].document, "Factura Electronica");
        assert_eq!(list[0].last_stamping_year, Some(2023));
    }

    #[test]
    fn test_non_electronic_documents() {
        let body = format!(
            r#"<table class="tabla">
                 <tr><th colspan="3">{NON_ELECTRONIC_DOCUMENTS}</th></tr>
                 <tr><td>01-01-2017</td><td>31-12-2018</td><td> PRORROGA </td></tr>
               </table>"#
        );
        let list = with_container(&body, |c| {
            non_electronic_documents(c, &TextContains::table(NON_ELECTRONIC_DOCUMENTS).unwrap())
        })
        .unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(list[0].document, "PRORROGA");
        assert_eq!(list[0].from, NaiveDate::from_ymd_opt(2017, 1, 1));
        assert_eq!(list[0].to, NaiveDate::from_ymd_opt(2018, 12, 31));
    }

    #[test]
    fn test_category() {
        assert_eq!(category("Primera"), 1);
        assert_eq!(category("Segunda"), 2);
        assert_eq!(category(""), 2);
    }
}
