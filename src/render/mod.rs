//! HTML renderers for tariff lists, charts and errors
//!
//! Every renderer is a pure function of its inputs. Successful output always
//! ends with the attribution footer; error output never does.

pub mod cards;
pub mod html;
pub mod table;

use crate::api::{Tariff, TariffTable};
use crate::error::StromError;
use html::{Element, el};

pub use cards::render_cards;
pub use table::render_table;

/// Shown for transport failures and anything else not caused by the caller
pub const UNAVAILABLE_MESSAGE: &str = "Die Daten konnten nicht abgerufen werden.";

/// Shown when the upstream body could not be decoded
pub const PARSE_ERROR_MESSAGE: &str = "Ungültige Daten vom API-Endpunkt";

/// Tariff presentation selected by the `layout` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Table,
    Cards,
}

impl Layout {
    /// Parse the `layout` attribute; anything but `cards` renders a table
    pub fn from_token(token: &str) -> Self {
        if token.trim().eq_ignore_ascii_case("cards") {
            Self::Cards
        } else {
            Self::Table
        }
    }
}

/// Tariffs whose provider equals `provider` exactly; an empty filter keeps all
pub fn filter_by_provider<'a>(
    tariffs: &'a [Tariff],
    provider: &'a str,
) -> impl Iterator<Item = &'a Tariff> + 'a {
    tariffs
        .iter()
        .filter(move |t| provider.is_empty() || t.stromanbieter == provider)
}

/// Render `table` in the requested layout, including the attribution footer
pub fn render_tariffs(table: &TariffTable, layout: Layout, provider: &str) -> String {
    match layout {
        Layout::Table => render_table(table, provider),
        Layout::Cards => render_cards(table, provider),
    }
}

/// Wrap a post-processed SVG fragment and append the attribution footer
pub fn render_graph(svg: &str) -> String {
    let mut out = el("div")
        .class("stromgraph-container")
        .raw(svg)
        .render();
    out.push_str(&attribution().render());
    out
}

/// Fixed-style error box used in place of data
pub fn render_error(err: &StromError) -> String {
    el("div")
        .class("error-message")
        .text(user_message(err))
        .render()
}

/// User-facing text for an error
pub fn user_message(err: &StromError) -> &str {
    match err {
        StromError::InvalidInput { message } => message.as_str(),
        StromError::Parse { .. } => PARSE_ERROR_MESSAGE,
        _ => UNAVAILABLE_MESSAGE,
    }
}

pub(crate) fn attribution() -> Element {
    let link = |href: &str, label: &str| {
        el("a")
            .attr("href", href)
            .attr("target", "_blank")
            .attr("rel", "noopener noreferrer")
            .text(label)
    };
    el("p")
        .class("stromtarife-attribution")
        .text("Data by ")
        .child(link("https://gwen.at", "gwen.at"))
        .text(" / ")
        .child(link("https://skale.dev", "skale.dev"))
}

/// "Stand: 31.01.2025" caption for lists that carry a report date
pub(crate) fn report_date_label(table: &TariffTable) -> Option<String> {
    let raw = table.report_date()?;
    let shown = chrono::NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(|d| d.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|_| raw.to_string());
    Some(format!("Stand: {}", shown))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ReportMetadata;

    fn tariff(provider: &str, name: &str) -> Tariff {
        Tariff {
            stromanbieter: provider.to_string(),
            tarifname: name.to_string(),
            ..Tariff::default()
        }
    }

    #[test]
    fn layout_tokens() {
        assert_eq!(Layout::from_token("cards"), Layout::Cards);
        assert_eq!(Layout::from_token("Cards"), Layout::Cards);
        assert_eq!(Layout::from_token("table"), Layout::Table);
        assert_eq!(Layout::from_token("grid"), Layout::Table);
    }

    #[test]
    fn provider_filter_is_exact_and_case_sensitive() {
        let tariffs = vec![tariff("A", "1"), tariff("a", "2"), tariff("A", "3")];
        assert_eq!(filter_by_provider(&tariffs, "A").count(), 2);
        assert_eq!(filter_by_provider(&tariffs, "a").count(), 1);
        assert_eq!(filter_by_provider(&tariffs, "").count(), 3);
        assert_eq!(filter_by_provider(&tariffs, "B").count(), 0);
    }

    #[test]
    fn error_box_messages() {
        let html = render_error(&StromError::invalid_input("Invalid number of rows"));
        assert_eq!(html, r#"<div class="error-message">Invalid number of rows</div>"#);
        assert_eq!(
            render_error(&StromError::parse("x")),
            r#"<div class="error-message">Ungültige Daten vom API-Endpunkt</div>"#
        );
        assert!(!render_error(&StromError::transport("x")).contains("stromtarife-attribution"));
    }

    #[test]
    fn graph_is_wrapped_with_attribution() {
        let html = render_graph(r#"<svg viewBox="0 0 800 400"></svg>"#);
        assert!(html.starts_with(
            r#"<div class="stromgraph-container"><svg viewBox="0 0 800 400"></svg></div>"#
        ));
        assert!(html.ends_with("</p>"));
        assert!(html.contains("stromtarife-attribution"));
    }

    #[test]
    fn attribution_links_both_sites() {
        let html = attribution().render();
        assert_eq!(
            html,
            concat!(
                r#"<p class="stromtarife-attribution">Data by "#,
                r#"<a href="https://gwen.at" target="_blank" rel="noopener noreferrer">gwen.at</a>"#,
                " / ",
                r#"<a href="https://skale.dev" target="_blank" rel="noopener noreferrer">skale.dev</a></p>"#
            )
        );
    }

    #[test]
    fn report_date_is_formatted() {
        let mut table = TariffTable::default();
        assert_eq!(report_date_label(&table), None);

        table.metadata = Some(ReportMetadata {
            report_date: Some("2025-01-31".to_string()),
            last_modified: None,
        });
        assert_eq!(report_date_label(&table).as_deref(), Some("Stand: 31.01.2025"));

        table.metadata = Some(ReportMetadata {
            report_date: Some("Januar".to_string()),
            last_modified: None,
        });
        assert_eq!(report_date_label(&table).as_deref(), Some("Stand: Januar"));
    }
}
