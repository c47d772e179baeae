use super::html::{Element, el};
use super::{attribution, filter_by_provider, report_date_label};
use crate::api::{Tariff, TariffTable};

fn two_line(tag: &'static str, first: &str, second: &str) -> Element {
    el(tag).text(first).child(el("br")).text(second)
}

fn header_row() -> Element {
    el("tr")
        .child(two_line("th", "Anbieter", "Tarif"))
        .child(two_line("th", "Art", "Anpassung"))
        .child(el("th").text("Preis"))
        .child(el("th").text("Info"))
}

fn tariff_row(tariff: &Tariff) -> Element {
    el("tr")
        .child(two_line("td", &tariff.stromanbieter, &tariff.tarifname))
        .child(two_line("td", &tariff.tarifart, &tariff.preisanpassung))
        .child(el("td").class("tarif-price").text(&tariff.strompreis))
        .child(el("td").text(&tariff.kurzbeschreibung))
}

/// Table layout: one body row per tariff matching `provider`
pub fn render_table(table: &TariffTable, provider: &str) -> String {
    let caption = report_date_label(table)
        .map(|label| el("caption").class("stromtarife-report-date").text(label));

    let html_table = el("table")
        .class("stromtarife-table")
        .maybe_child(caption)
        .child(el("thead").child(header_row()))
        .child(el("tbody").children(filter_by_provider(&table.tariffs, provider).map(tariff_row)));

    let mut out = el("div")
        .class("stromtarife-table-container")
        .child(html_table)
        .render();
    out.push_str(&attribution().render());
    out
}
