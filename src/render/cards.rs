use super::html::{Element, el};
use super::{attribution, filter_by_provider, report_date_label};
use crate::api::{Tariff, TariffTable};

fn detail(label: &str, value: &str) -> Element {
    el("p").child(el("strong").text(label)).text(" ").text(value)
}

fn card(tariff: &Tariff) -> Element {
    el("div")
        .class("tarif-card")
        .child(
            el("div")
                .class("tarif-header")
                .child(el("h3").text(&tariff.tarifname))
                .child(el("span").class("anbieter").text(&tariff.stromanbieter)),
        )
        .child(
            el("div")
                .class("tarif-body")
                .child(el("div").class("tarif-price").text(&tariff.strompreis))
                .child(
                    el("div")
                        .class("tarif-details")
                        .child(detail("Art:", &tariff.tarifart))
                        .child(detail("Anpassung:", &tariff.preisanpassung))
                        .child(el("p").class("description").text(&tariff.kurzbeschreibung)),
                ),
        )
}

/// Card grid layout: one card per tariff matching `provider`
pub fn render_cards(table: &TariffTable, provider: &str) -> String {
    let caption = report_date_label(table)
        .map(|label| el("p").class("stromtarife-report-date").text(label));

    let mut out = el("div")
        .class("stromtarife-cards")
        .maybe_child(caption)
        .children(filter_by_provider(&table.tariffs, provider).map(card))
        .render();
    out.push_str(&attribution().render());
    out
}
