use dioxus::prelude::*;

use crate::vm::{ReportRowVm, ReportVm};

/// Modal shown when a quiz finishes, with the per-question breakdown.
#[component]
pub fn ResultsDialog(report: ReportVm, on_restart: EventHandler<()>) -> Element {
    let title_class = if report.passed {
        "results__title results__title--passed"
    } else {
        "results__title results__title--failed"
    };

    rsx! {
        div { class: "results-overlay",
            div {
                class: "results",
                role: "dialog",
                aria_modal: "true",
                aria_labelledby: "results-title",
                h2 { class: title_class, id: "results-title", "{report.headline}" }
                p { class: "results__summary", "{report.summary}" }
                if let Some(elapsed) = report.elapsed.clone() {
                    p { class: "results__elapsed", "{elapsed}" }
                }
                ol { class: "results__list",
                    for row in report.rows.iter().cloned() {
                        ResultRow { key: "{row.label}", row }
                    }
                }
                footer { class: "results__footer",
                    button {
                        class: "btn btn-primary",
                        id: "results-restart",
                        r#type: "button",
                        onclick: move |_| on_restart.call(()),
                        "Run it again"
                    }
                }
            }
        }
    }
}

#[component]
fn ResultRow(row: ReportRowVm) -> Element {
    let class = if row.is_correct {
        "results__row results__row--correct"
    } else {
        "results__row results__row--incorrect"
    };
    let marker = if row.is_correct { "✓" } else { "✗" };

    rsx! {
        li { class,
            p { class: "results__question",
                span { class: "results__marker", "{marker} " }
                strong { "{row.label}: " }
                "{row.question}"
            }
            p { class: "results__answer", "Your answer: {row.user_answer} ({row.verdict})" }
            p { class: "results__accepted", "Correct answer(s): {row.accepted_answers}" }
            if let Some(note) = row.note.clone() {
                p { class: "results__note", "{note}" }
            }
        }
    }
}
