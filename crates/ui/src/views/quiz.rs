use std::rc::Rc;

use dioxus::prelude::*;

use civics_core::model::ClassifierHealth;

use crate::context::AppContext;
use crate::views::{ResultsDialog, ViewError};
use crate::vm::QuizVm;

fn health_class(health: ClassifierHealth) -> &'static str {
    match health {
        ClassifierHealth::Unknown => "health health--unknown",
        ClassifierHealth::Ok => "health health--ok",
        ClassifierHealth::Error => "health health--error",
    }
}

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let service = ctx.quiz_service();

    let mut state = {
        let service = service.clone();
        use_signal(move || QuizVm::start(&service))
    };

    let mut answer_input = use_signal(|| None::<Rc<MountedData>>);

    // Put the cursor back in the answer box whenever grading is not running.
    use_effect(move || {
        let grading = matches!(&*state.read(), Ok(vm) if vm.is_grading());
        let Some(input) = answer_input() else {
            return;
        };
        if grading {
            return;
        }
        spawn(async move {
            if let Err(err) = input.set_focus(true).await {
                tracing::debug!(error = ?err, "could not focus answer input");
            }
        });
    });

    let on_submit = use_callback(move |()| {
        let pending = match &mut *state.write() {
            Ok(vm) => vm.begin_submit(),
            Err(_) => None,
        };
        let Some((handle, answer)) = pending else {
            return;
        };
        spawn(async move {
            let result = handle.submit_answer(&answer).await;
            if let Ok(vm) = &mut *state.write() {
                vm.apply(result);
            }
        });
    });

    let on_restart = use_callback(move |()| {
        tracing::info!("restarting quiz");
        state.set(QuizVm::start(&service));
    });

    let screen = match &*state.read() {
        Ok(vm) => Ok(vm.screen()),
        Err(err) => Err(*err),
    };

    rsx! {
        div { class: "page quiz-page",
            header { class: "quiz-header",
                h1 { "Civics Quiz" }
                if let Ok(screen) = &screen {
                    span { class: health_class(screen.health), "Grader: {screen.health}" }
                }
            }
            match screen {
                Err(err) => rsx! {
                    div { class: "quiz-error",
                        p { "{err.message()}" }
                        if err != ViewError::PoolTooSmall {
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                onclick: move |_| on_restart.call(()),
                                "Retry"
                            }
                        }
                    }
                },
                Ok(screen) => rsx! {
                    if let Some(notice) = screen.health_notice {
                        p { class: "quiz-notice", role: "status", "{notice}" }
                    }
                    if let (Some(progress), Some(question)) = (screen.progress.clone(), screen.question.clone()) {
                        section { class: "quiz-question",
                            h2 { class: "quiz-question__progress", "{progress}" }
                            p { class: "quiz-question__text", "{question}" }
                            form {
                                class: "quiz-form",
                                onsubmit: move |evt: FormEvent| {
                                    evt.prevent_default();
                                    on_submit.call(());
                                },
                                input {
                                    class: "quiz-form__input",
                                    id: "quiz-answer",
                                    r#type: "text",
                                    placeholder: "Type your answer",
                                    autocomplete: "off",
                                    autofocus: true,
                                    value: "{screen.input}",
                                    disabled: screen.input_disabled,
                                    onmounted: move |evt: MountedEvent| answer_input.set(Some(evt.data())),
                                    oninput: move |evt: FormEvent| {
                                        if let Ok(vm) = &mut *state.write() {
                                            vm.set_input(evt.value());
                                        }
                                    },
                                }
                                button {
                                    class: "btn btn-primary",
                                    id: "quiz-submit",
                                    r#type: "submit",
                                    disabled: !screen.can_submit,
                                    "{screen.submit_label}"
                                }
                            }
                        }
                    }
                    if let Some(feedback) = screen.feedback.clone() {
                        p { class: "quiz-feedback", "{feedback}" }
                    }
                    if let Some(report) = screen.report.clone() {
                        ResultsDialog { report, on_restart }
                    }
                },
            }
        }
    }
}
