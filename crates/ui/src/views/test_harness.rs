use std::sync::Arc;

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;

use civics_core::model::Question;
use civics_core::time::fixed_clock;
use civics_core::{GradeVerdict, QuestionPool};
use services::{Grader, GradingError, QuizService};

use crate::context::{UiApp, build_app_context};
use crate::views::{QuizView, ResultsDialog};
use crate::vm::ReportVm;

struct AlwaysCorrect;

#[async_trait]
impl Grader for AlwaysCorrect {
    async fn grade(&self, _: &Question, _: &str) -> Result<GradeVerdict, GradingError> {
        Ok(GradeVerdict::from_reply("yes"))
    }
}

struct TestApp {
    quiz_service: Arc<QuizService>,
}

impl UiApp for TestApp {
    fn quiz_service(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz_service)
    }
}

#[derive(Props, Clone)]
struct QuizHarnessProps {
    app: Arc<TestApp>,
}

impl PartialEq for QuizHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn QuizHarness(props: QuizHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    rsx! { QuizView {} }
}

#[component]
fn ResultsHarness(report: ReportVm) -> Element {
    rsx! { ResultsDialog { report, on_restart: move |()| {} } }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

fn pool(size: usize) -> Arc<QuestionPool> {
    let questions = (0..size)
        .map(|i| Question::new(format!("Civics question {i}?"), [format!("Answer {i}")]).unwrap())
        .collect();
    Arc::new(QuestionPool::new(questions).unwrap())
}

pub fn setup_quiz_harness(pool_size: usize) -> ViewHarness {
    let service = QuizService::new(fixed_clock(), pool(pool_size), Arc::new(AlwaysCorrect))
        .with_seed(11);
    let app = Arc::new(TestApp {
        quiz_service: Arc::new(service),
    });
    ViewHarness {
        dom: VirtualDom::new_with_props(QuizHarness, QuizHarnessProps { app }),
    }
}

pub fn setup_results_harness(report: ReportVm) -> ViewHarness {
    ViewHarness {
        dom: VirtualDom::new_with_props(ResultsHarness, ResultsHarnessProps { report }),
    }
}
