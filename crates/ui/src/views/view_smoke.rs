use civics_core::ResultReport;
use civics_core::model::QuizStatus;
use civics_core::report::ReportEntry;
use civics_core::time::fixed_now;

use super::test_harness::{setup_quiz_harness, setup_results_harness};
use crate::vm::map_report;

#[test]
fn quiz_view_smoke_renders_first_question() {
    let mut harness = setup_quiz_harness(20);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Question 1 of 10"), "missing progress in {html}");
    assert!(html.contains("Civics question"), "missing question in {html}");
    assert!(html.contains("Submit"), "missing submit in {html}");
    assert!(html.contains("disabled"), "submit should start disabled in {html}");
    assert!(html.contains("Grader: unknown"), "missing health in {html}");
    assert!(html.contains("autofocus"), "answer input should take focus in {html}");
    assert!(!html.contains("Run it again"), "results shown too early in {html}");
}

#[test]
fn quiz_view_smoke_renders_small_pool_error() {
    let mut harness = setup_quiz_harness(3);
    harness.rebuild();
    let html = harness.render();
    assert!(
        html.contains("There are not enough questions to run a quiz."),
        "missing error in {html}"
    );
    assert!(!html.contains("Question 1 of 10"), "unexpected question in {html}");
}

#[test]
fn results_dialog_smoke_renders_breakdown() {
    let report = ResultReport {
        status: QuizStatus::Passed,
        correct_count: 6,
        total: 10,
        entries: (1..=6)
            .map(|number| ReportEntry {
                number,
                question: format!("Question text {number}"),
                user_answer: format!("Reply {number}"),
                is_correct: true,
                grading_failed: false,
                rationale: "yes".into(),
                accepted_answers: vec!["first".into(), "second".into()],
            })
            .collect(),
    };
    let mut harness = setup_results_harness(map_report(&report, fixed_now(), Some(fixed_now())));
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Congrats, you passed!"), "missing headline in {html}");
    assert!(
        html.contains("You answered 6 out of 10 questions correctly."),
        "missing summary in {html}"
    );
    assert!(html.contains("Question text 6"), "missing row in {html}");
    assert!(html.contains("Reply 3"), "missing answer in {html}");
    assert!(html.contains("first; second"), "missing accepted answers in {html}");
    assert!(html.contains("Run it again"), "missing restart in {html}");
}
