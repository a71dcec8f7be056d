//! Line-based quiz front end for the terminal.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tracing::debug;

use services::{QuizHandle, QuizService};

use crate::error::AppError;

const DEGRADED_NOTICE: &str =
    "(The grading service is unavailable. Answers are marked incorrect until it recovers.)";

/// Run quizzes on stdin/stdout until the user declines another round or input ends.
///
/// # Errors
///
/// Returns an error if a session cannot start or the terminal cannot be read or written.
pub async fn run(service: &QuizService) -> Result<(), AppError> {
    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();
    run_with(service, input, &mut output).await
}

/// [`run`] over arbitrary streams.
///
/// # Errors
///
/// Same as [`run`].
pub async fn run_with<R, W>(service: &QuizService, input: R, output: &mut W) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    loop {
        let handle = service.start_session()?;
        if !play(&handle, &mut lines, output).await? {
            return Ok(());
        }

        if let Some(report) = handle.report() {
            output.write_all(format!("\n{report}").as_bytes()).await?;
        }
        output.write_all(b"\nRun it again? [y/N] ").await?;
        output.flush().await?;

        let again = lines.next_line().await?.unwrap_or_default();
        if !matches!(again.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
            return Ok(());
        }
        debug!("starting another round");
    }
}

/// Ask questions until the quiz ends. Returns `false` if input ran out first.
async fn play<R, W>(
    handle: &QuizHandle,
    lines: &mut Lines<R>,
    output: &mut W,
) -> Result<bool, AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        let snapshot = handle.snapshot();
        let (Some(progress), Some(question)) =
            (snapshot.progress_label(), snapshot.current_question.as_ref())
        else {
            return Ok(true);
        };

        let mut prompt = String::new();
        if snapshot.health.is_degraded() {
            prompt.push_str(DEGRADED_NOTICE);
            prompt.push('\n');
        }
        prompt.push_str(&format!("\n{progress}\n{}\n> ", question.text()));
        output.write_all(prompt.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            return Ok(false);
        };
        if line.trim().is_empty() {
            output.write_all(b"Please type an answer.\n").await?;
            continue;
        }

        output.write_all(b"Grading...\n").await?;
        output.flush().await?;

        let message = match handle.submit_answer(&line).await {
            Ok(result) if result.outcome.grading_failed() => {
                format!("Could not grade this answer. {}\n", result.outcome.rationale())
            }
            Ok(result) if result.outcome.is_correct() => "Correct.\n".to_string(),
            Ok(result) => format!(
                "Incorrect. Accepted answers: {}\n",
                result.outcome.question().joined_answers()
            ),
            Err(err) => format!("Not submitted: {err}.\n"),
        };
        output.write_all(message.as_bytes()).await?;
    }
}
