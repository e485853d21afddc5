use std::io::Write;
use std::time::Duration;

use quiz_core::model::{Choice, ResultCode, TallyEntry};
use services::{Landing, QuizCompletion, QuizFlow, SelectOutcome};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

type BoxError = Box<dyn std::error::Error>;

/// One line of user input during the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Pick(Choice),
    Previous,
    Quit,
}

fn parse_input(line: &str) -> Option<Input> {
    match line.trim().to_ascii_lowercase().as_str() {
        "a" | "1" => Some(Input::Pick(Choice::A)),
        "b" | "2" => Some(Input::Pick(Choice::B)),
        "p" | "prev" | "back" => Some(Input::Previous),
        "q" | "quit" => Some(Input::Quit),
        _ => None,
    }
}

/// Run the quiz until it is finished or the user quits.
///
/// A finished quiz on record is shown instead of starting over; `reset`
/// clears it.
pub async fn take<R, W>(
    flow: &mut QuizFlow,
    input: &mut R,
    out: &mut W,
    select_delay: Duration,
) -> Result<(), BoxError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    match flow.landing() {
        Landing::ShowResult(code) => {
            writeln!(out, "You already finished the quiz. Run `reset` to take it again.")?;
            let completion = flow.finish().await?;
            debug_assert_eq!(completion.code, code);
            print_completion(out, &completion)?;
            return Ok(());
        }
        Landing::Continue { position } => {
            writeln!(out, "Picking up at question {}.", position + 1)?;
        }
        Landing::Start => {}
    }

    let mut line = String::new();
    loop {
        let quiz = flow.quiz();
        let Some(question) = quiz.current_question() else {
            break;
        };
        let progress = quiz.progress();
        writeln!(out)?;
        writeln!(
            out,
            "Q{}/{} ({}%)  {}",
            progress.position + 1,
            progress.total,
            progress.percent(),
            question.text()
        )?;
        let marked = quiz.existing_choice();
        for choice in [Choice::A, Choice::B] {
            let mark = if marked == Some(choice) { '*' } else { ' ' };
            writeln!(out, " {mark}{choice}) {}", question.option(choice).text())?;
        }
        write!(out, "[a/b, p = previous, q = quit] > ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line).await? == 0 {
            writeln!(out)?;
            return Ok(());
        }

        match parse_input(&line) {
            Some(Input::Pick(choice)) => {
                tokio::time::sleep(select_delay).await;
                let SelectOutcome { added, was_last } = flow.quiz_mut().select(choice).await?;
                if was_last {
                    break;
                }
                if !added {
                    flow.quiz_mut().go_forward().await;
                }
            }
            Some(Input::Previous) => {
                if !flow.quiz_mut().go_back().await {
                    writeln!(out, "Already at the first question.")?;
                }
            }
            Some(Input::Quit) => {
                writeln!(out, "Progress saved. Run again to continue.")?;
                return Ok(());
            }
            None => writeln!(out, "Please answer a or b.")?,
        }
    }

    if !flow.quiz().progress().is_complete {
        let position = first_unanswered(flow);
        flow.quiz_mut().set_position(position).await;
        writeln!(out, "Some questions are still open. Run again to finish.")?;
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "Analysing your answers...")?;
    let completion = flow.finish().await?;
    print_completion(out, &completion)?;
    Ok(())
}

fn first_unanswered(flow: &QuizFlow) -> usize {
    let quiz = flow.quiz();
    quiz.catalog()
        .iter()
        .position(|q| quiz.session().answer_for(q.id()).is_none())
        .unwrap_or(0)
}

fn print_completion<W: Write>(out: &mut W, completion: &QuizCompletion) -> Result<(), BoxError> {
    writeln!(out, "Your type: {}", completion.code)?;
    writeln!(
        out,
        "{}% of {} participants share it (rank {} of 16).",
        completion.percentage, completion.total_count, completion.rank
    )?;
    Ok(())
}

/// Print the last finished result, if any.
pub fn show_result<W: Write>(flow: &QuizFlow, out: &mut W) -> Result<(), BoxError> {
    let Some(code) = flow.quiz().completed_result() else {
        writeln!(out, "No finished quiz yet. Run `take` to start.")?;
        return Ok(());
    };
    let tally = flow.tally();
    writeln!(out, "Your type: {code}")?;
    writeln!(
        out,
        "{}% of {} participants share it (rank {} of 16).",
        tally.percentage(code),
        tally.total_count(),
        tally.rank(code)
    )?;
    Ok(())
}

/// Print the full distribution plus the most and least common types.
pub fn show_stats<W: Write>(flow: &QuizFlow, out: &mut W) -> Result<(), BoxError> {
    let tally = flow.tally();
    let mine = flow.quiz().completed_result();

    writeln!(out, "Participants: {}", tally.total_count())?;
    writeln!(out)?;
    for entry in tally.rankings() {
        write_entry(out, &entry, mine)?;
    }
    writeln!(out)?;
    writeln!(out, "Most common:")?;
    for entry in tally.top(3) {
        write_entry(out, &entry, mine)?;
    }
    writeln!(out, "Rarest:")?;
    for entry in tally.bottom(3) {
        write_entry(out, &entry, mine)?;
    }
    Ok(())
}

fn write_entry<W: Write>(
    out: &mut W,
    entry: &TallyEntry,
    mine: Option<ResultCode>,
) -> Result<(), BoxError> {
    let marker = if mine == Some(entry.code) { "  <- you" } else { "" };
    writeln!(
        out,
        "{:>2}. {}  {:>6}  {:>5.1}%{marker}",
        entry.rank, entry.code, entry.count, entry.percentage
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use quiz_core::{FixedSeed, QuestionCatalog};
    use storage::repository::Storage;

    async fn flow(storage: &Storage) -> QuizFlow {
        QuizFlow::open(
            storage,
            Arc::new(QuestionCatalog::standard()),
            &mut FixedSeed::uniform(100),
        )
        .await
        .unwrap()
    }

    async fn run(flow: &mut QuizFlow, script: &str) -> String {
        let mut input = script.as_bytes();
        let mut out = Vec::new();
        take(flow, &mut input, &mut out, Duration::ZERO).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parses_answers_and_commands() {
        assert_eq!(parse_input(" A\n"), Some(Input::Pick(Choice::A)));
        assert_eq!(parse_input("2"), Some(Input::Pick(Choice::B)));
        assert_eq!(parse_input("p"), Some(Input::Previous));
        assert_eq!(parse_input("quit"), Some(Input::Quit));
        assert_eq!(parse_input("c"), None);
    }

    #[tokio::test]
    async fn full_run_prints_result() {
        let storage = Storage::in_memory();
        let mut flow = flow(&storage).await;
        let output = run(&mut flow, &"b\n".repeat(12)).await;

        assert!(output.contains("Your type: INFP"), "{output}");
        assert!(output.contains("of 1601 participants"), "{output}");
        assert_eq!(flow.tally().total_count(), 1601);
    }

    #[tokio::test(start_paused = true)]
    async fn answer_is_committed_after_the_delay() {
        let storage = Storage::in_memory();
        let mut flow = flow(&storage).await;
        let mut input = "a\n".as_bytes();
        let mut out = Vec::new();

        let cut_short = tokio::time::timeout(
            Duration::from_millis(100),
            take(&mut flow, &mut input, &mut out, Duration::from_millis(300)),
        )
        .await;
        assert!(cut_short.is_err());
        assert_eq!(flow.quiz().session().answered_count(), 0);
        assert_eq!(flow.quiz().session().position(), 0);

        let mut input = "a\nq\n".as_bytes();
        take(&mut flow, &mut input, &mut out, Duration::from_millis(300))
            .await
            .unwrap();
        assert_eq!(flow.quiz().session().answered_count(), 1);
    }

    #[tokio::test]
    async fn quit_keeps_progress_and_resumes() {
        let storage = Storage::in_memory();
        let mut flow = flow(&storage).await;
        let output = run(&mut flow, "a\na\nq\n").await;
        assert!(output.contains("Progress saved"), "{output}");
        assert_eq!(flow.quiz().session().position(), 2);

        let mut resumed = self::flow(&storage).await;
        let output = run(&mut resumed, &"a\n".repeat(10)).await;
        assert!(output.contains("Picking up at question 3"), "{output}");
        assert!(output.contains("Your type: ESTJ"), "{output}");
    }

    #[tokio::test]
    async fn going_back_and_changing_an_answer() {
        let storage = Storage::in_memory();
        let mut flow = flow(&storage).await;
        // q1 a, back, q1 b, then a for the rest
        let script = format!("a\np\nb\n{}", "a\n".repeat(11));
        let output = run(&mut flow, &script).await;
        assert!(output.contains("Your type: ESTJ"), "{output}");
        assert_eq!(flow.quiz().session().answered_count(), 12);
    }

    #[tokio::test]
    async fn finished_quiz_is_not_counted_again() {
        let storage = Storage::in_memory();
        let mut flow = flow(&storage).await;
        run(&mut flow, &"a\n".repeat(12)).await;

        let output = run(&mut flow, "").await;
        assert!(output.contains("already finished"), "{output}");
        assert_eq!(flow.tally().total_count(), 1601);
    }

    #[tokio::test]
    async fn stats_highlight_own_result() {
        let storage = Storage::in_memory();
        let mut flow = flow(&storage).await;
        run(&mut flow, &"b\n".repeat(12)).await;

        let mut out = Vec::new();
        show_stats(&flow, &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("Participants: 1601"), "{output}");
        assert!(output.contains(" 1. INFP"), "{output}");
        assert!(output.contains("<- you"), "{output}");
    }
}
