use tracing::{debug, info, trace};

use super::lines::{Line, chapter_label, classify};
use super::{BankBuilder, Parsed};
use crate::model::{AnswerKey, DEFAULT_CHAPTER, QuestionDraft, QuizSettings};

/// Fields collected for the question currently being read.
#[derive(Debug, Default)]
struct Pending {
    text: String,
    options: Vec<String>,
    answer: Option<char>,
    explanation: Vec<String>,
}

impl Pending {
    fn start(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            ..Self::default()
        }
    }

    fn into_draft(self, chapter: &str) -> QuestionDraft {
        QuestionDraft {
            chapter: chapter.to_owned(),
            text: self.text,
            options: self.options,
            answer: self.answer.map_or(AnswerKey::Missing, AnswerKey::Letter),
            explanation: self.explanation.join(" "),
        }
    }
}

/// Single pass over extracted text.
///
/// A question stays open until the next question line, chapter header or the
/// end of input; only then is it converted (or dropped, if it never got any
/// options). Lines that match no pattern are explanation text for the open
/// question and are ignored otherwise.
#[must_use]
pub fn parse_text(raw_text: &str, settings: &QuizSettings) -> Parsed {
    let mut builder = BankBuilder::new(settings);
    let mut chapter = DEFAULT_CHAPTER.to_owned();
    let mut pending: Option<Pending> = None;

    let lines = raw_text.lines().map(str::trim).filter(|l| !l.is_empty());
    for (line_no, line) in lines.enumerate() {
        let kind = classify(line);
        trace!(line_no, kind = kind.kind(), "classified line");

        match kind {
            Line::Chapter { number, title } => {
                flush(&mut builder, &chapter, pending.take());
                chapter = chapter_label(number, title);
                debug!(%chapter, "entering chapter");
            }
            Line::Question { text } => {
                flush(&mut builder, &chapter, pending.take());
                pending = Some(Pending::start(text));
            }
            Line::KeyRow { letter } | Line::Answer { letter } => match pending.as_mut() {
                Some(p) => p.answer = Some(letter),
                None => builder.report_mut().ignored_lines += 1,
            },
            Line::Option { text, .. } => match pending.as_mut() {
                Some(p) => p.options.push(text.to_owned()),
                None => builder.report_mut().ignored_lines += 1,
            },
            Line::Explanation { text } | Line::Other(text) => match pending.as_mut() {
                Some(p) => p.explanation.push(text.to_owned()),
                None => builder.report_mut().ignored_lines += 1,
            },
        }
    }
    flush(&mut builder, &chapter, pending.take());

    let parsed = builder.finish();
    info!(
        questions = parsed.report.questions,
        chapters = parsed.report.chapters,
        dropped = parsed.report.dropped_fragments,
        guessed_answers = parsed.report.guessed_answers(),
        "parsed question text"
    );
    parsed
}

fn flush(builder: &mut BankBuilder, chapter: &str, pending: Option<Pending>) {
    if let Some(p) = pending {
        builder.add(p.into_draft(chapter));
    }
}
