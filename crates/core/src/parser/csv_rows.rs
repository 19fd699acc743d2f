use std::io::Read;

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{BankBuilder, Parsed};
use crate::error::ParseError;
use crate::model::{ALL_CHAPTERS, AnswerKey, DEFAULT_CHAPTER, QuestionDraft, QuizSettings};

/// Expected header names; `explanation` may be absent.
pub const CSV_COLUMNS: [&str; 5] = ["chapter", "question", "options", "answer", "explanation"];

const OPTION_SEPARATOR: char = '|';

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    chapter: String,
    #[serde(default)]
    question: String,
    #[serde(default)]
    options: String,
    #[serde(default)]
    answer: String,
    #[serde(default)]
    explanation: String,
}

impl CsvRow {
    fn into_draft(self) -> QuestionDraft {
        let chapter = if self.chapter.is_empty() {
            DEFAULT_CHAPTER.to_owned()
        } else if self.chapter == ALL_CHAPTERS {
            // The aggregate pool owns this key.
            warn!(
                chapter = %self.chapter,
                "renaming csv chapter that clashes with the aggregate pool"
            );
            format!("Chapter {ALL_CHAPTERS}")
        } else {
            self.chapter
        };
        let answer = if self.answer.is_empty() {
            AnswerKey::Missing
        } else {
            AnswerKey::Text(self.answer)
        };
        QuestionDraft {
            chapter,
            text: self.question,
            options: self
                .options
                .split(OPTION_SEPARATOR)
                .map(|o| o.trim().to_owned())
                .filter(|o| !o.is_empty())
                .collect(),
            answer,
            explanation: self.explanation,
        }
    }
}

/// Read one question per CSV row.
///
/// Headers are matched case-insensitively. Rows that are malformed, have no
/// question text or no options are skipped and counted in the report.
///
/// # Errors
///
/// Returns `ParseError::Csv` only when the underlying reader fails.
pub fn parse_csv<R: Read>(reader: R, settings: &QuizSettings) -> Result<Parsed, ParseError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: csv::StringRecord = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_ascii_lowercase())
        .collect();
    for required in &CSV_COLUMNS[1..3] {
        if !headers.iter().any(|h| h == *required) {
            warn!(column = *required, "csv header is missing a column");
        }
    }
    rdr.set_headers(headers);

    let mut builder = BankBuilder::new(settings);
    for (row_no, result) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                warn!(row = row_no + 1, %err, "skipping malformed csv row");
                builder.report_mut().skipped_rows += 1;
                continue;
            }
        };

        let draft = row.into_draft();
        if draft.text.is_empty() || draft.options.is_empty() {
            debug!(row = row_no + 1, "skipping csv row without question or options");
            builder.report_mut().skipped_rows += 1;
            continue;
        }
        builder.add(draft);
    }

    let parsed = builder.finish();
    info!(
        questions = parsed.report.questions,
        chapters = parsed.report.chapters,
        skipped_rows = parsed.report.skipped_rows,
        "parsed question csv"
    );
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OPTION_COUNT;

    fn run(csv: &str) -> Parsed {
        parse_csv(csv.as_bytes(), &QuizSettings::default()).unwrap()
    }

    #[test]
    fn sebi_row() {
        let parsed = run(
            "chapter,question,options,answer,explanation\n\
             1,What is SEBI?,RBI|SEBI|MoF|IRDA,SEBI,SEBI regulates markets\n",
        );
        let questions = parsed.bank.questions("1").unwrap();
        assert_eq!(questions.len(), 1);
        let q = &questions[0];
        assert_eq!(q.options(), ["RBI", "SEBI", "MoF", "IRDA"]);
        assert_eq!(q.answer(), "SEBI");
        assert_eq!(q.explanation(), "SEBI regulates markets");
        assert_eq!(parsed.report.guessed_answers(), 0);
    }

    #[test]
    fn headers_are_case_insensitive_and_explanation_optional() {
        let parsed = run("Chapter,Question,Options,Answer\nCh 1,Who?,a|b,b\n");
        let q = &parsed.bank.all()[0];
        assert_eq!(q.answer(), "b");
        assert_eq!(q.explanation(), "");
        assert_eq!(q.options().len(), OPTION_COUNT);
    }

    #[test]
    fn letter_answer_maps_by_index() {
        let parsed = run("chapter,question,options,answer\nx,Which?,red|green|blue,C\n");
        assert_eq!(parsed.bank.all()[0].answer(), "blue");
    }

    #[test]
    fn unknown_answer_falls_back_to_first_option() {
        let parsed = run("chapter,question,options,answer\nx,Which?,red|green,purple\n");
        assert_eq!(parsed.bank.all()[0].answer(), "red");
        assert_eq!(parsed.report.unmatched_answers, 1);
    }

    #[test]
    fn empty_chapter_goes_to_general() {
        let parsed = run("chapter,question,options,answer\n,Which?,red|green,red\n");
        assert!(parsed.bank.has_chapter(DEFAULT_CHAPTER));
    }

    #[test]
    fn chapter_named_like_the_aggregate_is_renamed() {
        let parsed = run(
            "chapter,question,options,answer\n\
             All,Which?,red|green,red\n\
             Ch 2,Who?,a|b,a\n",
        );
        assert!(parsed.bank.has_chapter("Chapter All"));
        assert!(parsed.bank.chapters().all(|c| c != ALL_CHAPTERS));
        assert_eq!(parsed.bank.questions("Chapter All").map(<[_]>::len), Some(1));
        assert_eq!(parsed.bank.questions(ALL_CHAPTERS).map(<[_]>::len), Some(2));
    }

    #[test]
    fn rows_without_question_or_options_are_skipped() {
        let parsed = run(
            "chapter,question,options,answer\n\
             x,,a|b,a\n\
             x,No options?,,a\n\
             x,Fine?,a|b,a\n",
        );
        assert_eq!(parsed.bank.len(), 1);
        assert_eq!(parsed.report.skipped_rows, 2);
    }

    #[test]
    fn rows_with_wrong_field_count_are_skipped() {
        let parsed = run(
            "chapter,question,options,answer\n\
             x,Short?\n\
             x,Fine?,a|b,a\n",
        );
        assert_eq!(parsed.bank.len(), 1);
        assert_eq!(parsed.report.skipped_rows, 1);
    }
}
