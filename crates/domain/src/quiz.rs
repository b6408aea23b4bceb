//! Guild sorting quiz.
//!
//! Question content comes from the caller. Each option carries a weight map
//! keyed by guild key; the guild with the highest summed weight wins.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::value_objects::{GuildId, GUILD_DECLARATION_ORDER};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub text: String,
    /// Guild key to weight. Keys that name no guild are ignored.
    pub weights: HashMap<String, i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: Vec<QuizOption>,
}

/// One recorded answer: question index and chosen option index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswer {
    pub question: usize,
    pub option: usize,
}

/// Per-guild weight totals in declaration order.
pub fn score_answers(answers: &[QuizAnswer], questions: &[QuizQuestion]) -> [i64; 4] {
    let mut scores = [0i64; 4];
    let chosen = answers.iter().filter_map(|a| {
        questions
            .get(a.question)
            .and_then(|q| q.options.get(a.option))
    });
    for option in chosen {
        for (key, weight) in &option.weights {
            if let Ok(guild) = key.parse::<GuildId>() {
                scores[guild.declaration_index()] += i64::from(*weight);
            }
        }
    }
    scores
}

/// Best-fit guild for a set of answers.
///
/// Out-of-range answers are skipped. Ties, including all-zero totals, go to
/// the earliest guild in [`GUILD_DECLARATION_ORDER`].
pub fn assign_guild(answers: &[QuizAnswer], questions: &[QuizQuestion]) -> GuildId {
    let scores = score_answers(answers, questions);
    let mut best = GUILD_DECLARATION_ORDER[0];
    let mut best_score = scores[0];
    for (guild, score) in GUILD_DECLARATION_ORDER.iter().zip(scores).skip(1) {
        if score > best_score {
            best = *guild;
            best_score = score;
        }
    }
    best
}

/// One student's quiz attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    answers: Vec<Option<usize>>,
}

impl QuizSession {
    pub fn start(questions: Vec<QuizQuestion>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        let answers = vec![None; questions.len()];
        Ok(Self { questions, answers })
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    /// Record or replace the answer to one question.
    pub fn answer(&mut self, question: usize, option: usize) -> Result<(), QuizError> {
        let count = self.questions.len();
        let q = self
            .questions
            .get(question)
            .ok_or(QuizError::QuestionOutOfRange {
                index: question,
                count,
            })?;
        if option >= q.options.len() {
            return Err(QuizError::OptionOutOfRange {
                question,
                option,
                count: q.options.len(),
            });
        }
        self.answers[question] = Some(option);
        Ok(())
    }

    pub fn answered(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.answered() == self.questions.len()
    }

    pub fn answers(&self) -> Vec<QuizAnswer> {
        self.answers
            .iter()
            .enumerate()
            .filter_map(|(question, option)| option.map(|option| QuizAnswer { question, option }))
            .collect()
    }

    /// Running totals for each guild, in declaration order.
    pub fn scores(&self) -> Vec<(GuildId, i64)> {
        GUILD_DECLARATION_ORDER
            .iter()
            .copied()
            .zip(score_answers(&self.answers(), &self.questions))
            .collect()
    }

    pub fn finish(&self) -> Result<GuildId, QuizError> {
        if !self.is_complete() {
            return Err(QuizError::Incomplete {
                answered: self.answered(),
                total: self.questions.len(),
            });
        }
        Ok(assign_guild(&self.answers(), &self.questions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(weights: &[(&str, i32)]) -> QuizOption {
        QuizOption {
            text: String::new(),
            weights: weights.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    fn questions() -> Vec<QuizQuestion> {
        vec![
            QuizQuestion {
                prompt: "A friend is stuck on a puzzle".into(),
                options: vec![
                    option(&[("ember", 2)]),
                    option(&[("tide", 2), ("grove", 1)]),
                ],
            },
            QuizQuestion {
                prompt: "Pick a place".into(),
                options: vec![
                    option(&[("storm", 3)]),
                    option(&[("grove", 2)]),
                    option(&[("nowhere", 50)]),
                ],
            },
        ]
    }

    #[test]
    fn strict_maximum_wins() {
        let answers = [
            QuizAnswer {
                question: 0,
                option: 1,
            },
            QuizAnswer {
                question: 1,
                option: 1,
            },
        ];
        assert_eq!(assign_guild(&answers, &questions()), GuildId::Grove);
    }

    #[test]
    fn all_zero_weights_go_to_first_declared_guild() {
        assert_eq!(assign_guild(&[], &questions()), GuildId::Ember);
    }

    #[test]
    fn ties_go_to_earlier_declared_guild() {
        // ember 2 vs grove 2
        let answers = [
            QuizAnswer {
                question: 0,
                option: 0,
            },
            QuizAnswer {
                question: 1,
                option: 1,
            },
        ];
        assert_eq!(assign_guild(&answers, &questions()), GuildId::Ember);
    }

    #[test]
    fn unknown_keys_and_out_of_range_answers_are_ignored() {
        let answers = [
            QuizAnswer {
                question: 1,
                option: 2,
            },
            QuizAnswer {
                question: 9,
                option: 0,
            },
            QuizAnswer {
                question: 0,
                option: 7,
            },
        ];
        assert_eq!(score_answers(&answers, &questions()), [0, 0, 0, 0]);
    }

    #[test]
    fn assignment_is_deterministic() {
        let answers = [QuizAnswer {
            question: 1,
            option: 0,
        }];
        let first = assign_guild(&answers, &questions());
        for _ in 0..10 {
            assert_eq!(assign_guild(&answers, &questions()), first);
        }
        assert_eq!(first, GuildId::Storm);
    }

    mod session {
        use super::*;

        #[test]
        fn empty_quiz_is_rejected() {
            assert_eq!(QuizSession::start(vec![]), Err(QuizError::NoQuestions));
        }

        #[test]
        fn finish_requires_every_answer() {
            let mut session = QuizSession::start(questions()).unwrap();
            session.answer(0, 1).unwrap();
            assert!(!session.is_complete());
            assert_eq!(
                session.finish(),
                Err(QuizError::Incomplete {
                    answered: 1,
                    total: 2
                })
            );

            session.answer(1, 0).unwrap();
            assert!(session.is_complete());
            assert_eq!(session.finish(), Ok(GuildId::Storm));
        }

        #[test]
        fn invalid_indices_are_rejected() {
            let mut session = QuizSession::start(questions()).unwrap();
            assert_eq!(
                session.answer(5, 0),
                Err(QuizError::QuestionOutOfRange { index: 5, count: 2 })
            );
            assert_eq!(
                session.answer(0, 2),
                Err(QuizError::OptionOutOfRange {
                    question: 0,
                    option: 2,
                    count: 2
                })
            );
            assert_eq!(session.answered(), 0);
        }

        #[test]
        fn re_answering_replaces_previous_choice() {
            let mut session = QuizSession::start(questions()).unwrap();
            session.answer(0, 0).unwrap();
            session.answer(0, 1).unwrap();
            let scores = session.scores();
            assert_eq!(scores[0], (GuildId::Ember, 0));
            assert_eq!(scores[1], (GuildId::Tide, 2));
            assert_eq!(scores[2], (GuildId::Grove, 1));
        }
    }
}
