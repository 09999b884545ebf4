//! The exam session state machine.
//!
//! A [`Session`] owns the loaded question pool, the active (possibly shuffled
//! or subsetted) question set, the recorded answers, the navigation cursor,
//! and the exam lifecycle flags. Every operation is a complete synchronous
//! transition; the only asynchronous input is the countdown, which is fed in
//! one tick at a time through [`Session::update_time_remaining`].
//!
//! Overwrite semantics are intentional: re-answering a question replaces the
//! previous answer, and loading a new question set replaces the old one
//! wholesale, whoever asked for it last.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::SessionError;
use crate::model::{
    AnswerStatus, ExamConfig, ExamConfigUpdate, ExamStats, Mode, Question, QuestionId,
    SessionState, TileStatus, UserAnswer,
};
use crate::sample::sample_questions;
use crate::statistics::compute_stats;
use crate::storage::AnswerSnapshot;

/// The session aggregate.
#[derive(Debug, Clone)]
pub struct Session {
    mode: Mode,
    questions: Vec<Question>,
    original: Vec<Question>,
    answers: BTreeMap<QuestionId, UserAnswer>,
    selected: Option<QuestionId>,
    view_open: bool,
    config: ExamConfig,
    started_at: Option<DateTime<Utc>>,
    remaining_secs: Option<i64>,
    started: bool,
    finished: bool,
    results_visible: bool,
    time_expired: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Session {
    /// A practice session over `questions`.
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            mode: Mode::Practice,
            original: questions.clone(),
            questions,
            answers: BTreeMap::new(),
            selected: None,
            view_open: false,
            config: ExamConfig::default(),
            started_at: None,
            remaining_secs: None,
            started: false,
            finished: false,
            results_visible: false,
            time_expired: false,
        }
    }

    /// A practice session over the bundled sample corpus.
    pub fn with_sample() -> Self {
        Self::new(sample_questions())
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Replace the question pool. Clears answers and closes the question view.
    pub fn load_questions(&mut self, questions: Vec<Question>) {
        tracing::info!(
            "loading {} question(s), replacing {}",
            questions.len(),
            self.original.len()
        );
        self.original = questions.clone();
        self.questions = questions;
        self.answers.clear();
        self.selected = None;
        self.view_open = false;
    }

    // -----------------------------------------------------------------------
    // Mode and exam lifecycle
    // -----------------------------------------------------------------------

    /// Switch mode. Entering exam mode always lands in the not-started state
    /// with answers cleared; entering practice leaves exam flags alone.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        if mode == Mode::Exam {
            self.started = false;
            self.finished = false;
            self.results_visible = false;
            self.time_expired = false;
            self.started_at = None;
            self.remaining_secs = None;
            self.answers.clear();
        }
        tracing::debug!("mode set to {mode}");
    }

    /// Apply a partial configuration update. Not validated here; see
    /// [`ExamConfig::validate`] and [`Session::start_exam`].
    pub fn set_exam_config(&mut self, update: ExamConfigUpdate) {
        self.config.apply(update);
    }

    /// Start a timed exam with a thread-local RNG.
    pub fn start_exam(&mut self) -> Result<(), SessionError> {
        self.start_exam_with_rng(&mut rand::thread_rng())
    }

    /// Start a timed exam: draw `question_count` questions from the pool in
    /// random order and reset answers, navigation, and the timer.
    ///
    /// Only allowed from [`SessionState::ExamNotStarted`]. Fails without
    /// touching the session when the state is wrong, the configuration is out
    /// of range or the pool is empty. Asking for more questions than the pool
    /// holds silently uses the whole pool.
    pub fn start_exam_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), SessionError> {
        self.require_state(SessionState::ExamNotStarted, "start an exam")?;
        self.begin_exam(rng)
    }

    /// Draw a fresh subset and start over.
    pub fn restart_exam(&mut self) -> Result<(), SessionError> {
        self.restart_exam_with_rng(&mut rand::thread_rng())
    }

    /// Like [`Session::start_exam_with_rng`], but only from
    /// [`SessionState::ExamFinished`].
    pub fn restart_exam_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), SessionError> {
        self.require_state(SessionState::ExamFinished, "restart the exam")?;
        tracing::debug!("restarting exam");
        self.begin_exam(rng)
    }

    fn require_state(&self, expected: SessionState, action: &'static str) -> Result<(), SessionError> {
        let state = self.state();
        if state != expected {
            tracing::debug!("{action} rejected in state {state}");
            return Err(SessionError::WrongState { action, state });
        }
        Ok(())
    }

    fn begin_exam<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), SessionError> {
        self.config.validate()?;
        if self.original.is_empty() {
            return Err(SessionError::NoQuestions);
        }

        let count = self.config.question_count as usize;
        if count > self.original.len() {
            tracing::warn!(
                "requested {count} questions but only {} are loaded; using all of them",
                self.original.len()
            );
        }

        let mut drawn = self.original.clone();
        drawn.shuffle(rng);
        drawn.truncate(count);

        self.questions = drawn;
        self.answers.clear();
        self.selected = None;
        self.view_open = false;
        self.started_at = Some(Utc::now());
        self.remaining_secs = Some(self.config.time_limit_secs());
        self.started = true;
        self.finished = false;
        self.results_visible = false;
        self.time_expired = false;

        tracing::info!(
            "exam started: {} question(s), {} minute(s)",
            self.questions.len(),
            self.config.time_limit
        );
        Ok(())
    }

    /// Submit the running exam. Returns `false` if no exam was in progress.
    pub fn finish_exam(&mut self) -> bool {
        if !self.started || self.finished {
            tracing::debug!("finish ignored: no exam in progress");
            return false;
        }

        self.finished = true;
        self.results_visible = true;
        self.remaining_secs = Some(0);

        let stats = self.stats();
        tracing::info!(
            "exam finished: {}/{} correct ({}%)",
            stats.correct,
            stats.total,
            stats.percentage
        );
        true
    }

    /// Hide the results summary. Idempotent.
    pub fn close_exam_results(&mut self) {
        self.results_visible = false;
    }

    /// Feed the countdown. Values below zero are clamped; updates are
    /// ignored once the timer is unset or already at zero. Reaching zero
    /// finishes the exam, and only the first such update does so.
    ///
    /// Returns `true` when this update expired the exam.
    pub fn update_time_remaining(&mut self, secs: i64) -> bool {
        match self.remaining_secs {
            None | Some(0) => return false,
            Some(_) => {}
        }

        let secs = secs.max(0);
        self.remaining_secs = Some(secs);

        if secs == 0 && !self.finished {
            tracing::info!("time is up");
            self.time_expired = true;
            return self.finish_exam();
        }
        false
    }

    /// One second elapsed.
    pub fn tick(&mut self) -> bool {
        match self.remaining_secs {
            Some(secs) => self.update_time_remaining(secs - 1),
            None => false,
        }
    }

    // -----------------------------------------------------------------------
    // Answers
    // -----------------------------------------------------------------------

    /// Record an answer for a question in the active set, replacing any
    /// previous answer. Unknown question ids are ignored.
    ///
    /// Returns the recorded answer.
    pub fn answer_question(&mut self, question_id: QuestionId, option_id: &str) -> Option<&UserAnswer> {
        let Some(question) = self.questions.iter().find(|q| q.id == question_id) else {
            tracing::debug!("answer ignored: question {question_id} is not in the active set");
            return None;
        };

        let answer = UserAnswer {
            question_id,
            selected_option_id: option_id.to_string(),
            is_correct: question.is_correct(option_id),
        };
        self.answers.insert(question_id, answer);
        self.answers.get(&question_id)
    }

    /// Clear answers and close the question view.
    pub fn reset_answers(&mut self) {
        self.answers.clear();
        self.selected = None;
        self.view_open = false;
    }

    // -----------------------------------------------------------------------
    // Ordering
    // -----------------------------------------------------------------------

    /// Shuffle the active set in place with a thread-local RNG.
    pub fn shuffle_questions(&mut self) {
        self.shuffle_questions_with_rng(&mut rand::thread_rng());
    }

    /// Shuffle the active set in place. The pool is untouched.
    pub fn shuffle_questions_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.questions.shuffle(rng);
    }

    /// Restore the active set to a copy of the pool and clear answers.
    pub fn reset_to_original(&mut self) {
        self.questions = self.original.clone();
        self.answers.clear();
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Select a question and open its view. Unknown ids are ignored.
    pub fn open_question(&mut self, question_id: QuestionId) -> bool {
        if self.index_of(question_id).is_none() {
            tracing::debug!("open ignored: question {question_id} is not in the active set");
            return false;
        }
        self.selected = Some(question_id);
        self.view_open = true;
        true
    }

    /// Close the question view and drop the selection.
    pub fn close_question(&mut self) {
        self.view_open = false;
        self.selected = None;
    }

    /// Move to the next question, wrapping around.
    pub fn next_question(&mut self) {
        self.step(1);
    }

    /// Move to the previous question, wrapping around.
    pub fn previous_question(&mut self) {
        self.step(-1);
    }

    fn step(&mut self, delta: isize) {
        let Some(current) = self.selected else {
            return;
        };
        let Some(index) = self.index_of(current) else {
            tracing::debug!("navigation ignored: selected question {current} is stale");
            return;
        };

        let len = self.questions.len() as isize;
        let target = (index as isize + delta).rem_euclid(len) as usize;
        self.selected = Some(self.questions[target].id);
    }

    fn index_of(&self, question_id: QuestionId) -> Option<usize> {
        self.questions.iter().position(|q| q.id == question_id)
    }

    // -----------------------------------------------------------------------
    // Derived views
    // -----------------------------------------------------------------------

    pub fn state(&self) -> SessionState {
        match self.mode {
            Mode::Practice => SessionState::Practice,
            Mode::Exam if self.finished => SessionState::ExamFinished,
            Mode::Exam if self.started => SessionState::ExamInProgress,
            Mode::Exam => SessionState::ExamNotStarted,
        }
    }

    pub fn answer_status(&self, question_id: QuestionId) -> AnswerStatus {
        match self.answers.get(&question_id) {
            None => AnswerStatus::Unanswered,
            Some(a) if a.is_correct => AnswerStatus::Correct,
            Some(_) => AnswerStatus::Incorrect,
        }
    }

    /// Whether correctness may be shown right now.
    pub fn reveals_correctness(&self) -> bool {
        matches!(
            self.state(),
            SessionState::Practice | SessionState::ExamFinished
        )
    }

    /// Tile status for a question, withholding correctness during an exam.
    pub fn tile_status(&self, question_id: QuestionId) -> TileStatus {
        let status = self.answer_status(question_id);
        if self.reveals_correctness() {
            match status {
                AnswerStatus::Unanswered => TileStatus::Unanswered,
                AnswerStatus::Correct => TileStatus::Correct,
                AnswerStatus::Incorrect => TileStatus::Incorrect,
            }
        } else if status == AnswerStatus::Unanswered {
            TileStatus::Unanswered
        } else {
            TileStatus::Answered
        }
    }

    /// Tile statuses of the active set, in order.
    pub fn tiles(&self) -> Vec<(QuestionId, TileStatus)> {
        self.questions
            .iter()
            .map(|q| (q.id, self.tile_status(q.id)))
            .collect()
    }

    pub fn stats(&self) -> ExamStats {
        compute_stats(&self.questions, &self.answers)
    }

    /// The selected question, if any.
    pub fn current_question(&self) -> Option<&Question> {
        let id = self.selected?;
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn question(&self, question_id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    // -----------------------------------------------------------------------
    // Persistence boundary
    // -----------------------------------------------------------------------

    /// The only part of a session that is persisted.
    pub fn answer_snapshot(&self) -> AnswerSnapshot {
        AnswerSnapshot::new(self.answers.clone())
    }

    /// Replace answers with a persisted snapshot. Correctness flags are
    /// taken as stored.
    pub fn restore_answers(&mut self, snapshot: AnswerSnapshot) {
        tracing::debug!("restoring {} persisted answer(s)", snapshot.answers.len());
        self.answers = snapshot.answers;
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn original_questions(&self) -> &[Question] {
        &self.original
    }

    pub fn answers(&self) -> &BTreeMap<QuestionId, UserAnswer> {
        &self.answers
    }

    pub fn answer(&self, question_id: QuestionId) -> Option<&UserAnswer> {
        self.answers.get(&question_id)
    }

    pub fn selected_question_id(&self) -> Option<QuestionId> {
        self.selected
    }

    pub fn is_view_open(&self) -> bool {
        self.view_open
    }

    pub fn config(&self) -> ExamConfig {
        self.config
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn remaining_secs(&self) -> Option<i64> {
        self.remaining_secs
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn results_visible(&self) -> bool {
        self.results_visible
    }

    /// Whether the exam ended because the countdown reached zero.
    pub fn time_expired(&self) -> bool {
        self.time_expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionOption;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn pool(n: i64) -> Vec<Question> {
        (1..=n)
            .map(|id| Question {
                id,
                text: format!("Question {id}"),
                options: vec![
                    QuestionOption::new("A", "first"),
                    QuestionOption::new("B", "second"),
                    QuestionOption::new("C", "third"),
                ],
                correct_option_id: "B".into(),
            })
            .collect()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn exam_session(pool_size: i64, count: u32, minutes: u32) -> Session {
        let mut session = Session::new(pool(pool_size));
        session.set_mode(Mode::Exam);
        session.set_exam_config(ExamConfigUpdate {
            question_count: Some(count),
            time_limit: Some(minutes),
        });
        session
    }

    #[test]
    fn new_session_is_practice() {
        let session = Session::new(pool(3));
        assert_eq!(session.state(), SessionState::Practice);
        assert_eq!(session.questions().len(), 3);
        assert_eq!(session.original_questions().len(), 3);
        assert!(session.remaining_secs().is_none());
    }

    #[test]
    fn start_exam_scenario() {
        let mut session = exam_session(20, 10, 5);
        session.start_exam_with_rng(&mut rng()).unwrap();

        assert_eq!(session.questions().len(), 10);
        assert_eq!(session.remaining_secs(), Some(300));
        assert_eq!(session.state(), SessionState::ExamInProgress);
        assert!(session.answers().is_empty());
        assert!(session.started_at().is_some());
    }

    #[test]
    fn exam_draw_is_distinct_subset_of_pool() {
        for count in [10u32, 15, 20, 30, 270] {
            let mut session = exam_session(20, count, 60);
            session.answer_question(1, "B");
            session.start_exam_with_rng(&mut rng()).unwrap();

            let ids: HashSet<_> = session.questions().iter().map(|q| q.id).collect();
            assert_eq!(session.questions().len(), (count as usize).min(20));
            assert_eq!(ids.len(), session.questions().len());
            assert!(ids.iter().all(|id| (1..=20).contains(id)));
            assert!(session.answers().is_empty());
            assert_eq!(session.original_questions().len(), 20);
        }
    }

    #[test]
    fn invalid_config_leaves_session_untouched() {
        let mut session = exam_session(20, 5, 60);
        session.answer_question(3, "A");
        let before = session.questions().to_vec();

        let err = session.start_exam_with_rng(&mut rng()).unwrap_err();
        assert!(matches!(err, SessionError::InvalidConfig(_)));
        assert_eq!(session.state(), SessionState::ExamNotStarted);
        assert_eq!(session.questions(), before.as_slice());
        assert!(session.answer(3).is_some());
    }

    #[test]
    fn empty_pool_cannot_start() {
        let mut session = Session::default();
        session.set_mode(Mode::Exam);
        assert_eq!(session.start_exam(), Err(SessionError::NoQuestions));
    }

    #[test]
    fn start_requires_exam_not_started() {
        let mut session = Session::new(pool(20));
        session.answer_question(1, "B");
        let err = session.start_exam_with_rng(&mut rng()).unwrap_err();
        assert_eq!(
            err,
            SessionError::WrongState {
                action: "start an exam",
                state: SessionState::Practice,
            }
        );
        assert_eq!(session.state(), SessionState::Practice);
        assert!(session.answer(1).is_some());

        let mut session = exam_session(20, 10, 5);
        session.start_exam_with_rng(&mut rng()).unwrap();
        let first = session.questions()[0].id;
        session.answer_question(first, "B");
        session.tick();
        assert!(matches!(
            session.start_exam_with_rng(&mut rng()),
            Err(SessionError::WrongState { state: SessionState::ExamInProgress, .. })
        ));
        assert_eq!(session.answers().len(), 1);
        assert_eq!(session.remaining_secs(), Some(299));
    }

    #[test]
    fn restart_requires_finished_exam() {
        let mut session = exam_session(20, 10, 5);
        assert!(matches!(
            session.restart_exam_with_rng(&mut rng()),
            Err(SessionError::WrongState { state: SessionState::ExamNotStarted, .. })
        ));

        session.start_exam_with_rng(&mut rng()).unwrap();
        let first = session.questions()[0].id;
        session.answer_question(first, "B");
        session.tick();

        let err = session.restart_exam_with_rng(&mut rng()).unwrap_err();
        assert!(err.to_string().contains("exam in progress"));
        assert_eq!(session.state(), SessionState::ExamInProgress);
        assert_eq!(session.answers().len(), 1);
        assert_eq!(session.remaining_secs(), Some(299));
    }

    #[test]
    fn entering_exam_mode_clears_answers() {
        let mut session = Session::new(pool(3));
        session.answer_question(1, "B");
        session.set_mode(Mode::Exam);
        assert_eq!(session.state(), SessionState::ExamNotStarted);
        assert!(session.answers().is_empty());
        assert!(!session.is_started());
    }

    #[test]
    fn entering_practice_keeps_exam_flags() {
        let mut session = exam_session(12, 10, 5);
        session.start_exam_with_rng(&mut rng()).unwrap();
        session.set_mode(Mode::Practice);
        assert_eq!(session.state(), SessionState::Practice);
        assert!(session.is_started());
        assert_eq!(session.remaining_secs(), Some(300));
    }

    #[test]
    fn finish_and_close_results() {
        let mut session = exam_session(12, 10, 5);
        assert!(!session.finish_exam());

        session.start_exam_with_rng(&mut rng()).unwrap();
        assert!(session.finish_exam());
        assert_eq!(session.state(), SessionState::ExamFinished);
        assert!(session.results_visible());
        assert_eq!(session.remaining_secs(), Some(0));
        assert!(!session.time_expired());
        assert!(!session.finish_exam());

        session.close_exam_results();
        session.close_exam_results();
        assert!(!session.results_visible());
        assert_eq!(session.state(), SessionState::ExamFinished);
    }

    #[test]
    fn restart_redraws_and_resets() {
        let mut session = exam_session(30, 10, 5);
        session.start_exam_with_rng(&mut rng()).unwrap();
        let first = session.questions()[0].id;
        session.answer_question(first, "B");
        session.finish_exam();

        session.restart_exam_with_rng(&mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(session.state(), SessionState::ExamInProgress);
        assert!(!session.results_visible());
        assert!(session.answers().is_empty());
        assert_eq!(session.remaining_secs(), Some(300));
        assert_eq!(session.questions().len(), 10);
    }

    #[test]
    fn countdown_expires_exactly_once() {
        let mut session = exam_session(12, 10, 5);
        session.start_exam_with_rng(&mut rng()).unwrap();

        let mut expirations = 0;
        for secs in (0..300).rev() {
            if session.update_time_remaining(secs) {
                expirations += 1;
            }
        }
        assert_eq!(expirations, 1);
        assert_eq!(session.state(), SessionState::ExamFinished);
        assert!(session.time_expired());

        assert!(!session.update_time_remaining(-1));
        assert!(!session.tick());
        assert_eq!(session.remaining_secs(), Some(0));
    }

    #[test]
    fn countdown_clamps_negative_values() {
        let mut session = exam_session(12, 10, 5);
        session.start_exam_with_rng(&mut rng()).unwrap();
        assert!(session.update_time_remaining(-20));
        assert_eq!(session.remaining_secs(), Some(0));
    }

    #[test]
    fn countdown_ignored_without_timer() {
        let mut session = Session::new(pool(3));
        assert!(!session.update_time_remaining(10));
        assert!(!session.tick());
        assert!(session.remaining_secs().is_none());
    }

    #[test]
    fn tick_decrements_by_one() {
        let mut session = exam_session(12, 10, 5);
        session.start_exam_with_rng(&mut rng()).unwrap();
        session.tick();
        session.tick();
        assert_eq!(session.remaining_secs(), Some(298));
    }

    #[test]
    fn answer_correctness_and_overwrite() {
        let mut session = Session::new(pool(10));

        let answer = session.answer_question(7, "B").unwrap();
        assert!(answer.is_correct);
        assert_eq!(session.answer_status(7), AnswerStatus::Correct);

        session.answer_question(7, "C");
        assert_eq!(session.answer_status(7), AnswerStatus::Incorrect);
        assert_eq!(session.answer(7).unwrap().selected_option_id, "C");

        let stats = session.stats();
        assert_eq!(stats.answered, 1);
        assert_eq!(stats.correct, 0);
        assert_eq!(stats.incorrect, 1);
    }

    #[test]
    fn answering_unknown_question_is_noop() {
        let mut session = Session::new(pool(3));
        assert!(session.answer_question(42, "A").is_none());
        assert!(session.answers().is_empty());
    }

    #[test]
    fn dangling_correct_option_is_always_incorrect() {
        let mut questions = pool(1);
        questions[0].correct_option_id = "Z".into();
        let mut session = Session::new(questions);
        for option in ["A", "B", "C"] {
            session.answer_question(1, option);
            assert_eq!(session.answer_status(1), AnswerStatus::Incorrect);
        }
    }

    #[test]
    fn stats_invariants_hold() {
        let mut session = Session::new(pool(8));
        session.answer_question(1, "B");
        session.answer_question(2, "A");
        session.answer_question(3, "B");
        let stats = session.stats();
        assert_eq!(stats.answered + stats.unanswered, stats.total);
        assert_eq!(stats.correct + stats.incorrect, stats.answered);
        assert_eq!(stats.percentage, 25);
    }

    #[test]
    fn shared_ids_count_a_single_answer() {
        let mut questions = pool(3);
        for q in &mut questions {
            q.id = 0;
        }
        let mut session = Session::new(questions);
        session.answer_question(0, "B");

        let stats = session.stats();
        assert_eq!(session.answers().len(), 1);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.answered, 1);
        assert_eq!(stats.unanswered, 2);
        assert_eq!(stats.percentage, 33);
    }

    #[test]
    fn navigation_wraps_both_ways() {
        let mut session = Session::new(pool(3));
        session.next_question();
        assert!(session.selected_question_id().is_none());

        assert!(session.open_question(3));
        assert!(session.is_view_open());
        session.next_question();
        assert_eq!(session.selected_question_id(), Some(1));
        session.previous_question();
        assert_eq!(session.selected_question_id(), Some(3));
        session.previous_question();
        assert_eq!(session.current_question().map(|q| q.id), Some(2));

        session.close_question();
        assert!(!session.is_view_open());
        assert!(session.selected_question_id().is_none());
    }

    #[test]
    fn opening_unknown_question_is_noop() {
        let mut session = Session::new(pool(3));
        assert!(!session.open_question(9));
        assert!(session.selected_question_id().is_none());
        assert!(!session.is_view_open());
    }

    #[test]
    fn reloading_and_starting_drop_the_selection() {
        let mut session = Session::new(pool(3));
        session.open_question(2);
        session.load_questions(pool(1));
        assert!(session.selected_question_id().is_none());

        let mut session = exam_session(40, 10, 5);
        session.open_question(40);
        session.start_exam_with_rng(&mut rng()).unwrap();
        session.next_question();
        assert!(session.selected_question_id().is_none());
        assert!(!session.is_view_open());
    }

    #[test]
    fn load_replaces_pool_and_clears_state() {
        let mut session = Session::new(pool(3));
        session.answer_question(1, "B");
        session.open_question(1);

        session.load_questions(pool(5));
        assert_eq!(session.questions().len(), 5);
        assert_eq!(session.original_questions().len(), 5);
        assert!(session.answers().is_empty());
        assert!(!session.is_view_open());
    }

    #[test]
    fn later_load_wins() {
        let mut session = Session::new(pool(3));
        session.load_questions(pool(5));
        session.load_questions(pool(2));
        assert_eq!(session.questions().len(), 2);
    }

    #[test]
    fn shuffle_keeps_pool_and_reset_restores_it() {
        let mut session = Session::new(pool(20));
        session.answer_question(1, "B");
        session.shuffle_questions_with_rng(&mut rng());

        let original_ids: Vec<_> = session.original_questions().iter().map(|q| q.id).collect();
        assert_eq!(original_ids, (1..=20).collect::<Vec<_>>());
        let mut shuffled: Vec<_> = session.questions().iter().map(|q| q.id).collect();
        shuffled.sort_unstable();
        assert_eq!(shuffled, original_ids);
        assert!(session.answer(1).is_some());

        session.reset_to_original();
        let ids: Vec<_> = session.questions().iter().map(|q| q.id).collect();
        assert_eq!(ids, original_ids);
        assert!(session.answers().is_empty());
    }

    #[test]
    fn reset_answers_closes_view() {
        let mut session = Session::new(pool(3));
        session.answer_question(1, "B");
        session.open_question(1);
        session.reset_answers();
        assert!(session.answers().is_empty());
        assert!(!session.is_view_open());
    }

    #[test]
    fn tiles_withhold_correctness_during_exam() {
        let mut session = exam_session(12, 10, 5);
        session.start_exam_with_rng(&mut rng()).unwrap();
        let ids: Vec<_> = session.questions().iter().map(|q| q.id).collect();
        session.answer_question(ids[0], "B");
        session.answer_question(ids[1], "A");

        assert!(!session.reveals_correctness());
        assert_eq!(session.tile_status(ids[0]), TileStatus::Answered);
        assert_eq!(session.tile_status(ids[1]), TileStatus::Answered);
        assert_eq!(session.tile_status(ids[2]), TileStatus::Unanswered);

        session.finish_exam();
        assert_eq!(session.tile_status(ids[0]), TileStatus::Correct);
        assert_eq!(session.tile_status(ids[1]), TileStatus::Incorrect);
        assert_eq!(session.tiles().len(), 10);
    }

    #[test]
    fn practice_tiles_show_correctness() {
        let mut session = Session::new(pool(2));
        session.answer_question(1, "A");
        assert_eq!(session.tile_status(1), TileStatus::Incorrect);
        assert_eq!(session.tile_status(2), TileStatus::Unanswered);
    }

    #[test]
    fn snapshot_round_trip_restores_answers_only() {
        let mut session = Session::new(pool(3));
        session.answer_question(2, "B");
        session.shuffle_questions_with_rng(&mut rng());
        let snapshot = session.answer_snapshot();

        let mut fresh = Session::new(pool(3));
        fresh.restore_answers(snapshot);
        assert_eq!(fresh.answer_status(2), AnswerStatus::Correct);
        let ids: Vec<_> = fresh.questions().iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn sample_session_has_questions() {
        let session = Session::with_sample();
        assert!(session.questions().len() >= 10);
    }
}
