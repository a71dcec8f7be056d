use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use civics_core::model::{QuizSession, TOTAL_QUESTIONS};
use civics_core::{Clock, QuestionPool};

use crate::error::QuizError;
use crate::grading::Grader;

use super::handle::QuizHandle;

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Starts quiz sessions over a question pool and wires them to a grader.
///
/// Each session draws [`TOTAL_QUESTIONS`] distinct questions uniformly at
/// random. Cloning shares the pool, grader and random source.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    pool: Arc<QuestionPool>,
    grader: Arc<dyn Grader>,
    rng: Arc<Mutex<StdRng>>,
}

impl QuizService {
    #[must_use]
    pub fn new(clock: Clock, pool: Arc<QuestionPool>, grader: Arc<dyn Grader>) -> Self {
        Self {
            clock,
            pool,
            grader,
            rng: Arc::new(Mutex::new(StdRng::from_os_rng())),
        }
    }

    /// Use a deterministic question draw.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Arc::new(Mutex::new(StdRng::seed_from_u64(seed)));
        self
    }

    #[must_use]
    pub fn pool(&self) -> &QuestionPool {
        &self.pool
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Draw a fresh set of questions and start a session at question one.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::PoolTooSmall` when the pool holds fewer than
    /// [`TOTAL_QUESTIONS`] questions.
    pub fn start_session(&self) -> Result<QuizHandle, QuizError> {
        if self.pool.len() < TOTAL_QUESTIONS {
            return Err(QuizError::PoolTooSmall {
                available: self.pool.len(),
                required: TOTAL_QUESTIONS,
            });
        }

        let questions = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            self.pool.sample(TOTAL_QUESTIONS, &mut *rng)
        };
        let session = QuizSession::new(questions, self.clock.now())?;
        info!(
            pool = self.pool.len(),
            questions = session.total_questions(),
            "quiz started"
        );

        Ok(QuizHandle::new(session, Arc::clone(&self.grader), self.clock))
    }

    /// Discard `previous` and start over with a new draw.
    ///
    /// Nothing from the previous attempt carries over, including classifier
    /// health and any grading configuration fault.
    ///
    /// # Errors
    ///
    /// Same as [`QuizService::start_session`].
    pub fn restart(&self, previous: QuizHandle) -> Result<QuizHandle, QuizError> {
        drop(previous);
        self.start_session()
    }
}

impl fmt::Debug for QuizService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizService")
            .field("clock", &self.clock)
            .field("pool", &self.pool.len())
            .finish_non_exhaustive()
    }
}
