//! Threaded front end for the drop-move executor.

use std::collections::BTreeMap;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use pickplace_core::{GoalId, GoalStatus};
use pickplace_motion::{DropMovePlan, DropMoveSequence, DropOutcome, MotionWorld, PreemptFlag};

/// One worker thread servicing drop-move goals in arrival order.
///
/// Exactly one goal executes at a time. Submitting while another goal is
/// non-terminal raises that goal's preemption token first, then queues the
/// new one behind it; the executor honors the token at its next step
/// boundary, so the handover happens between motions, never inside one.
pub struct DropMoveService {
    tx: Option<Sender<Job>>,
    shared: Arc<Mutex<ServiceState>>,
    worker: Option<JoinHandle<()>>,
}

struct Job {
    id: GoalId,
    preempt: PreemptFlag,
}

#[derive(Default)]
struct ServiceState {
    statuses: BTreeMap<GoalId, GoalStatus>,
    tokens: BTreeMap<GoalId, PreemptFlag>,
}

impl DropMoveService {
    /// Spawn the worker. It owns the motion backend for its lifetime.
    pub fn spawn<W>(plan: DropMovePlan, mut robot: W) -> Self
    where
        W: MotionWorld + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Job>();
        let shared = Arc::new(Mutex::new(ServiceState::default()));

        let worker_shared = Arc::clone(&shared);
        let worker = thread::spawn(move || {
            while let Ok(job) = rx.recv() {
                tracing::info!(goal = job.id.0, "Drop-move goal accepted");
                lock_state(&worker_shared)
                    .statuses
                    .insert(job.id, GoalStatus::Active);

                let outcome = DropMoveSequence::new(plan.clone(), job.preempt).run(&mut robot);
                let status = match outcome {
                    DropOutcome::Succeeded => GoalStatus::Succeeded,
                    DropOutcome::Preempted => GoalStatus::Preempted,
                    DropOutcome::Aborted => GoalStatus::Aborted,
                };

                tracing::info!(goal = job.id.0, status = ?status, "Drop-move goal finished");
                let mut state = lock_state(&worker_shared);
                state.statuses.insert(job.id, status);
                // A terminal goal cannot be preempted; its token is dead.
                state.tokens.remove(&job.id);
            }
        });

        Self {
            tx: Some(tx),
            shared,
            worker: Some(worker),
        }
    }

    /// Queue a goal, telling any non-terminal goal ahead of it to preempt.
    ///
    /// A finished goal's status stays readable until the next submission
    /// supersedes it, so the statuses map never outgrows the live goals
    /// plus the most recent round.
    pub fn submit(&mut self, id: GoalId) {
        let preempt = PreemptFlag::new();

        {
            let mut state = lock_state(&self.shared);
            state.statuses.retain(|_, status| !status.is_terminal());
            for other in state.statuses.keys() {
                if let Some(token) = state.tokens.get(other) {
                    tracing::info!(
                        goal = other.0,
                        superseded_by = id.0,
                        "Preempting in-flight drop-move goal"
                    );
                    token.request();
                }
            }
            state.statuses.insert(id, GoalStatus::Pending);
            state.tokens.insert(id, preempt.clone());
        }

        if let Some(tx) = &self.tx {
            let _ = tx.send(Job { id, preempt });
        }
    }

    /// Status of a submitted goal. Unknown ids, and finished goals already
    /// superseded by a later submission, read as Rejected.
    pub fn status(&self, id: GoalId) -> GoalStatus {
        lock_state(&self.shared)
            .statuses
            .get(&id)
            .copied()
            .unwrap_or(GoalStatus::Rejected)
    }

    /// Request cancellation. A running goal stops at its next step boundary;
    /// a queued goal is preempted as soon as the worker picks it up.
    pub fn cancel(&self, id: GoalId) {
        if let Some(token) = lock_state(&self.shared).tokens.get(&id) {
            token.request();
        }
    }
}

impl Drop for DropMoveService {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop after the current goal.
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn lock_state(shared: &Mutex<ServiceState>) -> MutexGuard<'_, ServiceState> {
    match shared.lock() {
        Ok(lock) => lock,
        Err(poisoned) => poisoned.into_inner(),
    }
}
