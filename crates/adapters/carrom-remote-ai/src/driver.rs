use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use carrom_core::geometry::Vec2;
use carrom_game::{AiTicket, CarromMatch};

use crate::client::{AdvisorError, ShotAdvisor};

/// What one `poll` did.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverEvent {
    /// Not an AI turn.
    Idle,
    Requested(AiTicket),
    /// A decision is outstanding.
    Waiting,
    Submitted {
        ticket: AiTicket,
        velocity: Vec2,
    },
    /// The advisor failed; a random shot was submitted instead.
    FellBack {
        ticket: AiTicket,
        error: AdvisorError,
    },
    /// The match was reset while the decision was outstanding.
    Abandoned(AiTicket),
}

struct InFlight {
    ticket: AiTicket,
    rx: oneshot::Receiver<Result<Vec2, AdvisorError>>,
}

/// Bridges an async advisor into the synchronous tick loop. Call `poll`
/// once per tick, before `CarromMatch::tick`; it never blocks.
pub struct AiTurnDriver<A: ShotAdvisor> {
    advisor: Arc<A>,
    timeout: Duration,
    runtime: Handle,
    inflight: Option<InFlight>,
}

impl<A: ShotAdvisor> AiTurnDriver<A> {
    pub fn new(advisor: A, timeout: Duration, runtime: Handle) -> Self {
        Self {
            advisor: Arc::new(advisor),
            timeout,
            runtime,
            inflight: None,
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.inflight.is_some()
    }

    pub fn poll(&mut self, m: &mut CarromMatch) -> DriverEvent {
        if let Some(mut inflight) = self.inflight.take() {
            let ticket = inflight.ticket;
            if ticket.epoch != m.epoch() || ticket.turn != m.turn_state().turn {
                tracing::debug!(epoch = ticket.epoch, turn = ticket.turn, "AI request abandoned");
                return DriverEvent::Abandoned(ticket);
            }
            let error = match inflight.rx.try_recv() {
                Ok(Ok(velocity)) => {
                    m.submit_ai_decision(ticket, velocity);
                    return DriverEvent::Submitted { ticket, velocity };
                },
                Ok(Err(e)) => e,
                Err(TryRecvError::Empty) => {
                    self.inflight = Some(inflight);
                    return DriverEvent::Waiting;
                },
                Err(TryRecvError::Closed) => AdvisorError::Dropped,
            };
            tracing::warn!(error = %error, "Remote AI unavailable, using fallback shot");
            let velocity = m.fallback_shot();
            m.submit_ai_decision(ticket, velocity);
            return DriverEvent::FellBack { ticket, error };
        }

        let Some((ticket, request)) = m.request_ai_shot() else {
            return DriverEvent::Idle;
        };
        let (tx, rx) = oneshot::channel();
        let advisor = Arc::clone(&self.advisor);
        let timeout = self.timeout;
        self.runtime.spawn(async move {
            let result = match tokio::time::timeout(timeout, advisor.decide(request)).await {
                Ok(result) => result,
                Err(_) => Err(AdvisorError::Timeout),
            };
            // The driver may have abandoned the request.
            let _ = tx.send(result);
        });
        self.inflight = Some(InFlight { ticket, rx });
        DriverEvent::Requested(ticket)
    }
}
