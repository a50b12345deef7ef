pub mod bot;
pub mod collision;
pub mod physics;
pub mod planner;
pub mod rules;
pub mod scoring;
pub mod settle;
pub mod shot;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use carrom_core::board::{Board, seed_coins};
use carrom_core::body::{Body, BodyKind};
use carrom_core::config::{CarromConfig, Opponent};
use carrom_core::events::{EndReason, MatchEvent, MatchOutcome, MatchSummary};
use carrom_core::geometry::{Vec2, distance};
use carrom_core::player::{Controller, Side};
use carrom_core::protocol::{AiShotRequest, DiscState, ProtocolError, encode_snapshot};
use carrom_core::time::TickClock;

use rules::{Phase, TurnResolution, TurnState};
use shot::{Drag, ShotRejection};

/// Identifies the board and turn an AI decision was requested for. A
/// decision is only applied while both still match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AiTicket {
    pub epoch: u64,
    pub turn: u64,
    pub side: Side,
}

/// A body as the renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyView {
    pub kind: BodyKind,
    pub position: Vec2,
    pub radius: f32,
    pub captured: bool,
}

impl From<&Body> for BodyView {
    fn from(body: &Body) -> Self {
        Self {
            kind: body.kind,
            position: body.position,
            radius: body.radius,
            captured: !body.is_active(),
        }
    }
}

/// Read-only view of the match for rendering or broadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    /// Striker first, then coins in seed order.
    pub bodies: Vec<BodyView>,
    pub scores: [u32; 2],
    pub shots: [u32; 2],
    pub side: Side,
    pub phase: Phase,
    pub drag: Option<Drag>,
    /// Power meter fill for the current drag, in `[0, 1]`.
    pub power: f32,
    pub paused: bool,
    pub ai_pending: bool,
    pub epoch: u64,
}

/// A single carrom match. Owns the board, the bodies, and the turn state;
/// advanced one fixed tick at a time.
pub struct CarromMatch {
    config: CarromConfig,
    board: Board,
    striker: Body,
    coins: Vec<Body>,
    turn: TurnState,
    controllers: [Controller; 2],
    drag: Option<Drag>,
    /// Outstanding AI request for the current turn.
    ai_pending: Option<AiTicket>,
    /// Decision waiting to be applied at the start of the next tick.
    queued: Option<(AiTicket, Vec2)>,
    epoch: u64,
    ticks: u64,
    paused: bool,
    rng: StdRng,
    clock: TickClock,
}

impl CarromMatch {
    pub fn new(config: CarromConfig) -> Self {
        for issue in config.validate() {
            tracing::warn!(issue = %issue, "Questionable carrom config");
        }
        let board = Board::new(&config.board);
        let controllers = [
            Controller::Human,
            match config.rules.opponent {
                Opponent::Human => Controller::Human,
                Opponent::Ai => Controller::Ai,
            },
        ];
        let rng = match config.rules.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let clock = TickClock::new(config.tick_rate_hz);
        let mut m = Self {
            striker: Body::striker(&config.board),
            coins: seed_coins(&config.board),
            board,
            turn: TurnState::new(),
            controllers,
            drag: None,
            ai_pending: None,
            queued: None,
            epoch: 0,
            ticks: 0,
            paused: false,
            rng,
            clock,
            config,
        };
        m.log_start();
        m
    }

    fn log_start(&self) {
        tracing::info!(
            epoch = self.epoch,
            coins = self.coins.len(),
            opponent = ?self.controllers[1],
            "Carrom match started"
        );
    }

    pub fn config(&self) -> &CarromConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn striker(&self) -> &Body {
        &self.striker
    }

    pub fn coins(&self) -> &[Body] {
        &self.coins
    }

    pub fn turn_state(&self) -> &TurnState {
        &self.turn
    }

    pub fn phase(&self) -> Phase {
        self.turn.phase
    }

    /// Side whose shot it is, or who shot last while bodies are moving.
    pub fn side_to_act(&self) -> Side {
        self.turn.side
    }

    pub fn scores(&self) -> [u32; 2] {
        self.turn.scores
    }

    pub fn controller(&self, side: Side) -> Controller {
        self.controllers[side.index()]
    }

    pub fn is_over(&self) -> bool {
        self.turn.is_over()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn coins_remaining(&self) -> usize {
        self.coins.iter().filter(|c| c.is_active()).count()
    }

    /// Reseed the board and start over. Any outstanding AI decision becomes
    /// stale.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.striker = Body::striker(&self.config.board);
        self.coins = seed_coins(&self.config.board);
        self.turn = TurnState::new();
        self.drag = None;
        self.ai_pending = None;
        self.queued = None;
        self.ticks = 0;
        self.paused = false;
        self.clock.reset();
        self.log_start();
    }

    pub fn pause(&mut self) {
        if !self.paused {
            tracing::debug!("Match paused");
            self.paused = true;
            self.drag = None;
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            tracing::debug!("Match resumed");
            self.paused = false;
            self.clock.reset();
        }
    }

    /// Run as many ticks as `dt` seconds of wall-clock time allow.
    pub fn advance(&mut self, dt: f32) -> Vec<MatchEvent> {
        if self.paused {
            return Vec::new();
        }
        let n = self.clock.advance(dt);
        let mut events = Vec::new();
        for _ in 0..n {
            events.extend(self.tick());
        }
        events
    }

    /// Advance the match by exactly one tick.
    pub fn tick(&mut self) -> Vec<MatchEvent> {
        let mut events = Vec::new();
        if self.paused || self.turn.is_over() {
            return events;
        }
        self.ticks += 1;
        self.apply_queued_decision(&mut events);

        let side = self.turn.side;
        let mut captured_any = false;
        match physics::step(
            &self.board,
            &self.config.physics,
            &mut self.striker,
            &mut self.coins,
        ) {
            Ok(report) => {
                for i in report.captured {
                    captured_any = true;
                    let value = self.coins[i].value;
                    let score = self.turn.record_capture(value);
                    tracing::info!(side = ?side, coin = i, value, score, "Coin captured");
                    events.push(MatchEvent::CoinCaptured {
                        side,
                        coin: i,
                        value,
                        score,
                    });
                }
                if report.striker_foul {
                    tracing::info!(side = ?side, "Striker foul");
                    events.push(MatchEvent::StrikerFoul { side });
                }
            },
            Err(e) => {
                tracing::warn!(tick = self.ticks, error = %e, "Tick discarded");
            },
        }

        // Drift captures between shots can still end the match.
        if captured_any && !self.turn.shot_active() {
            let remaining = self.coins_remaining();
            if let Some(TurnResolution::Over { outcome, reason }) =
                self.turn.check_end(&self.config.rules, remaining)
            {
                self.finish(outcome, reason, &mut events);
            }
            return events;
        }

        if self.turn.shot_active() {
            let at_rest = settle::is_settled(
                &self.striker,
                &self.coins,
                self.config.physics.settle_threshold,
            );
            if self
                .turn
                .observe_rest(at_rest, self.config.physics.settle_ticks)
            {
                self.resolve_turn(&mut events);
            }
        }
        events
    }

    fn resolve_turn(&mut self, events: &mut Vec<MatchEvent>) {
        let remaining = self.coins_remaining();
        match self.turn.resolve(&self.config.rules, remaining) {
            TurnResolution::Next { side, bonus } => {
                if self.config.rules.reset_striker_after_shot {
                    self.striker.position = self.board.baseline;
                    self.striker.velocity = Vec2::ZERO;
                }
                tracing::debug!(next = ?side, bonus, turn = self.turn.turn, "Turn resolved");
                events.push(MatchEvent::TurnResolved { next: side, bonus });
            },
            TurnResolution::Over { outcome, reason } => self.finish(outcome, reason, events),
        }
    }

    fn finish(
        &mut self,
        outcome: MatchOutcome,
        reason: EndReason,
        events: &mut Vec<MatchEvent>,
    ) {
        tracing::info!(
            outcome = ?outcome,
            reason = ?reason,
            scores = ?self.turn.scores,
            ticks = self.ticks,
            "Match over"
        );
        self.drag = None;
        self.ai_pending = None;
        self.queued = None;
        events.push(MatchEvent::MatchOver { outcome, reason });
    }

    fn launch(&mut self, velocity: Vec2) -> Result<MatchEvent, ShotRejection> {
        self.turn.begin_shot()?;
        self.striker.velocity = velocity;
        let side = self.turn.side;
        tracing::debug!(side = ?side, vx = velocity.x, vy = velocity.y, "Shot taken");
        Ok(MatchEvent::ShotTaken { side, velocity })
    }

    fn human_may_shoot(&self) -> Result<(), ShotRejection> {
        if self.paused {
            return Err(ShotRejection::Paused);
        }
        self.turn.ready_for_shot()?;
        if self.controller(self.turn.side) != Controller::Human {
            return Err(ShotRejection::NotYourTurn);
        }
        if self.ai_pending.is_some() {
            return Err(ShotRejection::AiPending);
        }
        Ok(())
    }

    /// Start a drag at `point`. Only accepted on a human turn with the press
    /// on or near the striker.
    pub fn begin_drag(&mut self, point: Vec2) -> Result<(), ShotRejection> {
        let result = self.human_may_shoot().and_then(|()| {
            let reach = self.striker.radius * self.config.shot.grab_radius_factor;
            if distance(point, self.striker.position) > reach {
                return Err(ShotRejection::OutOfReach);
            }
            Ok(())
        });
        match result {
            Ok(()) => {
                self.drag = Some(Drag::new(point));
                Ok(())
            },
            Err(reason) => {
                tracing::debug!(%reason, "Drag refused");
                Err(reason)
            },
        }
    }

    pub fn update_drag(&mut self, point: Vec2) {
        if let Some(drag) = self.drag.as_mut() {
            drag.current = point;
        }
    }

    /// Release the current drag and shoot. The drag is cleared whether or
    /// not the shot is accepted.
    pub fn release_drag(&mut self) -> Result<MatchEvent, ShotRejection> {
        let result = self.drag.take().ok_or(ShotRejection::NoDrag).and_then(|drag| {
            self.human_may_shoot()?;
            let velocity = shot::translate(drag.vector(), &self.config.shot)?;
            self.launch(velocity)
        });
        if let Err(reason) = &result {
            tracing::debug!(%reason, "Shot refused");
        }
        result
    }

    pub fn drag(&self) -> Option<Drag> {
        self.drag
    }

    /// Power meter fill for the current drag.
    pub fn drag_power(&self) -> f32 {
        self.drag
            .map(|d| shot::power_fraction(d.vector(), &self.config.shot))
            .unwrap_or(0.0)
    }

    /// If it is an AI turn with no decision outstanding, issue a ticket and
    /// the board state for the decision source.
    pub fn request_ai_shot(&mut self) -> Option<(AiTicket, AiShotRequest)> {
        if self.paused
            || self.ai_pending.is_some()
            || self.queued.is_some()
            || self.turn.ready_for_shot().is_err()
            || self.controller(self.turn.side) != Controller::Ai
        {
            return None;
        }
        let ticket = AiTicket {
            epoch: self.epoch,
            turn: self.turn.turn,
            side: self.turn.side,
        };
        self.ai_pending = Some(ticket);
        self.drag = None;
        tracing::debug!(epoch = ticket.epoch, turn = ticket.turn, "AI decision requested");
        Some((ticket, self.ai_request()))
    }

    /// Board state in wire form.
    pub fn ai_request(&self) -> AiShotRequest {
        AiShotRequest {
            striker: DiscState::from(&self.striker),
            coins: self.coins.iter().map(DiscState::from).collect(),
            difficulty: self.config.rules.difficulty,
        }
    }

    /// Queue a decision. It is checked against the current board at the
    /// start of the next tick. Returns whether the ticket is current now.
    pub fn submit_ai_decision(&mut self, ticket: AiTicket, velocity: Vec2) -> bool {
        self.queued = Some((ticket, velocity));
        self.ai_pending == Some(ticket)
    }

    /// Heuristic shot from the in-process bot.
    pub fn local_ai_shot(&mut self) -> Vec2 {
        let home = self.config.board.ai_home;
        let max_speed = self.config.shot.max_speed;
        bot::choose_shot(
            &self.striker,
            &self.coins,
            home,
            self.config.rules.difficulty,
            max_speed,
            &mut self.rng,
        )
        .unwrap_or_else(|| bot::fallback_shot(max_speed, &mut self.rng))
    }

    /// Random shot for when the decision source fails.
    pub fn fallback_shot(&mut self) -> Vec2 {
        bot::fallback_shot(self.config.shot.max_speed, &mut self.rng)
    }

    /// Request, decide with the local bot, and queue in one call. Returns
    /// `false` when it is not an AI turn.
    pub fn play_local_ai(&mut self) -> bool {
        let Some((ticket, _)) = self.request_ai_shot() else {
            return false;
        };
        let velocity = self.local_ai_shot();
        self.submit_ai_decision(ticket, velocity);
        true
    }

    fn apply_queued_decision(&mut self, events: &mut Vec<MatchEvent>) {
        let Some((ticket, velocity)) = self.queued.take() else {
            return;
        };
        if self.ai_pending != Some(ticket) {
            tracing::debug!(
                ticket_epoch = ticket.epoch,
                ticket_turn = ticket.turn,
                epoch = self.epoch,
                turn = self.turn.turn,
                "Stale AI decision discarded"
            );
            events.push(MatchEvent::StaleDecisionDiscarded);
            return;
        }
        self.ai_pending = None;
        let velocity = if velocity.is_finite() {
            velocity
        } else {
            tracing::warn!("AI decision was not finite, using fallback shot");
            self.fallback_shot()
        };
        match self.launch(velocity) {
            Ok(event) => events.push(event),
            Err(reason) => tracing::warn!(%reason, "AI shot refused"),
        }
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        let mut bodies = Vec::with_capacity(self.coins.len() + 1);
        bodies.push(BodyView::from(&self.striker));
        bodies.extend(self.coins.iter().map(BodyView::from));
        MatchSnapshot {
            bodies,
            scores: self.turn.scores,
            shots: self.turn.shots,
            side: self.turn.side,
            phase: self.turn.phase,
            drag: self.drag,
            power: self.drag_power(),
            paused: self.paused,
            ai_pending: self.ai_pending.is_some(),
            epoch: self.epoch,
        }
    }

    /// Snapshot encoded as msgpack.
    pub fn encode_snapshot(&self) -> Result<Vec<u8>, ProtocolError> {
        encode_snapshot(&self.snapshot())
    }

    /// Final tally, once the match is over.
    pub fn summary(&self) -> Option<MatchSummary> {
        match self.turn.phase {
            Phase::MatchOver { outcome, reason } => Some(MatchSummary {
                scores: self.turn.scores,
                shots: self.turn.shots,
                outcome,
                reason,
                ticks: self.ticks,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carrom_core::protocol::decode_snapshot;

    const MAX_TICKS: usize = 5000;

    fn seeded(mut config: CarromConfig) -> CarromMatch {
        config.rules.rng_seed = Some(42);
        CarromMatch::new(config)
    }

    fn run_until_resolved(m: &mut CarromMatch) -> Vec<MatchEvent> {
        let mut all = Vec::new();
        for _ in 0..MAX_TICKS {
            let events = m.tick();
            let done = events.iter().any(|e| {
                matches!(
                    e,
                    MatchEvent::TurnResolved { .. } | MatchEvent::MatchOver { .. }
                )
            });
            all.extend(events);
            if done {
                return all;
            }
        }
        panic!("turn never resolved");
    }

    /// Shoot straight up the board from the striker.
    fn shoot_up(m: &mut CarromMatch) -> MatchEvent {
        let at = m.striker().position;
        m.begin_drag(at).unwrap();
        let drag = match m.config().shot.policy {
            carrom_core::config::ShotPolicy::Forward => Vec2::new(0.0, -40.0),
            carrom_core::config::ShotPolicy::Reverse => Vec2::new(0.0, 40.0),
        };
        m.update_drag(at + drag);
        m.release_drag().unwrap()
    }

    #[test]
    fn new_match_is_seeded() {
        let m = seeded(CarromConfig::classic());
        assert_eq!(m.phase(), Phase::Aiming);
        assert_eq!(m.side_to_act(), Side::One);
        assert_eq!(m.coins().len(), 19);
        assert_eq!(m.coins()[0].kind, BodyKind::Queen);
        assert_eq!(m.controller(Side::Two), Controller::Ai);
        assert_eq!(m.striker().position, m.board().baseline);
    }

    #[test]
    fn human_break_passes_turn_to_ai() {
        let mut m = seeded(CarromConfig::classic());
        let event = shoot_up(&mut m);
        assert!(matches!(event, MatchEvent::ShotTaken { side: Side::One, .. }));
        assert_eq!(m.phase(), Phase::ShotInFlight);
        assert_eq!(m.turn_state().shots, [1, 0]);

        let events = run_until_resolved(&mut m);
        let resolved = events
            .iter()
            .any(|e| matches!(e, MatchEvent::TurnResolved { next: Side::Two, .. }));
        assert!(resolved || m.is_over(), "{events:?}");
        assert!(settle::is_settled(
            m.striker(),
            m.coins(),
            m.config().physics.settle_threshold
        ));
    }

    #[test]
    fn drag_rejections() {
        let mut m = seeded(CarromConfig::classic());
        let at = m.striker().position;
        assert_eq!(
            m.begin_drag(at + Vec2::new(200.0, 0.0)),
            Err(ShotRejection::OutOfReach)
        );
        assert_eq!(m.release_drag(), Err(ShotRejection::NoDrag));

        m.begin_drag(at).unwrap();
        m.update_drag(at + Vec2::new(5.0, 0.0));
        assert!(matches!(
            m.release_drag(),
            Err(ShotRejection::TooShort { .. })
        ));
        assert_eq!(m.phase(), Phase::Aiming);
        assert!(m.drag().is_none());
    }

    #[test]
    fn releases_while_in_flight_are_ignored() {
        let mut m = seeded(CarromConfig::local());
        shoot_up(&mut m);
        m.tick();
        let at = m.striker().position;
        assert_eq!(m.begin_drag(at), Err(ShotRejection::NotAiming));
        assert_eq!(m.release_drag(), Err(ShotRejection::NoDrag));
        assert_eq!(m.turn_state().shots, [1, 0]);
    }

    #[test]
    fn human_cannot_drag_on_ai_turn() {
        let mut m = seeded(CarromConfig::classic());
        m.turn.side = Side::Two;
        let at = m.striker().position;
        assert_eq!(m.begin_drag(at), Err(ShotRejection::NotYourTurn));
    }

    #[test]
    fn ai_decision_applied_next_tick() {
        let mut m = seeded(CarromConfig::classic());
        assert!(m.request_ai_shot().is_none(), "human turn");

        m.turn.side = Side::Two;
        let (ticket, request) = m.request_ai_shot().unwrap();
        assert_eq!(request.coins.len(), 19);
        assert!(m.request_ai_shot().is_none(), "already pending");
        assert!(m.snapshot().ai_pending);

        assert!(m.submit_ai_decision(ticket, Vec2::new(0.0, -12.0)));
        assert_eq!(m.phase(), Phase::Aiming, "applied on tick, not on submit");
        let events = m.tick();
        assert!(matches!(
            events.first(),
            Some(MatchEvent::ShotTaken { side: Side::Two, .. })
        ));
        assert_eq!(m.phase(), Phase::ShotInFlight);
        assert_eq!(m.turn_state().shots, [0, 1]);
    }

    #[test]
    fn stale_decision_after_reset_is_discarded() {
        let mut m = seeded(CarromConfig::classic());
        m.turn.side = Side::Two;
        let (ticket, _) = m.request_ai_shot().unwrap();
        m.reset();
        assert_eq!(m.epoch(), 1);
        m.turn.side = Side::Two;

        assert!(!m.submit_ai_decision(ticket, Vec2::new(0.0, -12.0)));
        let events = m.tick();
        assert_eq!(events, vec![MatchEvent::StaleDecisionDiscarded]);
        assert_eq!(m.phase(), Phase::Aiming);
        assert_eq!(m.turn_state().shots, [0, 0]);
        // A fresh request still works.
        assert!(m.request_ai_shot().is_some());
    }

    #[test]
    fn local_bot_takes_a_shot() {
        let mut m = seeded(CarromConfig::classic());
        assert!(!m.play_local_ai());
        m.turn.side = Side::Two;
        assert!(m.play_local_ai());
        let events = m.tick();
        assert!(matches!(
            events.first(),
            Some(MatchEvent::ShotTaken { side: Side::Two, .. })
        ));
    }

    #[test]
    fn non_finite_decision_uses_fallback() {
        let mut m = seeded(CarromConfig::classic());
        m.turn.side = Side::Two;
        let (ticket, _) = m.request_ai_shot().unwrap();
        m.submit_ai_decision(ticket, Vec2::new(f32::NAN, 1.0));
        m.tick();
        assert_eq!(m.phase(), Phase::ShotInFlight);
        assert!(m.striker().is_finite());
    }

    #[test]
    fn pause_freezes_everything() {
        let mut m = seeded(CarromConfig::local());
        shoot_up(&mut m);
        m.tick();
        let before = m.striker().position;
        m.pause();
        assert!(m.tick().is_empty());
        assert!(m.advance(1.0).is_empty());
        assert_eq!(m.striker().position, before);
        assert_eq!(m.begin_drag(before), Err(ShotRejection::Paused));
        m.resume();
        m.tick();
        assert_ne!(m.striker().position, before);
    }

    #[test]
    fn cleared_board_ends_match() {
        let mut m = seeded(CarromConfig::local());
        let pocket = m.board().pockets[0].position;
        m.coins = vec![Body::coin(BodyKind::White, pocket, &m.config.board)];

        shoot_up(&mut m);
        let first = m.tick();
        assert!(first.contains(&MatchEvent::CoinCaptured {
            side: Side::One,
            coin: 0,
            value: 1,
            score: 1
        }));

        let events = run_until_resolved(&mut m);
        assert!(events.contains(&MatchEvent::MatchOver {
            outcome: MatchOutcome::Winner(Side::One),
            reason: EndReason::BoardCleared
        }));
        let summary = m.summary().unwrap();
        assert_eq!(summary.score_of(Side::One), 1);
        assert_eq!(summary.shots_of(Side::One), 1);

        // Terminal until reset.
        assert!(m.tick().is_empty());
        let at = m.striker().position;
        assert_eq!(m.begin_drag(at), Err(ShotRejection::MatchOver));
        m.reset();
        assert_eq!(m.phase(), Phase::Aiming);
        assert!(m.summary().is_none());
    }

    #[test]
    fn drifting_last_coin_ends_match_while_aiming() {
        let mut m = seeded(CarromConfig::local());
        let pocket = m.board().pockets[0].position;
        let mut coin = Body::coin(
            BodyKind::White,
            pocket + Vec2::new(18.0, 0.0),
            &m.config.board,
        );
        coin.velocity = Vec2::new(-0.25, 0.0);
        m.coins = vec![coin];
        assert_eq!(m.phase(), Phase::Aiming);

        let mut events = Vec::new();
        for _ in 0..200 {
            events.extend(m.tick());
        }
        assert!(events.contains(&MatchEvent::CoinCaptured {
            side: Side::One,
            coin: 0,
            value: 1,
            score: 1
        }));
        assert!(events.contains(&MatchEvent::MatchOver {
            outcome: MatchOutcome::Winner(Side::One),
            reason: EndReason::BoardCleared
        }));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, MatchEvent::MatchOver { .. }))
                .count(),
            1
        );
        assert_eq!(m.coins_remaining(), 0);
        assert!(m.is_over());

        let at = m.striker().position;
        assert_eq!(m.begin_drag(at), Err(ShotRejection::MatchOver));
        assert!(!m.play_local_ai());
        assert_eq!(m.turn_state().shots, [0, 0]);
    }

    #[test]
    fn striker_foul_returns_striker_without_scoring() {
        let mut m = seeded(CarromConfig::classic());
        m.striker.position = Vec2::new(100.0, 100.0);
        let at = m.striker().position;
        m.begin_drag(at).unwrap();
        m.update_drag(at + Vec2::new(-40.0, -40.0));
        m.release_drag().unwrap();

        let mut fouled = false;
        for _ in 0..MAX_TICKS {
            let events = m.tick();
            if events.contains(&MatchEvent::StrikerFoul { side: Side::One }) {
                fouled = true;
                break;
            }
        }
        assert!(fouled, "striker never reached the pocket");
        assert_eq!(m.striker().position, m.board().baseline);
        assert_eq!(m.striker().velocity, Vec2::ZERO);

        let events = run_until_resolved(&mut m);
        assert!(events.contains(&MatchEvent::TurnResolved {
            next: Side::Two,
            bonus: false
        }));
        assert_eq!(m.scores(), [0, 0]);
        assert_eq!(m.coins_remaining(), 19);
    }

    #[test]
    fn capture_earns_bonus_shot_and_striker_returns() {
        let mut m = seeded(CarromConfig::local());
        let pocket = m.board().pockets[0].position;
        m.coins = vec![
            Body::coin(BodyKind::White, pocket, &m.config.board),
            Body::coin(BodyKind::Black, Vec2::new(150.0, 150.0), &m.config.board),
        ];
        shoot_up(&mut m);
        let events = run_until_resolved(&mut m);
        assert!(events.contains(&MatchEvent::TurnResolved {
            next: Side::One,
            bonus: true
        }));
        assert_eq!(m.scores(), [1, 0]);
        assert_eq!(m.striker().position, m.board().baseline);
        assert_eq!(m.striker().velocity, Vec2::ZERO);
    }

    #[test]
    fn snapshot_encodes() {
        let mut m = seeded(CarromConfig::classic());
        let at = m.striker().position;
        m.begin_drag(at).unwrap();
        m.update_drag(at + Vec2::new(0.0, -20.0));
        let snap = m.snapshot();
        assert_eq!(snap.bodies.len(), 20);
        assert_eq!(snap.bodies[0].kind, BodyKind::Striker);
        assert!((snap.power - 0.5).abs() < 1e-4);

        let bytes = m.encode_snapshot().unwrap();
        let back: MatchSnapshot = decode_snapshot(&bytes).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn advance_converts_time_to_ticks() {
        let mut m = seeded(CarromConfig::classic());
        m.advance(0.5);
        assert_eq!(m.ticks(), 8, "capped by catch-up limit");
        m.advance(1.0 / 60.0 + 1e-4);
        assert!(m.ticks() >= 9);
    }
}
