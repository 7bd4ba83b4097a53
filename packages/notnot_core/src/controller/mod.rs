//! The game aggregate driven by the firmware tick.
//!
//! [`GameController`] owns every piece of game state and is the only writer.
//! The firmware calls [`tick`](GameController::tick) on a fixed cadence and
//! forwards confirm presses and connectivity changes; each call returns the
//! handful of [`ControllerEvent`]s it produced.

mod output;
#[cfg(test)]
mod tests;

pub use output::{ControllerEvent, ControllerOutput};

use output::EventSink;

use crate::{
    alarm::Alarm,
    calibration::{CalibrationEngine, CalibrationTarget, Thresholds},
    classifier::{classify, SampleWindow, Verdict, WindowStats},
    config::GameConfig,
    difficulty::WindowSchedule,
    error::GameError,
    instruction::{Instruction, InstructionGenerator},
    phase::{GamePhase, PhaseApplyResult, PhaseCommand, PhaseEngine, TutorialPhase},
    ports::{
        DistanceSampler, Indicator, IndicatorOutput, PlayerIdentity, PlayerName, ScoreReporter,
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstructionPhase {
    AwaitingNew,
    /// Both indicators hold a steady level.
    Showing,
    /// The cue indicator blinks.
    Alternating,
    EndSequenceStarted,
    EndSequenceActive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SamplingPhase {
    WindowStarted,
    WindowOpen,
    WindowClosed,
    Idle,
}

pub struct GameController<S, I, R> {
    config: GameConfig,
    phases: PhaseEngine,
    instruction_phase: InstructionPhase,
    sampling_phase: SamplingPhase,
    instruction: Option<Instruction>,
    generator: InstructionGenerator,
    calibration: CalibrationEngine,
    window: SampleWindow,
    schedule: WindowSchedule,
    window_alarm: Alarm,
    blink_alarm: Alarm,
    end_alarm: Alarm,
    blink_on: bool,
    tutorial_shown: Option<TutorialPhase>,
    round_score: u8,
    player: Option<PlayerName>,
    sampler: S,
    indicators: I,
    score: R,
}

impl<S, I, R> GameController<S, I, R>
where
    S: DistanceSampler,
    I: IndicatorOutput,
    R: ScoreReporter,
{
    pub fn new<P: PlayerIdentity>(
        config: GameConfig,
        seed: u32,
        sampler: S,
        indicators: I,
        score: R,
        identity: &mut P,
    ) -> Self {
        let player = identity.player_name();
        match player.as_deref() {
            Some(name) => log::info!("welcome, {}", name),
            None => log::info!("welcome, anonymous player"),
        }

        let mut controller = Self {
            config,
            phases: PhaseEngine::new(),
            instruction_phase: InstructionPhase::AwaitingNew,
            sampling_phase: SamplingPhase::Idle,
            instruction: None,
            generator: InstructionGenerator::new(seed),
            calibration: CalibrationEngine::new(
                config.default_thresholds,
                config.calibration_margin_mm,
                config.calibration_samples,
            ),
            window: SampleWindow::with_mid_band_bridging(config.alternation_bridges_mid_band),
            schedule: WindowSchedule::from_config(&config),
            window_alarm: Alarm::new(),
            blink_alarm: Alarm::new(),
            end_alarm: Alarm::new(),
            blink_on: false,
            tutorial_shown: None,
            round_score: 0,
            player,
            sampler,
            indicators,
            score,
        };
        controller.lights_off();
        controller
    }

    pub fn phase(&self) -> GamePhase {
        self.phases.game()
    }

    pub fn tutorial_phase(&self) -> TutorialPhase {
        self.phases.tutorial()
    }

    pub fn instruction_phase(&self) -> InstructionPhase {
        self.instruction_phase
    }

    pub fn sampling_phase(&self) -> SamplingPhase {
        self.sampling_phase
    }

    pub fn thresholds(&self) -> Thresholds {
        self.calibration.thresholds()
    }

    pub fn current_instruction(&self) -> Option<Instruction> {
        self.instruction
    }

    pub fn window_stats(&self) -> WindowStats {
        self.window.stats()
    }

    pub fn window_ms(&self) -> u32 {
        self.schedule.window_ms()
    }

    /// Correct answers in the running match.
    pub fn round_score(&self) -> u8 {
        self.round_score
    }

    pub fn player_name(&self) -> Option<&str> {
        self.player.as_deref()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn sampler_mut(&mut self) -> &mut S {
        &mut self.sampler
    }

    pub fn indicators(&self) -> &I {
        &self.indicators
    }

    pub fn score_reporter(&self) -> &R {
        &self.score
    }

    pub fn tick(&mut self, now_ms: u64) -> ControllerOutput {
        let mut out = EventSink::default();
        match self.phases.game() {
            GamePhase::CalibratingNear => {
                self.calibration_step(CalibrationTarget::Near, &mut out);
            }
            GamePhase::CalibratingFar => self.calibration_step(CalibrationTarget::Far, &mut out),
            GamePhase::Tutorial => self.tutorial_step(now_ms, &mut out),
            GamePhase::Playing | GamePhase::Paused => self.play_step(now_ms, &mut out),
            GamePhase::Ending | GamePhase::Ended => self.end_step(now_ms, &mut out),
            GamePhase::Initialized
            | GamePhase::CalibratingNearPending
            | GamePhase::CalibratingFarPending
            | GamePhase::PausedPending
            | GamePhase::EndedPending => {}
        }
        out.finish()
    }

    pub fn confirm(&mut self) -> ControllerOutput {
        let mut out = EventSink::default();
        let result = self.apply(PhaseCommand::Confirm, &mut out);
        if !result.changed() {
            log::debug!("confirm ignored in {}", result.before.game.as_str());
            return out.finish();
        }

        if result.game_changed() {
            match (result.before.game, result.after.game) {
                (_, GamePhase::Tutorial) => self.tutorial_shown = None,
                (GamePhase::Tutorial, _) => {
                    self.blink_alarm.cancel();
                    self.lights_off();
                }
                _ => {}
            }
        }
        if result.starts_new_game() {
            self.start_new_game();
        }
        out.finish()
    }

    /// Forces the game to end; a running match reports its score first.
    pub fn connectivity_lost(&mut self) -> ControllerOutput {
        let mut out = EventSink::default();
        let game = self.phases.game();
        log::warn!("{} in {}", GameError::ConnectivityLost, game.as_str());

        if game.in_match() {
            if self.instruction_phase != InstructionPhase::EndSequenceActive {
                self.score.update_high_score();
                out.emit(ControllerEvent::GameOver {
                    score: self.round_score,
                });
            }
            self.score.reset();
            self.round_score = 0;
        }
        self.halt();
        self.apply(PhaseCommand::ConnectivityLost, &mut out);
        out.finish()
    }

    /// Connectivity is back; an ended game returns to the start of the graph.
    pub fn restart(&mut self) -> ControllerOutput {
        let mut out = EventSink::default();
        let result = self.apply(PhaseCommand::Restart, &mut out);
        if result.changed() {
            self.halt();
            self.instruction = None;
            self.tutorial_shown = None;
        }
        out.finish()
    }

    fn apply(&mut self, command: PhaseCommand, out: &mut EventSink) -> PhaseApplyResult {
        let result = self.phases.apply(command);
        if result.game_changed() {
            out.emit(ControllerEvent::PhaseChanged {
                from: result.before.game,
                to: result.after.game,
            });
        }
        result
    }

    fn calibration_step(&mut self, target: CalibrationTarget, out: &mut EventSink) {
        let report = self
            .calibration
            .run_calibration_phase(target, &mut self.sampler);
        out.emit(ControllerEvent::CalibrationMeasured(report));

        if target == CalibrationTarget::Far {
            match self.calibration.validate() {
                Ok(thresholds) => out.emit(ControllerEvent::CalibrationAccepted(thresholds)),
                Err(_) => out.emit(ControllerEvent::CalibrationInvalid(
                    self.calibration.thresholds(),
                )),
            }
        }
        self.apply(PhaseCommand::StepComplete, out);
    }

    fn tutorial_step(&mut self, now_ms: u64, out: &mut EventSink) {
        let step = self.phases.tutorial();
        if self.tutorial_shown == Some(step) {
            if self.blink_alarm.expired(now_ms) {
                self.toggle_cue(now_ms);
            }
            return;
        }

        self.tutorial_shown = Some(step);
        let (negation, cue) = step.demo_levels();
        self.indicators.set(Indicator::Negation, negation);
        self.show_cue(cue, now_ms);
        out.emit(ControllerEvent::TutorialShown(step));
    }

    fn play_step(&mut self, now_ms: u64, out: &mut EventSink) {
        if self.phases.game() == GamePhase::Paused {
            self.halt();
            self.apply(PhaseCommand::StepComplete, out);
            return;
        }

        match self.instruction_phase {
            InstructionPhase::AwaitingNew => self.show_next_instruction(now_ms, out),
            InstructionPhase::Alternating => {
                if self.blink_alarm.expired(now_ms) {
                    self.toggle_cue(now_ms);
                }
            }
            InstructionPhase::Showing
            | InstructionPhase::EndSequenceStarted
            | InstructionPhase::EndSequenceActive => {}
        }
        self.sampling_step(now_ms, out);
    }

    fn show_next_instruction(&mut self, now_ms: u64, out: &mut EventSink) {
        let instruction = self.generator.next_instruction(self.instruction);
        self.instruction = Some(instruction);
        self.indicators.set(Indicator::Negation, instruction.negated);
        self.show_cue(instruction.cue_level(), now_ms);
        self.instruction_phase = if instruction.blinks() {
            InstructionPhase::Alternating
        } else {
            InstructionPhase::Showing
        };
        self.sampling_phase = SamplingPhase::WindowStarted;
        out.emit(ControllerEvent::InstructionShown(instruction));
    }

    fn sampling_step(&mut self, now_ms: u64, out: &mut EventSink) {
        match self.sampling_phase {
            SamplingPhase::Idle => {}
            SamplingPhase::WindowStarted => {
                self.window.reset();
                self.window_alarm.arm(now_ms, self.schedule.window_ms());
                self.sampling_phase = SamplingPhase::WindowOpen;
            }
            SamplingPhase::WindowOpen => {
                match self.sampler.read() {
                    Ok(distance) => self
                        .window
                        .ingest_sample(distance, self.calibration.thresholds()),
                    Err(err) => {
                        log::trace!("{}", GameError::from(err));
                        self.window.record_failed_read();
                    }
                }
                if self.window_alarm.expired(now_ms) {
                    self.sampling_phase = SamplingPhase::WindowClosed;
                }
            }
            SamplingPhase::WindowClosed => self.close_window(out),
        }
    }

    fn close_window(&mut self, out: &mut EventSink) {
        self.sampling_phase = SamplingPhase::Idle;
        let Some(instruction) = self.instruction else {
            self.instruction_phase = InstructionPhase::AwaitingNew;
            return;
        };

        let stats = self.window.stats();
        let verdict = classify(
            instruction,
            &stats,
            self.calibration.thresholds(),
            &self.config,
        );
        out.emit(ControllerEvent::Verdict {
            instruction,
            verdict,
        });

        let before_ms = self.schedule.window_ms();
        let window_ms = self.schedule.on_timeout();
        if window_ms != before_ms {
            out.emit(ControllerEvent::WindowShortened { window_ms });
        }

        match verdict {
            Verdict::Correct => {
                self.score.increment();
                self.round_score = self.round_score.saturating_add(1);
                self.instruction_phase = InstructionPhase::AwaitingNew;
            }
            Verdict::Inconclusive => {
                log::warn!(
                    "no valid sample in window ({} failed reads)",
                    stats.failed_reads
                );
                self.instruction_phase = InstructionPhase::AwaitingNew;
            }
            Verdict::Incorrect => {
                self.blink_alarm.cancel();
                self.instruction_phase = InstructionPhase::EndSequenceStarted;
                self.apply(PhaseCommand::AnswerIncorrect, out);
            }
        }
    }

    fn end_step(&mut self, now_ms: u64, out: &mut EventSink) {
        if self.phases.game() == GamePhase::Ended {
            self.halt();
            self.apply(PhaseCommand::StepComplete, out);
            return;
        }

        if self.instruction_phase != InstructionPhase::EndSequenceActive {
            self.begin_end_sequence(now_ms, out);
            return;
        }

        if self.end_alarm.expired(now_ms) {
            self.halt();
            self.score.reset();
            self.round_score = 0;
            self.apply(PhaseCommand::StepComplete, out);
        } else if self.blink_alarm.expired(now_ms) {
            self.blink_on = !self.blink_on;
            self.indicators.set(Indicator::Negation, self.blink_on);
            self.indicators.set(Indicator::Cue, self.blink_on);
            self.blink_alarm.arm(now_ms, self.config.blink_period_ms);
        }
    }

    fn begin_end_sequence(&mut self, now_ms: u64, out: &mut EventSink) {
        self.window_alarm.cancel();
        self.sampling_phase = SamplingPhase::Idle;
        self.score.update_high_score();
        log::info!("game over, score {}", self.round_score);
        out.emit(ControllerEvent::GameOver {
            score: self.round_score,
        });

        self.blink_on = true;
        self.indicators.set(Indicator::Negation, true);
        self.indicators.set(Indicator::Cue, true);
        self.blink_alarm.arm(now_ms, self.config.blink_period_ms);
        self.end_alarm.arm(now_ms, self.config.end_sequence_ms);
        self.instruction_phase = InstructionPhase::EndSequenceActive;
    }

    fn start_new_game(&mut self) {
        self.halt();
        self.schedule.reset();
        self.round_score = 0;
        self.instruction = None;
        log::info!("new game, window {} ms", self.schedule.window_ms());
    }

    /// Stops every timer and both lights, leaving the next tick to pick a fresh instruction.
    fn halt(&mut self) {
        self.window_alarm.cancel();
        self.blink_alarm.cancel();
        self.end_alarm.cancel();
        self.lights_off();
        self.instruction_phase = InstructionPhase::AwaitingNew;
        self.sampling_phase = SamplingPhase::Idle;
    }

    fn show_cue(&mut self, level: Option<bool>, now_ms: u64) {
        match level {
            Some(on) => {
                self.blink_alarm.cancel();
                self.indicators.set(Indicator::Cue, on);
            }
            None => {
                self.blink_on = true;
                self.indicators.set(Indicator::Cue, true);
                self.blink_alarm.arm(now_ms, self.config.blink_period_ms);
            }
        }
    }

    fn toggle_cue(&mut self, now_ms: u64) {
        self.blink_on = !self.blink_on;
        self.indicators.set(Indicator::Cue, self.blink_on);
        self.blink_alarm.arm(now_ms, self.config.blink_period_ms);
    }

    fn lights_off(&mut self) {
        self.blink_on = false;
        self.indicators.set(Indicator::Negation, false);
        self.indicators.set(Indicator::Cue, false);
    }
}
