use std::collections::VecDeque;
use std::vec::Vec;

use super::{ControllerEvent, GameController, InstructionPhase, SamplingPhase};
use crate::{
    calibration::{CalibrationTarget, Thresholds},
    classifier::Verdict,
    config::GameConfig,
    error::SensorError,
    instruction::{Expectation, Instruction},
    phase::{GamePhase, TutorialPhase},
    ports::{DistanceSampler, Indicator, IndicatorOutput, PlayerName},
    score::ScoreBoard,
    Distance,
};

#[derive(Default)]
struct ScriptedSampler {
    samples: VecDeque<Result<Distance, SensorError>>,
}

impl ScriptedSampler {
    fn push(&mut self, samples: &[Distance]) {
        self.samples.extend(samples.iter().map(|&sample| Ok(sample)));
    }

    fn push_results(&mut self, samples: &[Result<Distance, SensorError>]) {
        self.samples.extend(samples.iter().copied());
    }
}

impl DistanceSampler for ScriptedSampler {
    fn read(&mut self) -> Result<Distance, SensorError> {
        self.samples.pop_front().unwrap_or(Err(SensorError::Timeout))
    }
}

#[derive(Default)]
struct Lights {
    negation: bool,
    cue: bool,
}

impl IndicatorOutput for Lights {
    fn set(&mut self, indicator: Indicator, on: bool) {
        match indicator {
            Indicator::Negation => self.negation = on,
            Indicator::Cue => self.cue = on,
        }
    }
}

type Controller = GameController<ScriptedSampler, Lights, ScoreBoard>;

struct Harness {
    controller: Controller,
    now_ms: u64,
}

impl Harness {
    fn new() -> Self {
        Self::with_name(None)
    }

    fn with_name(name: Option<&str>) -> Self {
        Self::build(GameConfig::default(), name)
    }

    fn with_config(config: GameConfig) -> Self {
        Self::build(config, None)
    }

    fn build(config: GameConfig, name: Option<&str>) -> Self {
        let mut identity: Option<PlayerName> =
            name.and_then(|name| PlayerName::try_from(name).ok());
        Self {
            controller: GameController::new(
                config,
                0xBADC_0FFE,
                ScriptedSampler::default(),
                Lights::default(),
                ScoreBoard::new(),
                &mut identity,
            ),
            now_ms: 0,
        }
    }

    fn tick(&mut self) -> Vec<ControllerEvent> {
        self.now_ms += 10;
        self.controller.tick(self.now_ms).iter().copied().collect()
    }

    fn confirm(&mut self) -> Vec<ControllerEvent> {
        self.controller.confirm().iter().copied().collect()
    }

    fn lights(&self) -> (bool, bool) {
        let lights = self.controller.indicators();
        (lights.negation, lights.cue)
    }

    fn score(&self) -> (u8, u8) {
        let board = self.controller.score_reporter();
        (board.score(), board.high_score())
    }

    fn tick_until(
        &mut self,
        max_ticks: usize,
        wanted: impl Fn(&ControllerEvent) -> bool,
    ) -> ControllerEvent {
        for _ in 0..max_ticks {
            if let Some(event) = self.tick().into_iter().find(|event| wanted(event)) {
                return event;
            }
        }
        panic!("event not produced within {max_ticks} ticks");
    }

    fn reach_tutorial(&mut self) {
        self.confirm();
        self.tick();
        self.confirm();
        self.tick();
        self.confirm();
        assert_eq!(self.controller.phase(), GamePhase::Tutorial);
    }

    /// Calibration sees only failed reads, so the default 150/250 thresholds stay.
    fn reach_playing(&mut self) {
        self.reach_tutorial();
        for _ in 0..7 {
            self.confirm();
        }
        assert_eq!(self.controller.phase(), GamePhase::Playing);
        assert_eq!(
            self.controller.thresholds(),
            Thresholds {
                near: 150,
                far: 250
            }
        );
    }

    fn next_instruction(&mut self) -> Instruction {
        let shown = self
            .tick()
            .into_iter()
            .find_map(|event| match event {
                ControllerEvent::InstructionShown(instruction) => Some(instruction),
                _ => None,
            });
        match shown {
            Some(instruction) => instruction,
            None => panic!("no instruction shown"),
        }
    }

    fn play_round(&mut self, samples: &[Distance]) -> Verdict {
        self.controller.sampler_mut().push(samples);
        match self.tick_until(400, |event| matches!(event, ControllerEvent::Verdict { .. })) {
            ControllerEvent::Verdict { verdict, .. } => verdict,
            _ => unreachable!(),
        }
    }

    fn answer_correctly(&mut self) {
        let instruction = self.next_instruction();
        assert_eq!(
            self.play_round(correct_answer(instruction.expectation())),
            Verdict::Correct
        );
    }
}

fn correct_answer(expectation: Expectation) -> &'static [Distance] {
    match expectation {
        Expectation::Near => &[140, 130],
        Expectation::Far => &[260],
        Expectation::Alternate => &[140, 260, 140, 260],
        Expectation::HoldStill => &[150, 155, 148],
    }
}

fn wrong_answer(expectation: Expectation) -> &'static [Distance] {
    match expectation {
        Expectation::Near => &[300],
        Expectation::Far => &[100],
        Expectation::Alternate => &[200],
        Expectation::HoldStill => &[100, 300],
    }
}

#[test]
fn player_identity_is_read_once_at_startup() {
    let named = Harness::with_name(Some("ada"));
    assert_eq!(named.controller.player_name(), Some("ada"));
    let anonymous = Harness::new();
    assert_eq!(anonymous.controller.player_name(), None);
}

#[test]
fn calibration_derives_thresholds_from_both_phases() {
    let mut h = Harness::new();
    assert_eq!(
        h.confirm(),
        [ControllerEvent::PhaseChanged {
            from: GamePhase::Initialized,
            to: GamePhase::CalibratingNear
        }]
    );

    h.controller.sampler_mut().push(&[80; 10]);
    let events = h.tick();
    assert!(matches!(
        events[0],
        ControllerEvent::CalibrationMeasured(report)
            if report.target == CalibrationTarget::Near && report.threshold == 130
    ));
    assert_eq!(h.controller.phase(), GamePhase::CalibratingNearPending);

    // Nothing happens until the player confirms.
    assert!(h.tick().is_empty());

    h.confirm();
    h.controller.sampler_mut().push(&[320; 10]);
    let events = h.tick();
    assert!(events.contains(&ControllerEvent::CalibrationAccepted(Thresholds {
        near: 130,
        far: 270
    })));
    assert!(events.contains(&ControllerEvent::PhaseChanged {
        from: GamePhase::CalibratingFar,
        to: GamePhase::CalibratingFarPending
    }));
}

#[test]
fn overlapping_calibration_restores_defaults() {
    let mut h = Harness::new();
    h.confirm();
    h.controller.sampler_mut().push(&[200; 10]);
    h.tick();
    h.confirm();
    h.controller.sampler_mut().push(&[220; 10]);
    let events = h.tick();
    let defaults = GameConfig::default().default_thresholds;
    assert!(events.contains(&ControllerEvent::CalibrationInvalid(defaults)));
    assert_eq!(h.controller.thresholds(), defaults);
    assert_eq!(h.controller.phase(), GamePhase::CalibratingFarPending);
}

#[test]
fn calibration_tolerates_failed_reads() {
    let mut h = Harness::new();
    h.confirm();
    h.controller.sampler_mut().push_results(&[
        Ok(100),
        Err(SensorError::Bus),
        Ok(100),
        Ok(100),
        Err(SensorError::Timeout),
        Ok(100),
        Ok(100),
        Ok(100),
        Ok(100),
        Ok(100),
    ]);
    h.tick();
    assert_eq!(h.controller.thresholds().near, 150);
}

#[test]
fn tutorial_demonstrates_each_step_once() {
    let mut h = Harness::new();
    h.reach_tutorial();

    assert_eq!(h.tick(), [ControllerEvent::TutorialShown(TutorialPhase::Start)]);
    assert_eq!(h.lights(), (false, false));
    assert!(h.tick().is_empty());

    h.confirm();
    assert_eq!(h.tick(), [ControllerEvent::TutorialShown(TutorialPhase::Near)]);
    assert_eq!(h.lights(), (false, true));

    h.confirm();
    h.tick();
    assert_eq!(h.lights(), (false, false));

    h.confirm();
    assert_eq!(
        h.tick(),
        [ControllerEvent::TutorialShown(TutorialPhase::Alternate)]
    );
    assert_eq!(h.lights(), (false, true));
    for _ in 0..25 {
        h.tick();
    }
    assert_eq!(h.lights(), (false, false));
    for _ in 0..25 {
        h.tick();
    }
    assert_eq!(h.lights(), (false, true));

    h.confirm();
    assert_eq!(
        h.tick(),
        [ControllerEvent::TutorialShown(TutorialPhase::Negation)]
    );
    assert_eq!(h.lights(), (true, true));

    h.confirm();
    h.tick();
    assert_eq!(h.controller.tutorial_phase(), TutorialPhase::Pause);
    assert_eq!(h.lights(), (false, false));

    h.confirm();
    h.tick();
    assert_eq!(h.lights(), (true, true));

    let events = h.confirm();
    assert_eq!(
        events,
        [ControllerEvent::PhaseChanged {
            from: GamePhase::Tutorial,
            to: GamePhase::Playing
        }]
    );
    assert_eq!(h.lights(), (false, false));
}

#[test]
fn instruction_drives_both_indicators() {
    let mut h = Harness::new();
    h.reach_playing();
    for _ in 0..20 {
        let instruction = h.next_instruction();
        let (negation, cue) = h.lights();
        assert_eq!(negation, instruction.negated);
        match instruction.cue_level() {
            Some(level) => {
                assert_eq!(cue, level);
                assert_eq!(h.controller.instruction_phase(), InstructionPhase::Showing);
            }
            None => {
                assert!(cue);
                assert_eq!(
                    h.controller.instruction_phase(),
                    InstructionPhase::Alternating
                );
            }
        }
        assert_eq!(h.controller.sampling_phase(), SamplingPhase::WindowOpen);
        h.play_round(correct_answer(instruction.expectation()));
    }
}

#[test]
fn correct_answers_score_for_every_instruction_kind() {
    let mut h = Harness::new();
    h.reach_playing();

    let mut seen = [false; 4];
    let mut rounds = 0u8;
    while !seen.iter().all(|&kind| kind) {
        assert!(rounds < 200, "instruction kinds not covered: {seen:?}");
        let instruction = h.next_instruction();
        let expectation = instruction.expectation();
        seen[match expectation {
            Expectation::Near => 0,
            Expectation::Far => 1,
            Expectation::Alternate => 2,
            Expectation::HoldStill => 3,
        }] = true;

        assert_eq!(h.play_round(correct_answer(expectation)), Verdict::Correct);
        rounds += 1;
        assert_eq!(h.score().0, rounds);
        assert_eq!(h.controller.round_score(), rounds);
        assert_eq!(h.controller.phase(), GamePhase::Playing);
    }
}

#[test]
fn alternate_window_counts_three_crossings() {
    let mut h = Harness::new();
    h.reach_playing();
    loop {
        let instruction = h.next_instruction();
        let expectation = instruction.expectation();
        assert_eq!(h.play_round(correct_answer(expectation)), Verdict::Correct);
        if expectation == Expectation::Alternate {
            assert_eq!(h.controller.window_stats().alternation_count, 3);
            break;
        }
    }
}

#[test]
fn mid_band_samples_break_alternation_unless_bridging_is_enabled() {
    let sweep: &[Distance] = &[140, 200, 260, 200, 140, 200, 260];
    for (bridge, expected) in [(false, 0), (true, 3)] {
        let mut h = Harness::with_config(GameConfig {
            alternation_bridges_mid_band: bridge,
            ..GameConfig::default()
        });
        h.reach_playing();
        loop {
            let instruction = h.next_instruction();
            let expectation = instruction.expectation();
            if expectation != Expectation::Alternate {
                assert_eq!(h.play_round(correct_answer(expectation)), Verdict::Correct);
                continue;
            }
            let verdict = h.play_round(sweep);
            assert_eq!(h.controller.window_stats().alternation_count, expected);
            let wanted = if bridge {
                Verdict::Correct
            } else {
                Verdict::Incorrect
            };
            assert_eq!(verdict, wanted);
            break;
        }
    }
}

#[test]
fn empty_window_is_inconclusive_and_play_continues() {
    let mut h = Harness::new();
    h.reach_playing();
    h.next_instruction();
    assert_eq!(h.play_round(&[]), Verdict::Inconclusive);
    assert_eq!(h.controller.phase(), GamePhase::Playing);
    assert_eq!(h.score(), (0, 0));
    assert!(h.controller.window_stats().failed_reads > 0);
    h.next_instruction();
}

#[test]
fn wrong_answer_runs_end_sequence() {
    let mut h = Harness::new();
    h.reach_playing();
    h.answer_correctly();
    h.answer_correctly();

    let instruction = h.next_instruction();
    h.controller
        .sampler_mut()
        .push(wrong_answer(instruction.expectation()));
    let ending = h.tick_until(400, |event| {
        matches!(
            event,
            ControllerEvent::PhaseChanged {
                to: GamePhase::Ending,
                ..
            }
        )
    });
    assert!(matches!(
        ending,
        ControllerEvent::PhaseChanged {
            from: GamePhase::Playing,
            ..
        }
    ));

    assert_eq!(h.tick(), [ControllerEvent::GameOver { score: 2 }]);
    assert_eq!(h.score(), (2, 2));
    assert_eq!(h.lights(), (true, true));
    assert_eq!(
        h.controller.instruction_phase(),
        InstructionPhase::EndSequenceActive
    );

    // Confirm has no meaning while the end sequence runs.
    assert!(h.confirm().is_empty());

    h.tick_until(210, |event| {
        *event
            == ControllerEvent::PhaseChanged {
                from: GamePhase::Ending,
                to: GamePhase::Ended,
            }
    });
    assert_eq!(h.score(), (0, 2));
    assert_eq!(h.lights(), (false, false));

    h.tick();
    assert_eq!(h.controller.phase(), GamePhase::EndedPending);
}

#[test]
fn end_sequence_blinks_for_two_seconds() {
    let mut h = Harness::new();
    h.reach_playing();
    let instruction = h.next_instruction();
    assert_eq!(
        h.play_round(wrong_answer(instruction.expectation())),
        Verdict::Incorrect
    );
    h.tick();
    let started = h.now_ms;
    let mut toggles = 0;
    let mut previous = h.lights();
    while h.controller.phase() == GamePhase::Ending {
        h.tick();
        let lights = h.lights();
        if lights != previous && h.controller.phase() == GamePhase::Ending {
            assert_eq!(lights.0, lights.1);
            toggles += 1;
        }
        previous = lights;
    }
    assert_eq!(h.now_ms - started, 2_000);
    assert_eq!(toggles, 7);
}

#[test]
fn restart_after_game_over_keeps_calibration_and_resets_window() {
    let mut h = Harness::new();
    h.reach_playing();
    for _ in 0..3 {
        h.answer_correctly();
    }
    assert_eq!(h.controller.window_ms(), 2_700);

    let instruction = h.next_instruction();
    h.play_round(wrong_answer(instruction.expectation()));
    h.tick_until(250, |event| {
        matches!(
            event,
            ControllerEvent::PhaseChanged {
                to: GamePhase::EndedPending,
                ..
            }
        )
    });

    let thresholds = h.controller.thresholds();
    let events = h.confirm();
    assert_eq!(
        events,
        [ControllerEvent::PhaseChanged {
            from: GamePhase::EndedPending,
            to: GamePhase::Playing
        }]
    );
    assert_eq!(h.controller.window_ms(), 3_000);
    assert_eq!(h.controller.round_score(), 0);
    assert_eq!(h.controller.thresholds(), thresholds);
    h.answer_correctly();
    assert_eq!(h.score(), (1, 3));
}

#[test]
fn response_window_shrinks_to_floor() {
    let mut h = Harness::new();
    h.reach_playing();
    let mut shortened = 0;
    for round in 1..=25u32 {
        let instruction = h.next_instruction();
        h.controller
            .sampler_mut()
            .push(correct_answer(instruction.expectation()));
        loop {
            let events = h.tick();
            shortened += events
                .iter()
                .filter(|event| matches!(event, ControllerEvent::WindowShortened { .. }))
                .count();
            if events
                .iter()
                .any(|event| matches!(event, ControllerEvent::Verdict { .. }))
            {
                break;
            }
        }
        let expected = 3_000u32.saturating_sub(round * 100).max(1_000);
        assert_eq!(h.controller.window_ms(), expected);
    }
    assert_eq!(shortened, 20);
}

#[test]
fn pause_cancels_window_and_resume_shows_new_instruction() {
    let mut h = Harness::new();
    h.reach_playing();
    h.answer_correctly();
    h.next_instruction();
    h.tick();

    assert_eq!(
        h.confirm(),
        [ControllerEvent::PhaseChanged {
            from: GamePhase::Playing,
            to: GamePhase::Paused
        }]
    );
    h.tick();
    assert_eq!(h.controller.phase(), GamePhase::PausedPending);
    assert_eq!(h.lights(), (false, false));
    assert_eq!(h.controller.sampling_phase(), SamplingPhase::Idle);

    for _ in 0..400 {
        assert!(h.tick().is_empty());
    }

    h.confirm();
    assert_eq!(h.controller.phase(), GamePhase::Playing);
    h.next_instruction();
    assert_eq!(h.controller.round_score(), 1);
    assert_eq!(h.controller.window_ms(), 2_900);
}

#[test]
fn sensor_failures_during_play_never_end_the_game() {
    let mut h = Harness::new();
    h.reach_playing();
    let instruction = h.next_instruction();
    let answer = correct_answer(instruction.expectation());
    let mut script = Vec::new();
    for &sample in answer {
        script.push(Err(SensorError::Bus));
        script.push(Ok(sample));
    }
    h.controller.sampler_mut().push_results(&script);
    assert_eq!(h.play_round(&[]), Verdict::Correct);
    assert_eq!(h.controller.window_stats().failed_reads, 300 - answer.len() as u16);
}

#[test]
fn connectivity_loss_during_end_sequence_reports_game_over_once() {
    let mut h = Harness::new();
    h.reach_playing();
    h.answer_correctly();
    let instruction = h.next_instruction();
    assert_eq!(
        h.play_round(wrong_answer(instruction.expectation())),
        Verdict::Incorrect
    );
    assert_eq!(h.tick(), [ControllerEvent::GameOver { score: 1 }]);
    assert_eq!(
        h.controller.instruction_phase(),
        InstructionPhase::EndSequenceActive
    );

    let events: Vec<_> = h.controller.connectivity_lost().iter().copied().collect();
    assert_eq!(
        events,
        [ControllerEvent::PhaseChanged {
            from: GamePhase::Ending,
            to: GamePhase::Ended
        }]
    );
    assert_eq!(h.score(), (0, 1));
    assert_eq!(h.lights(), (false, false));
}

#[test]
fn connectivity_loss_reports_score_and_forces_end() {
    let mut h = Harness::new();
    h.reach_playing();
    h.answer_correctly();
    h.next_instruction();

    let events = h.controller.connectivity_lost();
    let events: Vec<_> = events.iter().copied().collect();
    assert_eq!(
        events,
        [
            ControllerEvent::GameOver { score: 1 },
            ControllerEvent::PhaseChanged {
                from: GamePhase::Playing,
                to: GamePhase::Ended
            }
        ]
    );
    assert_eq!(h.score(), (0, 1));
    assert_eq!(h.lights(), (false, false));

    h.tick();
    assert_eq!(h.controller.phase(), GamePhase::EndedPending);

    let restart: Vec<_> = h.controller.restart().iter().copied().collect();
    assert_eq!(
        restart,
        [ControllerEvent::PhaseChanged {
            from: GamePhase::EndedPending,
            to: GamePhase::Initialized
        }]
    );
    h.confirm();
    assert_eq!(h.controller.phase(), GamePhase::CalibratingNear);
}

#[test]
fn connectivity_loss_before_a_match_reports_nothing() {
    let mut h = Harness::new();
    let events: Vec<_> = h.controller.connectivity_lost().iter().copied().collect();
    assert_eq!(
        events,
        [ControllerEvent::PhaseChanged {
            from: GamePhase::Initialized,
            to: GamePhase::Ended
        }]
    );
    assert_eq!(h.score(), (0, 0));
}

#[test]
fn restart_is_ignored_while_playing() {
    let mut h = Harness::new();
    h.reach_playing();
    assert!(h.controller.restart().is_empty());
    assert_eq!(h.controller.phase(), GamePhase::Playing);
}
