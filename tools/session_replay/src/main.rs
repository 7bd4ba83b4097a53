use std::{
    collections::VecDeque,
    env,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    process,
};

use notnot_core::{
    ControllerOutput, Distance, DistanceSampler, GameConfig, GameController, Indicator,
    IndicatorOutput, PlayerName, ScoreBoard, SensorError,
};

const TICK_MS: u64 = 10;
const DEFAULT_SEED: u32 = 0x6E6F_746E;
const DEFAULT_TAIL_MS: u64 = 3_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TraceAction {
    Sample(Distance),
    ReadError,
    Confirm,
    Lost,
    Restart,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TraceEntry {
    ms: u64,
    action: TraceAction,
}

/// Replays recorded distances. Between entries the hand is assumed to hold
/// its last position, so the latest sample repeats until a new one arrives.
#[derive(Default)]
struct ReplaySampler {
    pending: VecDeque<Result<Distance, SensorError>>,
    last: Option<Distance>,
}

impl DistanceSampler for ReplaySampler {
    fn read(&mut self) -> Result<Distance, SensorError> {
        match self.pending.pop_front() {
            Some(Ok(distance)) => {
                self.last = Some(distance);
                Ok(distance)
            }
            Some(Err(err)) => Err(err),
            None => self.last.ok_or(SensorError::Timeout),
        }
    }
}

#[derive(Default)]
struct ReplayLights {
    negation: bool,
    cue: bool,
}

impl IndicatorOutput for ReplayLights {
    fn set(&mut self, indicator: Indicator, on: bool) {
        match indicator {
            Indicator::Negation => self.negation = on,
            Indicator::Cue => self.cue = on,
        }
    }
}

type ReplayController = GameController<ReplaySampler, ReplayLights, ScoreBoard>;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let mut trace_path: Option<PathBuf> = None;
    let mut expect_path: Option<PathBuf> = None;
    let mut seed = DEFAULT_SEED;
    let mut tail_ms = DEFAULT_TAIL_MS;
    let mut player: Option<PlayerName> = None;

    let mut idx = 1usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--expect" => {
                idx += 1;
                let Some(path) = args.get(idx) else {
                    return Err("missing path after --expect".into());
                };
                expect_path = Some(PathBuf::from(path));
            }
            "--seed" => {
                idx += 1;
                let raw = args.get(idx).ok_or("missing value after --seed")?;
                seed = parse_seed(raw)?;
            }
            "--tail-ms" => {
                idx += 1;
                let raw = args.get(idx).ok_or("missing value after --tail-ms")?;
                tail_ms = raw
                    .parse::<u64>()
                    .map_err(|e| format!("invalid --tail-ms '{raw}': {e}"))?;
            }
            "--player" => {
                idx += 1;
                let raw = args.get(idx).ok_or("missing value after --player")?;
                player = Some(
                    PlayerName::try_from(raw.as_str())
                        .map_err(|_| format!("player name too long: {raw}"))?,
                );
            }
            "-h" | "--help" => {
                println!("{}", usage());
                return Ok(());
            }
            value if value.starts_with('-') => {
                return Err(format!("unknown argument: {value}"));
            }
            value => {
                if trace_path.is_some() {
                    return Err("multiple trace paths provided".into());
                }
                trace_path = Some(PathBuf::from(value));
            }
        }
        idx += 1;
    }

    let trace_path = trace_path.ok_or_else(usage)?;
    let entries = parse_trace(&trace_path)?;

    let mut controller = GameController::new(
        GameConfig::default_const(),
        seed,
        ReplaySampler::default(),
        ReplayLights::default(),
        ScoreBoard::new(),
        &mut player,
    );

    let lines = replay(&mut controller, &entries, tail_ms);

    println!("event,ms,detail");
    for line in &lines {
        println!("event,{},{}", line.0, line.1);
    }
    let lights = controller.indicators();
    let board = controller.score_reporter();
    println!(
        "summary,phase={},score={},high_score={},negation={},cue={}",
        controller.phase().as_str(),
        board.score(),
        board.high_score(),
        lights.negation,
        lights.cue
    );

    if let Some(expect_path) = expect_path {
        let expected = parse_expected_lines(&expect_path)?;
        let actual: Vec<&str> = lines.iter().map(|(_, detail)| detail.as_str()).collect();
        if actual != expected {
            eprintln!("expected events:");
            for line in &expected {
                eprintln!("  {line}");
            }
            eprintln!("actual events:");
            for line in &actual {
                eprintln!("  {line}");
            }
            return Err("event sequence mismatch".into());
        }
    }

    Ok(())
}

fn usage() -> String {
    "usage: session_replay <trace.txt> [--expect expected_events.txt] [--seed N] [--tail-ms N] [--player NAME]"
        .to_string()
}

/// Ticks the controller on a fixed clock, applying each entry once its time is reached.
fn replay(
    controller: &mut ReplayController,
    entries: &[TraceEntry],
    tail_ms: u64,
) -> Vec<(u64, String)> {
    let end_ms = entries
        .last()
        .map_or(0, |entry| entry.ms)
        .saturating_add(tail_ms);

    let mut lines = Vec::new();
    let mut next = 0usize;
    let mut now_ms = 0u64;
    while now_ms <= end_ms {
        while let Some(entry) = entries.get(next).filter(|entry| entry.ms <= now_ms) {
            let output = match entry.action {
                TraceAction::Sample(distance) => {
                    controller.sampler_mut().pending.push_back(Ok(distance));
                    None
                }
                TraceAction::ReadError => {
                    controller
                        .sampler_mut()
                        .pending
                        .push_back(Err(SensorError::Timeout));
                    None
                }
                TraceAction::Confirm => Some(controller.confirm()),
                TraceAction::Lost => Some(controller.connectivity_lost()),
                TraceAction::Restart => Some(controller.restart()),
            };
            if let Some(output) = output {
                collect(&mut lines, now_ms, &output);
            }
            next += 1;
        }

        let output = controller.tick(now_ms);
        collect(&mut lines, now_ms, &output);
        now_ms += TICK_MS;
    }
    lines
}

fn collect(lines: &mut Vec<(u64, String)>, now_ms: u64, output: &ControllerOutput) {
    for event in output.iter() {
        lines.push((now_ms, event.to_string()));
    }
}

fn parse_seed(raw: &str) -> Result<u32, String> {
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => raw.parse::<u32>(),
    };
    parsed.map_err(|e| format!("invalid --seed '{raw}': {e}"))
}

fn parse_trace(path: &Path) -> Result<Vec<TraceEntry>, String> {
    let file = File::open(path).map_err(|e| format!("failed to open {}: {e}", path.display()))?;
    let reader = BufReader::new(file);

    let mut out: Vec<TraceEntry> = Vec::new();
    for (line_no, line_result) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line_result
            .map_err(|e| format!("failed to read {}:{}: {e}", path.display(), line_no))?;
        let Some(entry) = parse_trace_line(&line)
            .map_err(|e| format!("{}:{} {e}", path.display(), line_no))?
        else {
            continue;
        };
        if out.last().is_some_and(|prev| prev.ms > entry.ms) {
            return Err(format!(
                "{}:{} timestamps must not go backwards",
                path.display(),
                line_no
            ));
        }
        out.push(entry);
    }

    Ok(out)
}

fn parse_trace_line(line: &str) -> Result<Option<TraceEntry>, String> {
    let content = line.split('#').next().unwrap_or_default().trim();
    if content.is_empty() {
        return Ok(None);
    }

    let mut parts = content.split_whitespace();
    let (Some(ms_raw), Some(action_raw), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!(
            "expected '<ms> <mm|err|confirm|lost|restart>', got '{content}'"
        ));
    };
    let ms = ms_raw
        .parse::<u64>()
        .map_err(|e| format!("invalid ms '{ms_raw}': {e}"))?;

    let action = match action_raw.to_ascii_lowercase().as_str() {
        "err" => TraceAction::ReadError,
        "confirm" => TraceAction::Confirm,
        "lost" => TraceAction::Lost,
        "restart" => TraceAction::Restart,
        other => TraceAction::Sample(
            other
                .parse::<Distance>()
                .map_err(|e| format!("invalid distance '{action_raw}': {e}"))?,
        ),
    };

    Ok(Some(TraceEntry { ms, action }))
}

fn parse_expected_lines(path: &Path) -> Result<Vec<String>, String> {
    let file = File::open(path).map_err(|e| format!("failed to open {}: {e}", path.display()))?;
    let reader = BufReader::new(file);

    let mut expected = Vec::new();
    for (line_no, line_result) in reader.lines().enumerate() {
        let line = line_result
            .map_err(|e| format!("failed to read {}:{}: {e}", path.display(), line_no + 1))?;
        let token = line.trim();
        if token.is_empty() || token.starts_with('#') {
            continue;
        }
        expected.push(token.to_string());
    }

    Ok(expected)
}
