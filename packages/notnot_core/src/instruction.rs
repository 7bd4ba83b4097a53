use crate::config::INSTRUCTION_MAX_DRAWS;
use crate::error::GameError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstructionKind {
    Near,
    Far,
    Alternate,
    /// Negated alternate: keep the hand still.
    HoldStill,
}

impl InstructionKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Near => "near",
            Self::Far => "far",
            Self::Alternate => "alternate",
            Self::HoldStill => "hold_still",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub negated: bool,
    pub kind: InstructionKind,
}

/// What the player has to do, once negation is folded in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expectation {
    Near,
    Far,
    Alternate,
    HoldStill,
}

impl core::fmt::Display for Instruction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.negated {
            f.write_str("not ")?;
        }
        f.write_str(self.kind.as_str())
    }
}

impl Instruction {
    pub const fn new(negated: bool, kind: InstructionKind) -> Self {
        Self { negated, kind }
    }

    pub const fn expectation(self) -> Expectation {
        match (self.kind, self.negated) {
            (InstructionKind::Near, false) | (InstructionKind::Far, true) => Expectation::Near,
            (InstructionKind::Far, false) | (InstructionKind::Near, true) => Expectation::Far,
            (InstructionKind::Alternate, false) => Expectation::Alternate,
            (InstructionKind::Alternate, true) | (InstructionKind::HoldStill, _) => {
                Expectation::HoldStill
            }
        }
    }

    /// Cue indicator blinks instead of holding a level.
    pub const fn blinks(self) -> bool {
        matches!(self.kind, InstructionKind::Alternate)
    }

    /// Steady level of the cue indicator; `None` while it blinks.
    pub const fn cue_level(self) -> Option<bool> {
        match self.kind {
            InstructionKind::Near => Some(true),
            InstructionKind::Far | InstructionKind::HoldStill => Some(false),
            InstructionKind::Alternate => None,
        }
    }
}

/// xorshift32; a zero seed is replaced so the state never sticks at zero.
#[derive(Clone, Copy, Debug)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    pub const fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9 } else { seed },
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    pub fn below(&mut self, bound: u32) -> u32 {
        self.next_u32() % bound.max(1)
    }
}

pub struct InstructionGenerator {
    rng: XorShift32,
    max_draws: u8,
}

impl InstructionGenerator {
    pub const fn new(seed: u32) -> Self {
        Self {
            rng: XorShift32::new(seed),
            max_draws: INSTRUCTION_MAX_DRAWS,
        }
    }

    pub fn with_rng(rng: XorShift32, max_draws: u8) -> Self {
        Self {
            rng,
            max_draws: max_draws.max(1),
        }
    }

    fn draw(&mut self) -> Instruction {
        let negated = self.rng.below(2) == 1;
        let kind = match self.rng.below(3) {
            0 => InstructionKind::Far,
            1 => InstructionKind::Near,
            _ => InstructionKind::Alternate,
        };
        if negated && matches!(kind, InstructionKind::Alternate) {
            Instruction::new(true, InstructionKind::HoldStill)
        } else {
            Instruction::new(negated, kind)
        }
    }

    fn allowed(candidate: Instruction, previous: Option<Instruction>) -> bool {
        if !matches!(candidate.kind, InstructionKind::HoldStill) {
            return true;
        }
        match previous {
            None => false,
            Some(prev) => !matches!(prev.kind, InstructionKind::Alternate),
        }
    }

    /// Rejection-samples a draw that respects the hold-still sequencing rule.
    pub fn try_next(&mut self, previous: Option<Instruction>) -> Result<Instruction, GameError> {
        for _ in 0..self.max_draws {
            let candidate = self.draw();
            if Self::allowed(candidate, previous) {
                return Ok(candidate);
            }
        }
        Err(GameError::InstructionGenerationExhausted)
    }

    pub fn next_instruction(&mut self, previous: Option<Instruction>) -> Instruction {
        match self.try_next(previous) {
            Ok(instruction) => instruction,
            Err(err) => {
                log::error!("{}", err);
                // Only a negated alternate can be rejected; its plain form always passes.
                Instruction::new(false, InstructionKind::Alternate)
            }
        }
    }
}
