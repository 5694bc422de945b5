use crate::task::TaskKind;

/// Multiplier applied to every submitted answer during an exercise.
pub const SUBMIT_MULTIPLIER: u32 = 2;

pub fn base_points(kind: TaskKind) -> u32 {
    match kind {
        TaskKind::Punctuation => 20,
        TaskKind::Spelling => 15,
        TaskKind::Generic => 10,
    }
}

/// Fixed points per answer; wrong answers earn nothing.
pub fn task_points(kind: TaskKind, correct: bool, multiplier: u32) -> u32 {
    if !correct {
        return 0;
    }
    base_points(kind).saturating_mul(multiplier.max(1))
}

pub fn accuracy(correct: u32, attempts: u32) -> f64 {
    if attempts == 0 {
        return 0.0;
    }
    (correct as f64 / attempts as f64 * 100.0).clamp(0.0, 100.0)
}
