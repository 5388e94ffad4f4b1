/// Point-in-time classification of the typed buffer against the reference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Classification {
    pub correct: usize,
    pub errors: usize,
}

/// Metrics emitted to the presentation layer after every input and tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub wpm: u32,
    pub accuracy: u8,
    pub errors: usize,
}

/// Compare the typed buffer against the reference, index by index.
///
/// Characters typed beyond the reference length are classified neither
/// correct nor incorrect. Counters are snapshots of the current buffer, not
/// running tallies, so a shrinking buffer simply yields smaller counts.
pub fn classify(reference: &str, typed: &str) -> Classification {
    let mut result = Classification::default();

    for (typed_char, expected) in typed.chars().zip(reference.chars()) {
        if typed_char == expected {
            result.correct += 1;
        } else {
            result.errors += 1;
        }
    }

    result
}

/// Words-per-minute over the elapsed session time, with a word fixed at five
/// correct characters. Returns `None` while no time has elapsed; callers
/// retain the previously displayed value instead of showing a division
/// artifact in the first sub-second interval.
pub fn wpm(correct_keystrokes: usize, elapsed_ms: u64) -> Option<u32> {
    if elapsed_ms == 0 {
        return None;
    }

    let elapsed_minutes = elapsed_ms as f64 / 60_000.0;
    let words = correct_keystrokes as f64 / 5.0;

    Some((words / elapsed_minutes).round() as u32)
}

/// Percentage of counted keystrokes not currently classified as incorrect.
/// An untouched session reads as 100%.
pub fn accuracy(total_keystrokes: u64, errors: usize) -> u8 {
    if total_keystrokes == 0 {
        return 100;
    }

    let correct = total_keystrokes.saturating_sub(errors as u64);
    ((correct as f64 / total_keystrokes as f64) * 100.0).round() as u8
}
