#![no_main]

use libfuzzer_sys::fuzz_target;

use formula_fold::{detect_mode, fold, switch_mode, unfold, Mode};

/// Excel's display limit, plus some slack for wrapper characters.
const MAX_FUZZ_FORMULA_CHARS: usize = 8_192 + 256;
const MAX_INPUT_BYTES: usize = MAX_FUZZ_FORMULA_CHARS * 4; // max UTF-8 bytes per char

fn truncate_to_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let data = if data.len() > MAX_INPUT_BYTES {
        &data[..MAX_INPUT_BYTES]
    } else {
        data
    };

    let input = String::from_utf8_lossy(&data[1..]);
    let formula = truncate_to_chars(&input, MAX_FUZZ_FORMULA_CHARS);

    let modes = Mode::all();
    let from = modes[usize::from(data[0]) % modes.len()];
    let to = modes[usize::from(data[0] >> 4) % modes.len()];

    // Every entry point is total: arbitrary text folds, unfolds and switches without panicking.
    let folded = fold(from.id(), formula).unwrap();
    let _ = detect_mode(&folded);
    let switched = switch_mode(&folded, from.id(), to.id()).unwrap();
    let unfolded = unfold(to.id(), &switched).unwrap();
    let _ = unfold(from.id(), formula).unwrap();

    std::hint::black_box(unfolded);
});
