//! Criterion benchmarks for the key code translation tables.
//!
//! Measures control-key and character lookups, which run once per remote key
//! event that lacks an explicit host key code.
//!
//! Run with:
//! ```bash
//! cargo bench --package touchbridge-core --bench keymap_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use touchbridge_core::{ControlKey, KeyMapper};

// ── Representative keys for benchmarking ──────────────────────────────────────

const BENCH_CONTROL_KEYS: &[ControlKey] = &[
    ControlKey::Return,
    ControlKey::Backspace,
    ControlKey::Tab,
    ControlKey::Escape,
    ControlKey::LeftArrow,
    ControlKey::RightArrow,
    ControlKey::UpArrow,
    ControlKey::DownArrow,
    ControlKey::Home,
    ControlKey::End,
    ControlKey::F1,
    ControlKey::F12,
    ControlKey::VolumeUp,
    ControlKey::Power,
    ControlKey::Numpad5,
];

const BENCH_CHARS: &[char] = &[
    'a', 'Z', '0', '9', ' ', '\n', '\t', ',', '.', '/', '@', '+', '\\', 'é', '😀',
];

fn bench_control_key_to_android(c: &mut Criterion) {
    let mut group = c.benchmark_group("keymap_control_key");

    group.bench_function("single", |b| {
        b.iter(|| KeyMapper::control_key_to_android(black_box(ControlKey::Return)))
    });

    group.bench_function("batch_15", |b| {
        b.iter(|| {
            BENCH_CONTROL_KEYS
                .iter()
                .map(|&k| KeyMapper::control_key_to_android(black_box(k)))
                .collect::<Vec<_>>()
        })
    });

    group.finish();
}

fn bench_char_to_android(c: &mut Criterion) {
    let mut group = c.benchmark_group("keymap_char");

    // Letters resolve on the first branch; unmapped characters fall through every table.
    for ch in ['a', '\\', '😀'] {
        group.bench_with_input(BenchmarkId::new("char_to_android", ch.escape_unicode()), &ch, |b, &ch| {
            b.iter(|| KeyMapper::char_to_android(black_box(ch)))
        });
    }

    group.bench_function("batch_15", |b| {
        b.iter(|| {
            BENCH_CHARS
                .iter()
                .map(|&ch| KeyMapper::char_to_android(black_box(ch)))
                .collect::<Vec<_>>()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_control_key_to_android, bench_char_to_android);
criterion_main!(benches);
