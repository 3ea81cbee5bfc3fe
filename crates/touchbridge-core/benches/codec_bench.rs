//! Criterion benchmarks for the touchbridge key-message codec and pointer decoder.
//!
//! Every remote key stroke passes through `decode_key_message` and every
//! pointer move through `decode_pointer`, so both sit on the hot path.
//!
//! Run with:
//! ```bash
//! cargo bench --package touchbridge-core --bench codec_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use touchbridge_core::protocol::codec::{decode_key_message, decode_pointer, encode_key_message};
use touchbridge_core::protocol::messages::{KeyEventMessage, KeyboardMode, PointerKind};
use touchbridge_core::{AndroidKeyCode, ControlKey};

// ── Message fixtures ──────────────────────────────────────────────────────────

fn make_legacy_char() -> KeyEventMessage {
    let mut msg = KeyEventMessage::new(KeyboardMode::Legacy);
    msg.down = true;
    msg.chr = Some('a' as u32);
    msg
}

fn make_translate_keycode() -> KeyEventMessage {
    let mut msg = KeyEventMessage::new(KeyboardMode::Translate);
    msg.press = true;
    msg.keycode = Some(AndroidKeyCode::ENTER);
    msg
}

fn make_control_key() -> KeyEventMessage {
    let mut msg = KeyEventMessage::new(KeyboardMode::Translate);
    msg.down = true;
    msg.control_key = Some(ControlKey::LeftArrow);
    msg
}

fn make_sequence() -> KeyEventMessage {
    let mut msg = KeyEventMessage::new(KeyboardMode::Sequence);
    msg.press = true;
    msg.seq = Some("The quick brown fox jumps over the lazy dog".to_string());
    msg
}

fn fixtures() -> Vec<(&'static str, KeyEventMessage)> {
    vec![
        ("LegacyChar", make_legacy_char()),
        ("TranslateKeycode", make_translate_keycode()),
        ("ControlKey", make_control_key()),
        ("Sequence", make_sequence()),
    ]
}

// ── Benchmark groups ──────────────────────────────────────────────────────────

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_key_message");
    for (name, msg) in fixtures() {
        group.bench_with_input(BenchmarkId::new("msg", name), &msg, |b, msg| {
            b.iter(|| encode_key_message(black_box(msg)))
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_key_message");
    for (name, msg) in fixtures() {
        let bytes = encode_key_message(&msg);
        group.bench_with_input(BenchmarkId::new("msg", name), &bytes, |b, bytes| {
            b.iter(|| decode_key_message(black_box(bytes)).expect("decode must succeed"))
        });
    }
    group.finish();
}

fn bench_decode_pointer(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_pointer");

    // Move: highest frequency during cursor motion
    group.bench_function("Move", |b| {
        b.iter(|| decode_pointer(black_box(PointerKind::Mouse), black_box(0), 960, 540, None))
    });

    group.bench_function("PanUpdate", |b| {
        b.iter(|| decode_pointer(black_box(PointerKind::Touch), black_box(5), -3, 4, None))
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_decode_pointer);
criterion_main!(benches);
