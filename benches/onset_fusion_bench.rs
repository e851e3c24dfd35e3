//! Performance benchmarks for note analysis

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use onset_fusion::features::envelope::build_envelope;
use onset_fusion::track::{FrameTrack, Signal};
use onset_fusion::{analyze_notes, AnalysisConfig, PrecomputedFeatures};

const SAMPLE_RATE: u32 = 44100;

/// Half-second notes alternating A4 and C5 with a short gap between them
fn synthetic_recording(seconds: usize) -> (Vec<f32>, PrecomputedFeatures) {
    let note_hz = |t: f32| if (t * 2.0) as usize % 2 == 0 { 440.0 } else { 523.25 };
    let samples: Vec<f32> = (0..SAMPLE_RATE as usize * seconds)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            if t.fract() % 0.5 > 0.45 {
                0.0
            } else {
                (t * note_hz(t) * 2.0 * std::f32::consts::PI).sin() * 0.5
            }
        })
        .collect();

    let hop = 512;
    let frames = 1 + samples.len() / hop;
    let pitch: Vec<Option<f32>> = (0..frames)
        .map(|i| Some(note_hz((i * hop) as f32 / SAMPLE_RATE as f32)))
        .collect();
    let spectral: Vec<f32> = (0..seconds * 2).map(|n| n as f32 * 0.5).collect();

    let pitch = FrameTrack::new(pitch, hop, SAMPLE_RATE).unwrap();
    (samples, PrecomputedFeatures::new(spectral, pitch))
}

fn bench_analyze_notes(c: &mut Criterion) {
    let (samples, features) = synthetic_recording(30);
    let signal = Signal::new(&samples, SAMPLE_RATE).unwrap();
    let config = AnalysisConfig::default();

    c.bench_function("analyze_notes_30s", |b| {
        b.iter(|| {
            let _ = analyze_notes(black_box(&signal), black_box(&features), black_box(&config));
        });
    });

    c.bench_function("build_envelope_30s", |b| {
        b.iter(|| {
            let _ = build_envelope(black_box(&signal), black_box(&config.envelope));
        });
    });
}

criterion_group!(benches, bench_analyze_notes);
criterion_main!(benches);
