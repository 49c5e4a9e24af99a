
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use emg_symmetry::config::AnalysisConfig;
use emg_symmetry::processing::envelope::rms_envelope;
use emg_symmetry::processing::filters::{BandpassFilter, BandpassSpec};
use emg_symmetry::processing::SymmetryPipeline;
use emg_symmetry::simulation::{MuscleProfile, RecordingConfig, RecordingGenerator};
use emg_symmetry::SampleTable;

const SIGNAL_LENGTHS: &[usize] = &[1_000, 5_000, 20_000];
const FILTER_ORDERS: &[usize] = &[2, 4, 8];
const WINDOWS_MS: &[f64] = &[50.0, 200.0, 1000.0];

fn test_signal(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let t = i as f64 / 1000.0;
            (2.0 * std::f64::consts::PI * 80.0 * t).sin() + 0.3 * (2.0 * std::f64::consts::PI * 150.0 * t).sin()
        })
        .collect()
}

fn panel_recording() -> SampleTable {
    let config = AnalysisConfig::lower_limb_panel();
    let muscles = config
        .muscles
        .names
        .iter()
        .map(|name| MuscleProfile::new(name, 1.0, 1.6))
        .collect();
    RecordingGenerator::new(RecordingConfig::default().with_muscles(muscles))
        .and_then(|generator| generator.generate())
        .expect("simulated recording")
}

fn benchmark_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("bandpass_filtfilt");

    for &len in SIGNAL_LENGTHS {
        let signal = test_signal(len);
        group.throughput(Throughput::Elements(len as u64));

        for &order in FILTER_ORDERS {
            let spec = BandpassSpec {
                low_hz: 20.0,
                high_hz: 450.0,
                sampling_hz: 1000.0,
                order,
            };
            let filter = BandpassFilter::design(&spec).expect("valid spec");

            group.bench_with_input(
                BenchmarkId::new(format!("order_{}", order), len),
                &signal,
                |b, signal| b.iter(|| filter.apply(black_box(signal))),
            );
        }
    }

    group.bench_function("design_order_4", |b| {
        let spec = BandpassSpec {
            low_hz: 20.0,
            high_hz: 450.0,
            sampling_hz: 1000.0,
            order: 4,
        };
        b.iter(|| BandpassFilter::design(black_box(&spec)))
    });

    group.finish();
}

fn benchmark_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("rms_envelope");

    for &len in SIGNAL_LENGTHS {
        let signal: Vec<f64> = test_signal(len).iter().map(|x| x.abs()).collect();
        group.throughput(Throughput::Elements(len as u64));

        for &window_ms in WINDOWS_MS {
            group.bench_with_input(
                BenchmarkId::new(format!("{}ms", window_ms), len),
                &signal,
                |b, signal| b.iter(|| rms_envelope(black_box(signal), window_ms, 1000.0)),
            );
        }
    }

    group.finish();
}

fn benchmark_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("symmetry_pipeline");
    let table = panel_recording();
    group.throughput(Throughput::Elements((table.len() * table.columns().len()) as u64));

    for parallel in [false, true] {
        let mut config = AnalysisConfig::lower_limb_panel();
        config.execution.parallel_channels = parallel;
        let pipeline = SymmetryPipeline::new(&config).expect("valid config");

        let label = if parallel { "parallel" } else { "sequential" };
        group.bench_function(label, |b| b.iter(|| pipeline.run(black_box(&table))));
    }

    group.finish();
}

criterion_group!(benches, benchmark_filter, benchmark_envelope, benchmark_pipeline);
criterion_main!(benches);
