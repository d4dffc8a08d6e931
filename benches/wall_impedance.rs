use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use tlwall::calculator::ImpedanceCalculator;
use tlwall::materials::{MaterialModel, MaterialProperties};
use tlwall::mode::{Mode, Plane};
use tlwall::sweep::FrequencyGrid;
use tlwall::wake::WakeTransform;
use tlwall::wall::{Layer, Wall};
use tlwall::yokoya::ChamberShape;

fn coated_pipe() -> Wall {
    Wall::new(
        0.02,
        1.0,
        vec![
            Layer::new(1.0e-6, MaterialProperties::conductor(5.96e7)),
            Layer::new(2.0e-3, MaterialProperties::new(0.0, 9.8, 1e-4, 1.0).unwrap()),
            Layer::new(1.5e-3, MaterialProperties::conductor(1.35e6)),
            Layer::semi_infinite(MaterialModel::PerfectConductor),
        ],
    )
    .unwrap()
}

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("impedance_sweep");
    let grid = FrequencyGrid::logspace_hz(1.0e3, 1.0e11, 10_000).unwrap();

    for mode in [Mode::LONGITUDINAL, Mode::DIPOLE] {
        group.bench_function(BenchmarkId::new(mode.to_string(), grid.len()), |b| {
            b.iter_batched(
                coated_pipe,
                |wall| {
                    let calc = ImpedanceCalculator::new(&wall, ChamberShape::Elliptical { aspect_ratio: 2.0 });
                    let _ = calc.sweep(&grid, &[mode]);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_wake(c: &mut Criterion) {
    let wall = coated_pipe();
    let calc = ImpedanceCalculator::new(&wall, ChamberShape::Circular);
    let grid = FrequencyGrid::logspace_hz(1.0e3, 1.0e11, 2_000).unwrap();
    let spectrum = calc
        .two_sided_spectrum(&grid, Mode::LONGITUDINAL, Plane::Longitudinal)
        .unwrap();
    let times: Vec<f64> = (0..1_000).map(|i| i as f64 * 1.0e-12).collect();
    let transform = WakeTransform::default();

    c.bench_function("wake_filon_2000x1000", |b| {
        b.iter(|| transform.impedance_to_wake(&spectrum, &times))
    });
}

criterion_group!(benches, bench_sweep, bench_wake);
criterion_main!(benches);
