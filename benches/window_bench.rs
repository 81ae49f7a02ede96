//! Benchmarks for window operations
//!
//! Measures the engine end to end: admitting windows, relayout and the
//! keyboard commands that reshuffle a workspace.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use slate_core::config::Config;
use slate_core::input::FocusTarget;
use slate_core::state::{ScreenId, Topology};
use slate_core::window::WindowInfo;
use slate_core::workspace::SwapTarget;
use slate_core::{Command, Core, Geometry, WindowId};

fn populated_core(windows: u64) -> Core {
    let topology = Topology::single(Geometry::new(0, 0, 1920, 1080), 16);
    let Ok(mut core) = Core::new(Config::default(), &topology) else {
        panic!("single-region topology is valid");
    };
    for id in 1..=windows {
        let info = WindowInfo {
            id: WindowId(id),
            geometry: Geometry::new(0, 0, 640, 480),
            ..Default::default()
        };
        core.admit(&info, ScreenId(0));
    }
    core.relayout();
    core
}

fn window_creation_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("window_creation");

    for count in [1u64, 10, 50] {
        group.bench_with_input(BenchmarkId::new("admit_and_relayout", count), &count, |b, &n| {
            b.iter(|| black_box(populated_core(n)))
        });
    }

    group.finish();
}

fn window_state_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("window_state");

    group.bench_function("focus_next_relayout", |b| {
        let mut core = populated_core(20);
        b.iter(|| {
            core.exec_focused(Command::Focus(FocusTarget::Next));
            black_box(core.relayout())
        });
    });

    group.bench_function("swap_next_relayout", |b| {
        let mut core = populated_core(20);
        b.iter(|| {
            core.exec_focused(Command::Swap(SwapTarget::Next));
            black_box(core.relayout())
        });
    });

    group.bench_function("switch_workspace_round_trip", |b| {
        let mut core = populated_core(20);
        b.iter(|| {
            core.exec_focused(Command::Workspace(1));
            core.relayout();
            core.exec_focused(Command::Workspace(0));
            black_box(core.relayout())
        });
    });

    group.finish();
}

criterion_group!(benches, window_creation_benchmark, window_state_benchmark);
criterion_main!(benches);
