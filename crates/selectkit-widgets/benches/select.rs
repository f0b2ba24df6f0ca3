//! Benchmarks for select view building and patching.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use selectkit_core::{Component, Dom, NodeId};
use selectkit_widgets::{wrap_index, OptionList, Select, SelectConfig, SelectOption, SelectState};

fn config(count: usize) -> SelectConfig {
    SelectConfig::new(
        (0..count)
            .map(|i| SelectOption::new(format!("value_{i}"), format!("Label {i}")))
            .collect::<Vec<_>>(),
    )
}

fn bench_view_build(c: &mut Criterion) {
    let select = Select::new(config(100));

    c.bench_function("select_view_100_options", |b| {
        b.iter(|| black_box(select.view()))
    });
}

fn bench_patch(c: &mut Criterion) {
    let select = Select::new(config(100));
    let mut dom = Dom::new();
    let root = dom.mount(NodeId::DOCUMENT, &select.view()).unwrap_or(NodeId::DOCUMENT);
    let view = select.view();

    c.bench_function("select_patch_100_options", |b| {
        b.iter(|| dom.patch(black_box(root), black_box(&view)))
    });
}

fn bench_open_lookup(c: &mut Criterion) {
    let options: OptionList = (0..1000)
        .map(|i| SelectOption::simple(format!("v{i}")))
        .collect();

    c.bench_function("select_open_on_last_of_1000", |b| {
        b.iter(|| {
            let mut state = SelectState::new(Some("v999".to_string()));
            black_box(state.open(&options))
        })
    });
}

fn bench_wrap_index(c: &mut Criterion) {
    c.bench_function("wrap_index", |b| {
        b.iter(|| wrap_index(black_box(0), black_box(-1), black_box(6)))
    });
}

criterion_group!(
    benches,
    bench_view_build,
    bench_patch,
    bench_open_lookup,
    bench_wrap_index,
);
criterion_main!(benches);
