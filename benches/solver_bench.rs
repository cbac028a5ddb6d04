//! Benchmarks for the dependency solver

use criterion::{Criterion, criterion_group, criterion_main};
use dependency_solver::{
    BindRule, DependencySolver, Desire, InjectionPoint, RuleBindingFunction, Satisfaction,
    ServiceType,
};
use std::hint::black_box;

struct App;
struct Service;
struct Repository;
struct Connection;
struct Config;

fn ty<T: 'static>() -> ServiceType {
    ServiceType::of::<T>()
}

fn dep<T: 'static>(index: usize) -> Desire {
    Desire::from_injection_point(InjectionPoint::constructor_parameter(index, ty::<T>()))
}

/// A small diamond: App -> {Service, Repository} -> Connection -> Config
fn diamond_rules() -> Vec<BindRule> {
    vec![
        BindRule::to_satisfaction(
            ty::<App>(),
            Satisfaction::class(ty::<App>(), vec![dep::<Service>(0), dep::<Repository>(1)]),
        ),
        BindRule::to_satisfaction(
            ty::<Service>(),
            Satisfaction::class(ty::<Service>(), vec![dep::<Connection>(0)]),
        ),
        BindRule::to_satisfaction(
            ty::<Repository>(),
            Satisfaction::class(ty::<Repository>(), vec![dep::<Connection>(0)]),
        ),
        BindRule::to_satisfaction(
            ty::<Connection>(),
            Satisfaction::class(ty::<Connection>(), vec![dep::<Config>(0)]),
        ),
        BindRule::to_satisfaction(
            ty::<Config>(),
            Satisfaction::class(ty::<Config>(), vec![]),
        ),
    ]
}

fn solver() -> DependencySolver {
    DependencySolver::new(
        vec![Box::new(RuleBindingFunction::new(diamond_rules()))],
        64,
    )
}

fn bench_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolution");

    group.bench_function("leaf", |b| {
        let desire = Desire::for_type::<Config>();
        b.iter(|| {
            let mut solver = solver();
            solver.resolve(black_box(&desire)).unwrap();
            black_box(solver.graph().node_count())
        })
    });

    group.bench_function("diamond", |b| {
        let desire = Desire::for_type::<App>();
        b.iter(|| {
            let mut solver = solver();
            solver.resolve(black_box(&desire)).unwrap();
            black_box(solver.graph().node_count())
        })
    });

    group.finish();
}

fn bench_re_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("re_resolution");

    // resolving into an already-populated graph exercises the merge
    // lookup path rather than node creation
    group.bench_function("diamond_warm", |b| {
        let desire = Desire::for_type::<App>();
        let mut solver = solver();
        solver.resolve(&desire).unwrap();
        b.iter(|| {
            solver.resolve(black_box(&desire)).unwrap();
            black_box(solver.graph().node_count())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_resolution, bench_re_resolution);
criterion_main!(benches);
