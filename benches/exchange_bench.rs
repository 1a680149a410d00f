//! Benchmarks for the per-step exchange passes.
//!
//! Run with: `cargo bench --bench exchange_bench`
//!
//! Measures export and import throughput across column counts with a
//! realistic descriptor mix (scalars, a vector component, an inverted-sign
//! flux). Build with and without `--features parallel` to compare the
//! serial and rayon passes.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use surface_coupling::{
    ColumnGrid, ComponentIndex, CouplingConfig, Field, FieldCatalog, FieldIntent, FieldLayout,
    SlotIndex, SurfaceExporter, SurfaceImporter, Unit,
};

const N_LEVS: usize = 72;
const PACK: usize = 16;
const N_SLOTS: usize = 6;

/// Generate deterministic pseudo-random data for benchmarks.
fn random_vec(n: usize, seed: u64) -> Vec<f64> {
    let mut v = Vec::with_capacity(n);
    let mut x = seed;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        let val = (x as f64) / (u64::MAX as f64) * 2.0 - 1.0;
        v.push(val);
    }
    v
}

fn build_catalog(n_cols: usize) -> FieldCatalog {
    let mut catalog = FieldCatalog::new();

    for (i, name) in ["T_2m", "qv_2m", "wind_speed_10m", "surf_sens_flux"]
        .into_iter()
        .enumerate()
    {
        let mut f = Field::new(
            name,
            FieldLayout::surface_scalar("physics", n_cols, Unit::NONDIM),
            FieldIntent::Updated,
            1,
        );
        f.allocate();
        f.data_mut()
            .unwrap()
            .copy_from_slice(&random_vec(n_cols, i as u64 + 1));
        catalog.insert(f).unwrap();
    }

    let mut winds = Field::new(
        "horiz_winds",
        FieldLayout::midpoint_vector("physics", n_cols, 2, N_LEVS, Unit::M_PER_S),
        FieldIntent::Updated,
        PACK,
    );
    winds.allocate();
    let len = winds.data().unwrap().len();
    winds
        .data_mut()
        .unwrap()
        .copy_from_slice(&random_vec(len, 99));
    catalog.insert(winds).unwrap();

    catalog
}

/// Register the same six-slot mix on either engine via its register closure.
fn slot_mix() -> [(&'static str, i32, f64); N_SLOTS] {
    [
        ("T_2m", -1, 1.0),
        ("qv_2m", -1, 1.0),
        ("wind_speed_10m", -1, 1.0),
        ("surf_sens_flux", -1, 1.0),
        ("horiz_winds", 0, 1.0),
        ("horiz_winds", 1, 1.0),
    ]
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export_pass");

    for n_cols in [1_000, 8_000, 32_000] {
        let catalog = build_catalog(n_cols);
        let grid = ColumnGrid::new("physics", n_cols, N_LEVS);
        let mut exporter =
            SurfaceExporter::new(grid, CouplingConfig::default().with_pack_width(PACK));
        exporter.open(n_cols, N_SLOTS).unwrap();
        for (i, (name, comp, mult)) in slot_mix().into_iter().enumerate() {
            exporter
                .register(
                    &catalog,
                    name,
                    SlotIndex::new(i),
                    ComponentIndex::from_signed(comp),
                    mult,
                )
                .unwrap();
        }
        exporter.close().unwrap();

        let mut coupler = vec![0.0; n_cols * N_SLOTS];
        group.throughput(Throughput::Elements((n_cols * N_SLOTS) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n_cols), &n_cols, |b, _| {
            b.iter(|| {
                exporter
                    .run(black_box(&catalog), black_box(&mut coupler))
                    .unwrap();
            });
        });
    }

    group.finish();
}

fn bench_import(c: &mut Criterion) {
    let mut group = c.benchmark_group("import_pass");

    for n_cols in [1_000, 8_000, 32_000] {
        let mut catalog = build_catalog(n_cols);
        let grid = ColumnGrid::new("physics", n_cols, N_LEVS);
        let mut importer =
            SurfaceImporter::new(grid, CouplingConfig::default().with_pack_width(PACK));
        importer.open(n_cols, N_SLOTS).unwrap();
        for (i, (name, comp, mult)) in slot_mix().into_iter().enumerate() {
            importer
                .register(
                    &catalog,
                    name,
                    SlotIndex::new(i),
                    ComponentIndex::from_signed(comp),
                    mult,
                )
                .unwrap();
        }
        importer.close().unwrap();

        let coupler = random_vec(n_cols * N_SLOTS, 7);
        group.throughput(Throughput::Elements((n_cols * N_SLOTS) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n_cols), &n_cols, |b, _| {
            b.iter(|| {
                importer
                    .run(black_box(&mut catalog), black_box(&coupler))
                    .unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_export, bench_import);
criterion_main!(benches);
