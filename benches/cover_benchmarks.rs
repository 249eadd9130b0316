use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use geo::{Geometry, polygon};
use geocover::convert::{codes_to_feature_collection, codes_to_multi_polygon};
use geocover::{CoverageMode, cover_shape};

fn city_district() -> Geometry<f64> {
    Geometry::Polygon(polygon![
        (x: -0.05, y: 51.49),
        (x: 0.02, y: 51.50),
        (x: 0.01, y: 51.53),
        (x: -0.06, y: 51.52),
        (x: -0.05, y: 51.49),
    ])
}

fn benchmark_covering(c: &mut Criterion) {
    let mut group = c.benchmark_group("covering");
    let shape = city_district();

    for precision in [5usize, 6, 7] {
        group.bench_with_input(
            BenchmarkId::new("intersect", precision),
            &precision,
            |b, &precision| {
                b.iter(|| {
                    cover_shape(
                        black_box(&shape),
                        precision,
                        CoverageMode::Intersect,
                        None,
                    )
                    .unwrap()
                })
            },
        );
    }

    group.bench_function("inside_p6", |b| {
        b.iter(|| cover_shape(black_box(&shape), 6, CoverageMode::Inside, None).unwrap())
    });

    group.bench_function("center_p6", |b| {
        b.iter(|| cover_shape(black_box(&shape), 6, CoverageMode::Center, None).unwrap())
    });

    group.bench_function("intersect_p6_threshold", |b| {
        b.iter(|| {
            cover_shape(black_box(&shape), 6, CoverageMode::Intersect, Some(0.5)).unwrap()
        })
    });

    group.finish();
}

fn benchmark_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("conversion");

    let mut codes: Vec<String> = cover_shape(&city_district(), 6, CoverageMode::Intersect, None)
        .unwrap()
        .into_iter()
        .collect();
    codes.sort();

    group.bench_function("codes_to_feature_collection", |b| {
        b.iter(|| codes_to_feature_collection(black_box(&codes)).unwrap())
    });

    group.bench_function("codes_to_multi_polygon", |b| {
        b.iter(|| codes_to_multi_polygon(black_box(&codes), false).unwrap())
    });

    group.bench_function("codes_to_multi_polygon_union", |b| {
        b.iter(|| codes_to_multi_polygon(black_box(&codes), true).unwrap())
    });

    group.finish();
}

criterion_group!(benches, benchmark_covering, benchmark_conversion);
criterion_main!(benches);
