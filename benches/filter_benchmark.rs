use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use parking_spot_engine::filter::PRICE_RANGE_PRESETS;
use parking_spot_engine::{
    FilterCriteria, ParkingSpot, PricingCalculator, SpotFilterEngine, SpotStatus, StatusFilter,
};
use rand::{thread_rng, Rng};

fn random_spots(count: usize) -> Vec<ParkingSpot> {
    let mut rng = thread_rng();
    (0..count)
        .map(|i| {
            let status = match rng.gen_range(0..3) {
                0 => SpotStatus::Available,
                1 => SpotStatus::Reserved,
                _ => SpotStatus::Occupied,
            };
            // Occupied spots carry no quoted rate
            let price = match status {
                SpotStatus::Occupied => None,
                _ => Some(rng.gen_range(20..300) as f64),
            };
            ParkingSpot::new(format!("spot{}", i), status, price, rng.gen_range(0.0..12.0))
        })
        .collect()
}

pub fn filter_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("spot_filter");
    let engine = SpotFilterEngine::default();
    let criteria = FilterCriteria {
        status: StatusFilter::Available,
        price_range: PRICE_RANGE_PRESETS[3].range,
        max_distance: 5.0,
    };

    for count in [100, 1_000, 10_000].iter() {
        let spots = random_spots(*count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &spots, |b, spots| {
            b.iter(|| black_box(engine.filter_spots(black_box(spots), &criteria)))
        });
    }

    group.finish();
}

pub fn pricing_benchmark(c: &mut Criterion) {
    let calculator = PricingCalculator::default();
    c.bench_function("compute_price_all_hours", |b| {
        b.iter(|| {
            for hour in 0..24 {
                for duration in 1..=8 {
                    let _ = black_box(calculator.compute_price(black_box(80.0), duration, hour));
                }
            }
        })
    });
}

criterion_group!(benches, filter_benchmark, pricing_benchmark);
criterion_main!(benches);
