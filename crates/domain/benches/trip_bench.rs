use chrono::{Duration, Utc};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{CreateTrip, EmailAddress, RegisterForTrip, TripDetails, TripService};
use trip_store::InMemoryTripStore;

fn details(name: String) -> TripDetails {
    TripDetails::new(name, "Egypt", "Nile cruise", Utc::now() + Duration::days(14))
}

fn bench_create_trip(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("domain/create_trip", |b| {
        b.iter(|| {
            rt.block_on(async {
                let service = TripService::new(InMemoryTripStore::new());
                service
                    .create_trip(CreateTrip::new(details("Nile".to_string()), 10))
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_register_for_trip(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("domain/create_and_fill_20_seats", |b| {
        b.iter(|| {
            rt.block_on(async {
                let service = TripService::new(InMemoryTripStore::new());
                let trip = service
                    .create_trip(CreateTrip::new(details("Nile".to_string()), 20))
                    .await
                    .unwrap();
                let trip_id = trip.id().unwrap();

                for i in 0..20 {
                    let email = EmailAddress::parse(format!("user{i}@example.com")).unwrap();
                    service
                        .register_for_trip(trip_id, RegisterForTrip::new(email))
                        .await
                        .unwrap();
                }
            });
        });
    });
}

fn bench_list_trips(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let service = TripService::new(InMemoryTripStore::new());

    // Pre-populate: 100 trips across two countries
    rt.block_on(async {
        for i in 0..100 {
            let mut d = details(format!("Trip {i}"));
            if i % 2 == 0 {
                d.country = "Poland".to_string();
            }
            service.create_trip(CreateTrip::new(d, 10)).await.unwrap();
        }
    });

    c.bench_function("domain/list_100_trips_by_country", |b| {
        b.iter(|| {
            rt.block_on(async {
                service.list_trips(Some("Egypt")).await.unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_create_trip,
    bench_register_for_trip,
    bench_list_trips,
);
criterion_main!(benches);
