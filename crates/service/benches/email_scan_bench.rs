use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use models::user::NewUser;
use service::{InMemoryUserRepository, UserRepository, UserService};

fn bench_email_scan(c: &mut Criterion) {
    let repo = Arc::new(InMemoryUserRepository::new());
    let svc = UserService::new(repo.clone());

    // pre-fill the store outside of the benchmark using a tokio runtime
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        for i in 0..1_000 {
            repo.create(NewUser::new(format!("user{i}"), format!("user{i}@example.com"))).await.unwrap();
        }
    });

    c.bench_function("find_by_email_last", |b| {
        b.iter(|| {
            let _ = rt.block_on(repo.find_by_email("user999@example.com")).unwrap();
        });
    });

    c.bench_function("register_duplicate_rejected", |b| {
        b.iter(|| {
            let _ = rt.block_on(svc.register_user("Dup", "user999@example.com")).unwrap_err();
        });
    });
}

criterion_group!(benches, bench_email_scan);
criterion_main!(benches);
