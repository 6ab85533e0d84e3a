use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use rolesync_auth::{Password, Role, UserRecord, Username};
use rolesync_import::build_index;

fn batch(users: usize, roles_per_user: usize) -> Vec<UserRecord> {
    (0..users)
        .map(|i| {
            let record = UserRecord::new(
                Username::parse(format!("user-{i}")).expect("valid username"),
                Password::new("password"),
            );
            record.with_roles((0..roles_per_user).map(|r| Role::new(format!("role-{}", (i + r) % 50))))
        })
        .collect()
}

fn bench_build_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_index");
    for users in [100, 1_000, 10_000] {
        let records = batch(users, 5);
        group.bench_with_input(BenchmarkId::from_parameter(users), &records, |b, records| {
            b.iter(|| build_index(black_box(records)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build_index);
criterion_main!(benches);
