#[macro_use]
extern crate criterion;

mod skipset;

criterion_group!(benches, crate::skipset::benchmark);
criterion_main!(benches);
