use criterion::{black_box, criterion_group, criterion_main, Criterion};

use std::fmt::Write;
use std::io::Cursor;

use rundb::{load_value, LineReader, Stamp};

/// A synthetic database: one stamped block per year, each carrying a
/// spread of keys with array values.
fn synthetic_db(keys_per_block: usize) -> String {
    let mut db = String::new();
    for year in 2000..2020 {
        writeln!(db, "[ {year}-01-01 00:00:00 ]").unwrap();
        for k in 0..keys_per_block {
            writeln!(db, "det.plane{k:03}.nw = {}", 300 + k).unwrap();
            writeln!(db, "det.plane{k:03}.offsets = 1 2 3 4 5 6 7 8").unwrap();
        }
    }
    db
}

fn bench_load_value(c: &mut Criterion) {
    let db = synthetic_db(25);
    let date = Stamp::from_ymd_hms(2015, 6, 1, 0, 0, 0).unwrap();
    c.bench_function("load_value/scan", |b| {
        b.iter(|| {
            let mut file = Cursor::new(db.as_bytes());
            load_value(&mut file, date, black_box("det.plane012.nw")).unwrap()
        })
    });
}

fn bench_line_reader(c: &mut Criterion) {
    let db = synthetic_db(25);
    c.bench_function("line_reader/scan", |b| {
        b.iter(|| {
            let mut file = Cursor::new(db.as_bytes());
            let mut reader = LineReader::new(&mut file);
            let mut count = 0usize;
            while let Some(line) = reader.read().unwrap() {
                count += black_box(line.len());
            }
            count
        })
    });
}

criterion_group!(benches, bench_load_value, bench_line_reader);
criterion_main!(benches);
