//! ISBN and OCR text-mining benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use shelfshare_core::isbn::{extract_isbns_from_text, is_valid, normalize_to_isbn13};
use shelfshare_core::ocr::{extract_from_text, ScanMode};

fn generate_shelf_text(count: usize) -> String {
    let mut text = String::new();
    for i in 0..count {
        text.push_str(&format!(
            "Plausible Book Title Number {}\nAuthor Name {}\nISBN: 978-0-13-235088-4\n",
            i,
            i % 10
        ));
    }
    text
}

// === Validation ===

fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("isbn_validate");
    group.bench_function("isbn10", |b| b.iter(|| is_valid(black_box("0-306-40615-2"))));
    group.bench_function("isbn13", |b| {
        b.iter(|| is_valid(black_box("978-0-13-235088-4")))
    });
    group.bench_function("invalid", |b| {
        b.iter(|| is_valid(black_box("978-0-13-235088-5")))
    });
    group.finish();
}

fn bench_normalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("isbn_normalize");
    group.bench_function("isbn10_to_13", |b| {
        b.iter(|| normalize_to_isbn13(black_box("0743273567")))
    });
    group.bench_function("already_13", |b| {
        b.iter(|| normalize_to_isbn13(black_box("9780743273565")))
    });
    group.finish();
}

// === Text extraction ===

fn bench_extract_from_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("isbn_extract");

    for count in [10, 100, 1000] {
        let text = generate_shelf_text(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &text, |b, text| {
            b.iter(|| extract_isbns_from_text(black_box(text)).count())
        });
    }
    group.finish();
}

fn bench_ocr_extraction(c: &mut Criterion) {
    let cover = "The Great Gatsby\nF. Scott Fitzgerald\nISBN: 978-0-7432-7356-5\n$12.99";
    let shelf = generate_shelf_text(50);

    let mut group = c.benchmark_group("ocr_extract");
    group.bench_function("single_cover", |b| {
        b.iter(|| extract_from_text(black_box(cover), &[], ScanMode::SingleBook))
    });
    group.bench_function("bookshelf_50", |b| {
        b.iter(|| extract_from_text(black_box(&shelf), &[], ScanMode::Bookshelf))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_validation,
    bench_normalization,
    bench_extract_from_text,
    bench_ocr_extraction,
);
criterion_main!(benches);
