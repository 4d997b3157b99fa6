// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rhizome::format::{export_document, parse_document};

mod fixtures;

// Benchmark identity (keep stable):
// - Group name in this file: `format.document`
fn benches_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("format.document");

    let map = fixtures::balanced_map(4, 4);
    let document = export_document(&map).expect("export");

    let export_map = map.clone();
    group.bench_function("export_balanced_4x4", move |b| {
        b.iter(|| black_box(export_document(black_box(&export_map)).expect("export")))
    });

    group.bench_function("parse_balanced_4x4", move |b| {
        b.iter(|| black_box(parse_document(black_box(&document)).expect("parse")))
    });

    group.finish();
}

criterion_group!(benches, benches_codec);
criterion_main!(benches);
