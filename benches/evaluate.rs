use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sigmatch::{CompiledRule, Detection, Record};

/// Detection with `n` single-field glob selections combined by `1 of them`,
/// plus a record that only satisfies the last one.
fn build_rule(n: usize) -> (CompiledRule, Record) {
    let mut detection = Detection::new("1 of them");
    let mut record = Record::new();
    for i in 0..n {
        detection = detection.selection(
            format!("selection{i}"),
            sigmatch::RawSelection::map([(
                format!("Image{i}"),
                sigmatch::RawValue::one(format!(r"*\tool{i}.exe")),
            )]),
        );
        record.insert(format!("Image{i}"), r"C:\Windows\System32\other.exe");
    }
    record.insert(
        format!("Image{}", n - 1),
        format!(r"C:\Windows\System32\tool{}.exe", n - 1),
    );
    (detection_to_rule(detection), record)
}

fn detection_to_rule(detection: Detection) -> CompiledRule {
    CompiledRule::compile(&detection).unwrap()
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_eval");

    for &n in &[5, 20, 50] {
        let (rule, record) = build_rule(n);
        group.bench_function(&format!("{n}_selections_worst_case"), |b| {
            b.iter(|| rule.matches(black_box(&record)));
        });
    }

    group.finish();
}

fn bench_modifiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("modifier_eval");

    let glob = detection_to_rule(Detection::new("selection").selection(
        "selection",
        sigmatch::RawSelection::map([(
            "CommandLine",
            sigmatch::RawValue::one("*-enc *"),
        )]),
    ));
    let contains = detection_to_rule(Detection::new("selection").selection(
        "selection",
        sigmatch::RawSelection::map([(
            "CommandLine|contains",
            sigmatch::RawValue::one("-enc "),
        )]),
    ));
    let regex = detection_to_rule(Detection::new("selection").selection(
        "selection",
        sigmatch::RawSelection::map([(
            "CommandLine|re",
            sigmatch::RawValue::one("-enc\\s+[A-Za-z0-9+/=]+"),
        )]),
    ));

    let record = Record::new().set(
        "CommandLine",
        "powershell.exe -nop -w hidden -enc SQBFAFgAIAAoAE4AZQB3AC0ATwBiAGoA",
    );

    group.bench_function("glob", |b| {
        b.iter(|| glob.matches(black_box(&record)));
    });
    group.bench_function("contains", |b| {
        b.iter(|| contains.matches(black_box(&record)));
    });
    group.bench_function("regex", |b| {
        b.iter(|| regex.matches(black_box(&record)));
    });

    group.finish();
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    for &n in &[5, 20, 50] {
        group.bench_function(&format!("{n}_selections"), |b| {
            b.iter(|| {
                let mut detection = Detection::new("1 of them");
                for i in 0..n {
                    detection = detection.selection(
                        format!("selection{i}"),
                        sigmatch::RawSelection::map([(
                            format!("Image{i}"),
                            sigmatch::RawValue::one(format!(r"*\tool{i}.exe")),
                        )]),
                    );
                }
                CompiledRule::compile(black_box(&detection)).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_modifiers, bench_compile);
criterion_main!(benches);
