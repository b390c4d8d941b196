use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

fn build_file(dependencies: usize) -> String {
    let mut source = String::from(
        "plugins {\n    java\n    scala\n}\n\nrepositories {\n    jcenter()\n    mavenCentral()\n}\n\ndependencies {\n",
    );
    for i in 0..dependencies {
        source.push_str(&format!(
            "    testRuntimeOnly(\"org.example:artifact-{i}:1.{i}.0\")\n"
        ));
    }
    source.push_str(
        "}\n\ntasks {\n    test {\n        useJUnitPlatform {\n            includeEngines(\"scalatest\")\n            testLogging {\n                events(\"passed\", \"skipped\", \"failed\")\n            }\n        }\n    }\n}\n",
    );
    source
}

fn bench_load(c: &mut Criterion) {
    let sources: Vec<String> = [5, 50, 500, 5_000].into_iter().map(build_file).collect();
    let mut group = c.benchmark_group("load");

    for source in sources {
        group.throughput(Throughput::Bytes(source.len() as u64));

        group.bench_with_input(BenchmarkId::new("parse", source.len()), &source, |b, s| {
            b.iter(|| {
                let _ = std::hint::black_box(bf_syntax::parse(s));
            })
        });

        group.bench_with_input(BenchmarkId::new("load", source.len()), &source, |b, s| {
            b.iter(|| {
                let _ = std::hint::black_box(bf_loader::load(s));
            })
        });

        let config = bf_loader::load(&source).unwrap();
        group.bench_with_input(
            BenchmarkId::new("to_source", source.len()),
            &config,
            |b, config| {
                b.iter(|| {
                    let _ = std::hint::black_box(bf_loader::to_source(config));
                })
            },
        );
    }
}

criterion_group!(benches, bench_load);
criterion_main!(benches);
