use criterion::{Criterion, criterion_group, criterion_main};
use mbget::dependency::Dependency;
use mbget::jungle;
use mbget::manifest::Manifest;
use mbget::packages::PackageMap;
use mbget::version::VersionSpec;
use std::hint::black_box;

const MOCK_MANIFEST: &str = r#"<?xml version="1.0"?>
<iq:manifest xmlns:iq="http://www.garmin.com/xml/connectiq" version="3">
    <iq:application entry="BenchApp" id="0000" type="watch-app">
        <iq:products>
            <iq:product id="fenix6"/>
            <iq:product id="fr945"/>
        </iq:products>
        <iq:barrels>
            <iq:depends name="MonkeyInject" version="0.3.1"/>
            <iq:depends name="MonkeyTest" version="1.0"/>
            <iq:depends name="MonkeyLog" version="2"/>
        </iq:barrels>
    </iq:application>
</iq:manifest>
"#;

const MOCK_PACKAGES: &str = "MonkeyInject=>gcaufield/MonkeyInject
MonkeyTest=>gcaufield/MonkeyTest

MonkeyLog=>gcaufield/MonkeyLog
";

fn bench_version_match(c: &mut Criterion) {
    let spec = VersionSpec::new("1.2");
    c.bench_function("version_matches", |b| {
        b.iter(|| {
            let _ = spec.matches(black_box("v1.2.3"));
            let _ = spec.matches(black_box("1.20.0"));
            let _ = spec.matches(black_box("v2.0.0"));
        })
    });
}

fn bench_manifest_parse(c: &mut Criterion) {
    c.bench_function("parse_manifest_xml", |b| {
        b.iter(|| Manifest::parse(black_box(MOCK_MANIFEST)).unwrap())
    });
}

fn bench_package_map_parse(c: &mut Criterion) {
    c.bench_function("parse_packages_txt", |b| {
        b.iter(|| PackageMap::parse(black_box(MOCK_PACKAGES)).unwrap())
    });
}

fn bench_jungle_render(c: &mut Criterion) {
    let deps: Vec<Dependency> = (0..32)
        .map(|i| {
            let mut dep = Dependency::new(format!("Barrel{}", i));
            dep.set_barrel_path(format!(".mbpkg/Barrel{}.barrel", i));
            dep
        })
        .collect();

    c.bench_function("render_jungle", |b| b.iter(|| jungle::render(black_box(&deps)).unwrap()));
}

criterion_group!(
    benches,
    bench_version_match,
    bench_manifest_parse,
    bench_package_map_parse,
    bench_jungle_render
);
criterion_main!(benches);
