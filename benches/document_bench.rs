use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use crpt_gateway::document::{parse, process, sign, StaticSigner};

const DOCUMENT: &str = r#"{
    "description": { "participant_inn": "7700000000" },
    "doc_id": "doc-1",
    "doc_status": "DRAFT",
    "doc_type": "LP_INTRODUCE_GOODS",
    "import_request": true,
    "owner_inn": "1111111111",
    "participant_inn": "7700000000",
    "producer_inn": "2222222222",
    "production_date": "2020-01-23",
    "production_type": "OWN_PRODUCTION",
    "products": [
        {
            "certificate_document": "CONFORMITY_CERTIFICATE",
            "certificate_document_date": "2020-01-20",
            "certificate_document_number": "RU-123",
            "owner_inn": "1111111111",
            "producer_inn": "2222222222",
            "production_date": "2020-01-23",
            "tnved_code": "6401100000",
            "uit_code": "010463003407001221SxMGorvNuq6Wk91fgr92sdfsdf",
            "uitu_code": null
        }
    ],
    "reg_date": "2020-01-24",
    "reg_number": "R-1"
}"#;

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_document", |b| b.iter(|| {
        parse(black_box(DOCUMENT))
    }));
}

fn bench_sign(c: &mut Criterion) {
    let document = parse(DOCUMENT).unwrap();

    c.bench_function("sign_document", |b| b.iter(|| {
        sign(black_box(Some(document.clone())), black_box(Some("sig".to_string())))
    }));
}

fn bench_process(c: &mut Criterion) {
    let signer = StaticSigner::new("example_signature").unwrap();

    c.bench_function("process_document", |b| b.iter(|| {
        process(black_box(DOCUMENT), &signer)
    }));
}

criterion_group!(benches, bench_parse, bench_sign, bench_process);
criterion_main!(benches);
