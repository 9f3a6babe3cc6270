//! Benchmarks for response classification and settings resolution

use criterion::{Criterion, criterion_group, criterion_main};
use mailchimp_client::{
    ApiVersion, CampaignDefaults, CampaignSettings, ResolvedSettings, classify_error,
};
use serde_json::json;
use std::hint::black_box;

fn bench_classify_error(c: &mut Criterion) {
    let legacy = json!({"status": "error", "error": "Invalid API key"});
    let current = json!({"errors": [{"message": "Invalid Resource"}]});
    let clean = json!({
        "id": "abc123",
        "web_id": 42,
        "status": "save",
        "recipients": {"list_id": "l1"}
    });

    c.bench_function("classify_legacy_error", |b| {
        b.iter(|| {
            let detail = classify_error(ApiVersion::V2, black_box(&legacy));
            assert!(detail.is_some());
        })
    });

    c.bench_function("classify_current_error", |b| {
        b.iter(|| {
            let detail = classify_error(ApiVersion::V3, black_box(&current));
            assert!(detail.is_some());
        })
    });

    c.bench_function("classify_clean_response", |b| {
        b.iter(|| {
            let detail = classify_error(ApiVersion::V3, black_box(&clean));
            assert!(detail.is_none());
        })
    });
}

fn bench_settings_resolution(c: &mut Criterion) {
    let settings = CampaignSettings::new("l1", "t1")
        .with_title("March newsletter")
        .with_subject("Fresh this month")
        .with_section("body", "<p>Hello readers!</p>");
    let defaults = CampaignDefaults {
        subject: "Default".to_owned(),
        from_email: "a@x.com".to_owned(),
        from_name: "A".to_owned(),
    };

    c.bench_function("resolve_settings", |b| {
        b.iter(|| {
            let resolved = ResolvedSettings::merged(black_box(&settings), black_box(&defaults));
            assert!(resolved.is_ok());
        })
    });
}

criterion_group!(benches, bench_classify_error, bench_settings_resolution);
criterion_main!(benches);
