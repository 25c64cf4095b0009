use criterion::{Criterion, criterion_group, criterion_main};
use rulebook::prelude::*;
use rulebook::validators;
use std::hint::black_box;

fn bench_rule_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("rule_parsing");

    group.bench_function("parse_short", |b| {
        b.iter(|| Parser::parse(black_box("required|email")).unwrap())
    });

    group.bench_function("parse_long", |b| {
        b.iter(|| {
            Parser::parse(black_box(
                "required|int|between:1,100|in:1,2,3,5,8,13,21,34,55,89|creditcard:visa,amex",
            ))
            .unwrap()
        })
    });

    group.bench_function("parse_structured", |b| {
        let spec = RuleSpec::structured()
            .rule("required")
            .with("lengthBetween", json!([3, 16]))
            .with("notIn", json!(["admin", "root"]));
        b.iter(|| Parser::parse_spec(black_box(&spec)).unwrap())
    });

    group.bench_function("explode_form", |b| {
        b.iter(|| {
            Parser::explode(black_box([
                ("username", "required|slug|lengthBetween:3,16"),
                ("email", "required|email"),
                ("age", "int|between:13,120"),
                ("plan", "in:free,pro,team"),
            ]))
            .unwrap()
        })
    });

    group.finish();
}

fn bench_checkers(c: &mut Criterion) {
    let mut group = c.benchmark_group("checkers");
    let ctx = ValidationContext::new();

    let emails = [
        json!("user@example.com"),
        json!("test.user+tag@domain.co.uk"),
        json!("invalid-email"),
    ];
    group.bench_function("email", |b| {
        b.iter(|| {
            for email in &emails {
                black_box(validators::email(black_box(email), &[], &ctx));
            }
        })
    });

    let card = json!("4539 5116 1954 3489");
    group.bench_function("credit_card_any", |b| {
        b.iter(|| validators::credit_card(black_box(&card), &[], &ctx))
    });

    let brands = [json!(["visa", "mastercard"])];
    group.bench_function("credit_card_typed", |b| {
        b.iter(|| validators::credit_card(black_box(&card), &brands, &ctx))
    });

    let members = [json!(["red", "green", "blue", "cyan", "magenta"])];
    group.bench_function("in_list", |b| {
        b.iter(|| validators::in_list(black_box(&json!("cyan")), &members, &ctx))
    });

    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");

    let data = ValidationContext::try_from(json!({
        "username": "ada_l",
        "email": "ada@example.com",
        "age": 36,
        "plan": "pro"
    }))
    .unwrap();
    let validator = Validator::new(
        data,
        [
            ("username", "required|slug|lengthBetween:3,16"),
            ("email", "required|email"),
            ("age", "int|between:13,120"),
            ("plan", "in:free,pro,team"),
        ],
    )
    .unwrap();

    group.bench_function("form_passes", |b| {
        b.iter(|| {
            let mut v = validator.clone();
            black_box(v.validate().unwrap())
        })
    });

    let failing = Validator::new(
        ValidationContext::new().with("email", "nope"),
        [("email", "required|email"), ("name", "required")],
    )
    .unwrap();

    group.bench_function("form_fails_with_errors", |b| {
        b.iter(|| {
            let mut v = failing.clone();
            v.validate().unwrap();
            black_box(v.errors())
        })
    });

    group.finish();
}

criterion_group!(
    validation_benches,
    bench_rule_parsing,
    bench_checkers,
    bench_validate,
);

criterion_main!(validation_benches);
