use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use mdquiz_core::ids::SequentialIds;
use mdquiz_core::parser::parse_markup;

fn bank_text(questions: usize) -> String {
    let mut s = String::new();
    for i in 1..=questions {
        s.push_str(&format!(
            "### **Question {i}:** What is {i} + {i}?\n\
             a. {}\n\
             **b. {}**\n\
             c. {}\n\
             d. {}\n\n",
            i,
            i * 2,
            i * 3,
            i + 1
        ));
    }
    s
}

fn bench_parse_markup(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_markup");

    let small = bank_text(10);
    let large = bank_text(500);
    let noisy = {
        let mut s = String::from("# Practice exam\n\nSome intro prose.\n\n");
        s.push_str(&bank_text(100).replace('\n', "\r\n"));
        s.push_str("**Question 999** orphan with no options\n");
        s
    };

    group.bench_function("10_questions", |b| {
        b.iter(|| {
            let mut ids = SequentialIds::new();
            let mut rng = StdRng::seed_from_u64(1);
            parse_markup(black_box(&small), &mut ids, &mut rng)
        })
    });

    group.bench_function("500_questions", |b| {
        b.iter(|| {
            let mut ids = SequentialIds::new();
            let mut rng = StdRng::seed_from_u64(1);
            parse_markup(black_box(&large), &mut ids, &mut rng)
        })
    });

    group.bench_function("crlf_with_junk", |b| {
        b.iter(|| {
            let mut ids = SequentialIds::new();
            let mut rng = StdRng::seed_from_u64(1);
            parse_markup(black_box(&noisy), &mut ids, &mut rng)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_parse_markup);
criterion_main!(benches);
