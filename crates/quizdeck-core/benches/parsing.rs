use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizdeck_core::model::Round;
use quizdeck_core::parser::{parse_answer_text, parse_choices, parse_file, parse_question_text};

fn bench_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("records");

    let small = generate_question_file(5);
    let medium = generate_question_file(50);
    let large = generate_question_file(200);

    group.bench_function("5_records", |b| b.iter(|| parse_file(black_box(&small))));
    group.bench_function("50_records", |b| b.iter(|| parse_file(black_box(&medium))));
    group.bench_function("200_records", |b| b.iter(|| parse_file(black_box(&large))));

    group.finish();
}

fn bench_question_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("question_file");

    let questions = generate_question_file(100);
    let answers = generate_answer_file(100);
    let round = Round::new("12");

    group.bench_function("questions_100", |b| {
        b.iter(|| parse_question_text(black_box(&questions), &round, "회계"))
    });

    group.bench_function("answers_100", |b| {
        b.iter(|| parse_answer_text(black_box(&answers)))
    });

    group.bench_function("choices", |b| {
        b.iter(|| parse_choices(black_box("1) 가\n2) 나\n3) 다\n4) 라")))
    });

    group.finish();
}

fn generate_question_file(n: usize) -> String {
    let mut s = String::new();
    for i in 1..=n {
        s.push_str(&format!(
            "CODE: A_{i:02}번\nROUND: 12\nSUBJECT: 회계\nNO: {i}\nTYPE: MCQ\nPOINT: 2.5\nQ:\n문제 {i} 본문\n둘째 줄\nEX:\n자료 {i}\nCHOICES:\n1) 가\n2) 나\n3) 다\n4) 라\n---\n@@@\n"
        ));
    }
    s
}

fn generate_answer_file(n: usize) -> String {
    let mut s = String::new();
    for i in 1..=n {
        s.push_str(&format!(
            "CODE: A_{i}번\nANS: {}\nEXPL:\n해설 {i}\n@@@\n",
            i % 4 + 1
        ));
    }
    s
}

criterion_group!(benches, bench_records, bench_question_file);
criterion_main!(benches);
