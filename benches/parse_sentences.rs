use criterion::{black_box, criterion_group, criterion_main, Criterion};

use npchunk::{noun_phrase_chunks, Grammar};

fn parse(g: &Grammar, input: &[&str]) -> usize {
  g.parse(input)
    .map(|trees| trees.iter().map(|t| noun_phrase_chunks(t).len()).sum())
    .unwrap_or(0)
}

fn criterion_benchmark(c: &mut Criterion) {
  let grammar = Grammar::sentences();
  let simple_input = "holmes lit a pipe".split(' ').collect::<Vec<_>>();
  let ambiguous_input = "i had a little moist red paint in the palm of my hand"
    .split(' ')
    .collect::<Vec<_>>();

  c.bench_function("parse simple", |b| {
    b.iter(|| parse(black_box(&grammar), black_box(&simple_input)))
  });

  c.bench_function("parse ambiguous", |b| {
    b.iter(|| parse(black_box(&grammar), black_box(&ambiguous_input)))
  });

  c.bench_function("count ambiguous", |b| {
    b.iter(|| {
      grammar
        .parse_forest(black_box(&ambiguous_input))
        .map(|f| f.tree_count())
        .unwrap_or(0)
    })
  });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
