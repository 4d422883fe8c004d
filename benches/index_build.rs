use criterion::{Criterion, criterion_group, criterion_main};
use newsrec::corpus::{Article, Corpus};
use newsrec::index::{ContentIndex, SimilarityMatrix, TfidfVectorizer, VectorizerConfig};
use std::hint::black_box;

const TOPICS: [&str; 8] = [
    "election votes senate campaign",
    "football league season coach",
    "market stocks earnings investors",
    "storm rain forecast weather",
    "vaccine hospital health doctors",
    "recipe dinner kitchen baking",
    "movie premiere actor festival",
    "rocket launch orbit satellite",
];

fn synthetic_corpus(size: usize) -> Corpus {
    let articles = (0..size)
        .map(|i| {
            let topic = TOPICS[i % TOPICS.len()];
            let other = TOPICS[(i * 7 + 3) % TOPICS.len()];
            Article::new(
                format!("N{i}"),
                format!("{topic} update {}", i % 13),
                format!("{topic} {other} report number {i} with details"),
            )
        })
        .collect();
    Corpus::from_articles(articles)
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let corpus = synthetic_corpus(1000);
    let texts = corpus.combined_texts();
    let config = VectorizerConfig::default();

    c.bench_function("tfidf_fit_transform", |b| {
        b.iter(|| TfidfVectorizer::new(config.clone()).fit_transform(black_box(&texts)))
    });

    let vectors = TfidfVectorizer::new(config.clone()).fit_transform(&texts);
    c.bench_function("similarity_matrix", |b| {
        b.iter(|| SimilarityMatrix::from_vectors(black_box(&vectors)))
    });

    c.bench_function("content_index_build", |b| {
        b.iter(|| ContentIndex::build(black_box(corpus.clone()), &config))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
