use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use intentio::dataset::synthetic::{self, SyntheticConfig};
use intentio::ml::{
    IntentPipeline, LogisticConfig, LogisticRegression, TfIdfConfig, TfIdfVectorizer,
};
use intentio::predictor::Predictor;

fn fitted_predictor() -> Predictor {
    let dataset = synthetic::generate(&SyntheticConfig::default());
    let texts = dataset.texts();
    let labels = dataset.labels();

    let mut vectorizer = TfIdfVectorizer::new(TfIdfConfig::default());
    vectorizer.fit(&texts);
    let features = vectorizer.transform_batch(&texts);

    let mut classifier = LogisticRegression::new();
    classifier
        .fit(
            &features,
            &labels,
            vectorizer.vocabulary_size(),
            &LogisticConfig {
                max_iter: 100,
                ..LogisticConfig::default()
            },
        )
        .unwrap();
    Predictor::from_pipeline(IntentPipeline::new(vectorizer, classifier), "bench://model")
}

fn bench_predict(c: &mut Criterion) {
    let predictor = fitted_predictor();

    c.bench_function("predict_short_query", |b| {
        b.iter(|| predictor.predict(black_box("给个sklearn逻辑回归示例")).unwrap())
    });

    let long = "how to fix this error in my training loop ".repeat(100);
    c.bench_function("predict_long_query", |b| {
        b.iter(|| predictor.predict(black_box(&long)).unwrap())
    });
}

criterion_group!(benches, bench_predict);
criterion_main!(benches);
