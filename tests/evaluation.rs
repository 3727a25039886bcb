//! Generation evaluation across worker pools and supervisor cancellation.

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use evolutionary_snake::{AiSettings, EvaluationMode, Evaluator, LinearPolicy, Termination};

fn population(seed: u64, size: usize) -> Vec<LinearPolicy> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..size).map(|_| LinearPolicy::random(&mut rng, 1.0)).collect()
}

#[test]
fn test_fitness_independent_of_worker_count() {
    let candidates = population(11, 24);
    let baseline = Evaluator::new(AiSettings::default(), EvaluationMode::Sequential)
        .unwrap()
        .evaluate(500, &candidates);

    for workers in [1, 3, 8] {
        let evaluator = Evaluator::new(AiSettings::default(), EvaluationMode::Parallel { workers }).unwrap();
        let results = evaluator.evaluate(500, &candidates);
        assert_eq!(results, baseline, "workers = {workers}");
    }
}

#[test]
fn test_generation_seed_changes_the_episodes() {
    let candidates = population(3, 8);
    let evaluator = Evaluator::new(AiSettings::default(), EvaluationMode::Parallel { workers: 2 }).unwrap();
    let first = evaluator.evaluate(0, &candidates);
    let again = evaluator.evaluate(0, &candidates);
    assert_eq!(first, again);
    assert!(first.iter().map(|c| c.seed).eq(0..8));
}

#[test]
fn test_expired_deadline_still_yields_fitness() {
    let evaluator = Evaluator::new(AiSettings::default(), EvaluationMode::Parallel { workers: 2 })
        .unwrap()
        .with_time_limit(Duration::ZERO);
    let results = evaluator.evaluate(9, &population(5, 6));

    assert_eq!(results.len(), 6);
    for c in &results {
        assert_eq!(c.result.termination, Termination::BudgetExhausted);
        assert_eq!(c.result.steps, 0);
        assert_eq!(c.fitness(), 0.0);
    }
}

#[test]
fn test_settings_record_rebuilds_the_same_generation() {
    use evolutionary_snake::Record;

    let mut settings = AiSettings::default();
    settings.scoring.step_limit = 30;
    let restored = AiSettings::from_bytes(&settings.to_bytes().unwrap()).unwrap();
    assert_eq!(restored, settings);

    let candidates = population(8, 4);
    let a = Evaluator::new(settings, EvaluationMode::Sequential).unwrap().evaluate(1, &candidates);
    let b = Evaluator::new(restored, EvaluationMode::Sequential).unwrap().evaluate(1, &candidates);
    assert_eq!(a, b);
}
