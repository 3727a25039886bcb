use anyhow::Result;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use evolutionary_snake::{AiSettings, Episode, EvaluationMode, Evaluator, LinearPolicy, TextRenderer};

const POPULATION: usize = 16;
const GENERATIONS: u64 = 8;
const SIGMA: f32 = 0.25;

fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let settings = AiSettings::default();
    let evaluator = Evaluator::new(settings.clone(), EvaluationMode::Parallel { workers: 0 })?;
    let mut rng = SmallRng::seed_from_u64(0);
    let mut population: Vec<LinearPolicy> = (0..POPULATION).map(|_| LinearPolicy::random(&mut rng, 1.0)).collect();
    let mut best = population[0].clone();
    let mut best_fitness = f64::NEG_INFINITY;

    for generation in 0..GENERATIONS {
        let mut ranking = evaluator.evaluate(generation * POPULATION as u64, &population);
        ranking.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
        for c in ranking.iter().take(3) {
            info!(
                generation,
                candidate = c.index,
                fitness = c.fitness(),
                score = c.result.score,
                termination = ?c.result.termination,
                "ranked"
            );
        }

        let parent = population[ranking[0].index].clone();
        if ranking[0].fitness() > best_fitness {
            best_fitness = ranking[0].fitness();
            best = parent.clone();
        }

        // keep the best parent, fill the rest with its mutated copies
        let mut next = Vec::with_capacity(POPULATION);
        next.push(parent.clone());
        while next.len() < POPULATION {
            let mut child = parent.clone();
            mutate(&mut child, &mut rng, SIGMA);
            next.push(child);
        }
        population = next;
    }

    info!(best_fitness, "training finished");
    println!("{}", serde_json::to_string_pretty(&best)?);

    let mut replay = settings;
    replay.name = "best".to_string();
    replay.game.run_in_background = false;
    let result = Episode::ai(&replay, best)?
        .with_renderer(TextRenderer::new(std::io::stdout()).clear_screen(true))
        .run();
    info!(score = result.score, loss = ?result.loss, "replay finished");
    Ok(())
}

fn mutate<R: Rng>(policy: &mut LinearPolicy, rng: &mut R, sigma: f32) {
    for w in policy.weights.iter_mut().flatten() {
        *w += rng.gen_range(-sigma..sigma);
    }
    for b in policy.bias.iter_mut() {
        *b += rng.gen_range(-sigma..sigma);
    }
}
