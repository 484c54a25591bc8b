use anyhow::{Context, Result};

use forestflow::classifier::Classifier;
use forestflow::classifiers::ArfClassifier;
use forestflow::drift::Ddm;
use forestflow::evaluation::BasicClassificationEvaluator;
use forestflow::pipeline::PipelineClassifier;
use forestflow::preprocessing::StandardScaler;
use forestflow::streams::{SeaFunction, SeaGenerator};
use forestflow::tasks::PrequentialEvaluator;

struct Args {
    instances: u64,
    seed: u64,
    noise: u32,
    trees: usize,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            instances: 100_000,
            seed: 42,
            noise: 10,
            trees: 10,
        }
    }
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(flag) = it.next() {
        let mut value = || {
            it.next()
                .with_context(|| format!("missing value for {flag}"))
        };
        match flag.as_str() {
            "--instances" => args.instances = value()?.parse().context("--instances")?,
            "--seed" => args.seed = value()?.parse().context("--seed")?,
            "--noise" => args.noise = value()?.parse().context("--noise")?,
            "--trees" => args.trees = value()?.parse().context("--trees")?,
            other => anyhow::bail!("unrecognized argument: {other}"),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = parse_args()?;

    log::info!(
        "starting prequential run: instances={} seed={} noise={}% trees={}",
        args.instances,
        args.seed,
        args.noise,
        args.trees
    );

    let stream = SeaGenerator::new(SeaFunction::F2, true, args.noise, Some(args.instances as usize), args.seed)
        .context("failed to build SEA generator")?;

    let scaler = StandardScaler::new();
    let forest = ArfClassifier::new(3, 2, args.trees, Some(args.seed), || Ddm::new(30.0, 2.0), || {
        Ddm::new(30.0, 3.0)
    });
    let learner: Box<dyn Classifier> = Box::new(PipelineClassifier::new(scaler, forest));

    let evaluator = Box::new(BasicClassificationEvaluator::<
        forestflow::evaluation::BasicEstimator,
    >::new_with_default_flags(2));

    let mut driver = PrequentialEvaluator::new(
        learner,
        Box::new(stream),
        evaluator,
        Some(args.instances),
        None,
        1_000,
        10_000,
    )
    .context("failed to construct prequential evaluator")?;

    driver.run().context("prequential run failed")?;

    for snapshot in driver.curve().entries() {
        log::info!(
            "seen={} accuracy={:.4} kappa={:.4} ram_hours={:.6} elapsed={:.2}s",
            snapshot.instances_seen,
            snapshot.accuracy,
            snapshot.kappa,
            snapshot.ram_hours,
            snapshot.seconds
        );
    }

    if let Some(last) = driver.curve().latest() {
        log::info!(
            "final: seen={} accuracy={:.4} kappa={:.4}",
            last.instances_seen,
            last.accuracy,
            last.kappa
        );
    }

    Ok(())
}
