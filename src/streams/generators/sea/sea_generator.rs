use std::io::{Error, ErrorKind};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::streams::generators::sea::SeaFunction;
use crate::streams::stream::Stream;

/// SEA-concept generator: three numeric features uniform in `[0, 10)`, a
/// class determined by `attrib1 + attrib2` against a threshold, optional
/// class balancing and label noise.
#[derive(Debug)]
pub struct SeaGenerator {
    seed: u64,
    rng: StdRng,
    threshold: f64,
    balance_classes: bool,
    next_class_should_be_zero: bool,
    noise_percentage: u32,
    max_instances: Option<usize>,
    produced: usize,
}

impl SeaGenerator {
    pub fn new(
        function: SeaFunction,
        balance: bool,
        noise_percentage: u32,
        max_instances: Option<usize>,
        seed: u64,
    ) -> Result<Self, Error> {
        if noise_percentage > 100 {
            return Err(Error::new(ErrorKind::InvalidInput, "Noise percentage must be in [0, 100]"));
        }

        Ok(Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            threshold: function.threshold(),
            balance_classes: balance,
            next_class_should_be_zero: false,
            noise_percentage,
            max_instances,
            produced: 0,
        })
    }

    pub fn new_with_threshold(
        threshold: f64,
        balance: bool,
        noise_percentage: u32,
        max_instances: Option<usize>,
        seed: u64,
    ) -> Result<Self, Error> {
        if !(0.0..=20.0).contains(&threshold) {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Threshold must be in [0.0, 20.0] for attributes [0,10]",
            ));
        }
        Self::new(SeaFunction::F2, balance, noise_percentage, max_instances, seed).map(|mut g| {
            g.threshold = threshold;
            g
        })
    }

    #[inline]
    fn gen_attr(&mut self) -> f64 {
        self.rng.random_range(0.0..10.0)
    }

    #[inline]
    fn determine_class(&self, a1: f64, a2: f64) -> usize {
        if a1 + a2 <= self.threshold { 0 } else { 1 }
    }

    #[inline]
    fn maybe_flip_with_noise(&mut self, cls: usize) -> usize {
        let roll: u32 = self.rng.random_range(1..=100);
        if roll <= self.noise_percentage { 1 - cls } else { cls }
    }
}

impl Stream for SeaGenerator {
    fn has_more_instances(&self) -> bool {
        self.max_instances.map_or(true, |max| self.produced < max)
    }

    fn next_instance(&mut self) -> Option<(Vec<f64>, usize)> {
        if !self.has_more_instances() {
            return None;
        }

        let (a1, a2, a3, mut cls) = loop {
            let a1 = self.gen_attr();
            let a2 = self.gen_attr();
            let a3 = self.gen_attr();

            let g = self.determine_class(a1, a2);

            if !self.balance_classes {
                break (a1, a2, a3, g);
            } else {
                let want_zero = self.next_class_should_be_zero;
                if (want_zero && g == 0) || (!want_zero && g == 1) {
                    self.next_class_should_be_zero = !self.next_class_should_be_zero;
                    break (a1, a2, a3, g);
                }
            }
        };

        cls = self.maybe_flip_with_noise(cls);

        self.produced += 1;
        Some((vec![a1, a2, a3], cls))
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.produced = 0;
        self.next_class_should_be_zero = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes_from(generator: &mut SeaGenerator, n: usize) -> Vec<usize> {
        (0..n).map(|_| generator.next_instance().expect("instance").1).collect()
    }

    #[test]
    fn class_rule_matches_threshold_f1_no_noise_no_balance() {
        let threshold = SeaFunction::F1.threshold();
        let mut generator = SeaGenerator::new(SeaFunction::F1, false, 0, Some(500), 123).unwrap();
        for _ in 0..200 {
            let (x, cls) = generator.next_instance().unwrap();
            assert!(x[0] >= 0.0 && x[0] < 10.0);
            assert!(x[1] >= 0.0 && x[1] < 10.0);
            let rule_is_zero = x[0] + x[1] <= threshold + 1e-12;
            assert_eq!(rule_is_zero, cls == 0, "x={x:?} cls={cls}");
        }
    }

    #[test]
    fn balance_true_alternates_classes_starting_with_one() {
        let mut generator = SeaGenerator::new(SeaFunction::F2, true, 0, Some(20), 7).unwrap();
        let got = classes_from(&mut generator, 10);
        let expected: Vec<usize> = (0..10).map(|i| if i % 2 == 0 { 1 } else { 0 }).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn noise_100_percent_flips_all_classes_when_base_is_all_zero() {
        let mut generator = SeaGenerator::new_with_threshold(20.0, false, 100, Some(50), 99).unwrap();
        let got = classes_from(&mut generator, 50);
        assert!(got.iter().all(|&c| c == 1), "expected all classes == 1, got={got:?}");
    }

    #[test]
    fn restart_resets_sequence_with_same_seed() {
        let mut generator = SeaGenerator::new(SeaFunction::F3, true, 10, Some(100), 12345).unwrap();
        let first: Vec<(Vec<f64>, usize)> = (0..30).map(|_| generator.next_instance().unwrap()).collect();
        generator.restart().unwrap();
        let second: Vec<(Vec<f64>, usize)> = (0..30).map(|_| generator.next_instance().unwrap()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let err = SeaGenerator::new(SeaFunction::F1, false, 101, None, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = SeaGenerator::new_with_threshold(-0.1, false, 0, None, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = SeaGenerator::new_with_threshold(20.1, false, 0, None, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn all_four_functions_respect_their_thresholds() {
        let cases = [
            (SeaFunction::F1, 8.0),
            (SeaFunction::F2, 9.0),
            (SeaFunction::F3, 7.0),
            (SeaFunction::F4, 9.5),
        ];
        for (f, thr) in cases {
            let mut generator = SeaGenerator::new(f, false, 0, Some(200), 2025).unwrap();
            for _ in 0..50 {
                let (x, cls) = generator.next_instance().unwrap();
                let rule_is_zero = x[0] + x[1] <= thr + 1e-12;
                assert_eq!(rule_is_zero, cls == 0, "func={f:?} sum={} cls={cls}", x[0] + x[1]);
            }
        }
    }
}
