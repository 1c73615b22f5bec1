// Random Source
// Injectable randomness for every probability gate in the rewrite pipeline

/// Uniform draws used by mutators; pass `&mut dyn RandomSource` down the call chain.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn chance(&mut self) -> f64;

    /// Uniform index in `0..n`; 0 when `n == 0`.
    fn below(&mut self, n: usize) -> usize;

    /// True when a fresh draw exceeds `threshold`.
    fn roll(&mut self, threshold: f64) -> bool {
        self.chance() > threshold
    }
}

impl<R: rand::RngCore> RandomSource for R {
    fn chance(&mut self) -> f64 {
        rand::Rng::gen::<f64>(self)
    }

    fn below(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        rand::Rng::gen_range(self, 0..n)
    }
}

pub fn pick<'a, T>(rng: &mut dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.below(items.len()))
}

/// Replays a fixed cycle of draws. `always(0.0)` never fires a gate, `always(0.999)` fires all.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    pub fn always(value: f64) -> Self {
        Self::new(vec![value])
    }

    fn next_value(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v.clamp(0.0, 0.999_999)
    }
}

impl RandomSource for ScriptedRandom {
    fn chance(&mut self) -> f64 {
        self.next_value()
    }

    fn below(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        ((self.next_value() * n as f64) as usize).min(n - 1)
    }
}
