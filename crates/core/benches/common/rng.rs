#[derive(Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform integer in `min..max`.
    pub fn gen_range(&mut self, min: i32, max: i32) -> i32 {
        let span = (max - min).max(1) as u64;
        min + (self.next_u64() % span) as i32
    }
}
