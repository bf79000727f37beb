use braid_core::Event;

#[derive(Clone, Copy, Debug)]
pub struct BenchmarkTier {
    pub name: &'static str,
    pub event_count: usize,
}

pub const TIER_S: BenchmarkTier = BenchmarkTier {
    name: "S",
    event_count: 1_000,
};

pub const TIER_M: BenchmarkTier = BenchmarkTier {
    name: "M",
    event_count: 10_000,
};

pub const TIER_L: BenchmarkTier = BenchmarkTier {
    name: "L",
    event_count: 100_000,
};

pub const TIERS: [BenchmarkTier; 3] = [TIER_S, TIER_M, TIER_L];

#[derive(Clone, Copy, Debug)]
struct Prng(u64);

impl Prng {
    const fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // 64-bit LCG constants from Numerical Recipes.
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0
    }

    fn next_index(&mut self, upper_exclusive: usize) -> usize {
        if upper_exclusive == 0 {
            return 0;
        }
        (self.next_u64() as usize) % upper_exclusive
    }

    fn chance(&mut self, numerator: u64, denominator: u64) -> bool {
        self.next_u64() % denominator < numerator
    }
}

/// Synthetic history shaped like a busy repository: mostly linear work on a
/// handful of live heads, with regular forks and merges.
///
/// Parents are drawn from a sliding window of recent events so lanes open and
/// close instead of growing without bound.
pub fn synthetic_timeline(tier: BenchmarkTier, seed: u64) -> Vec<Event<u64>> {
    const WINDOW: usize = 64;

    let mut rng = Prng::new(seed);
    let mut events: Vec<Event<u64>> = Vec::with_capacity(tier.event_count);
    let mut timestamp = 1_700_000_000_000_i64;

    for id in 0..tier.event_count as u64 {
        timestamp += 1 + (rng.next_u64() % 5_000) as i64;
        let row = id as usize;
        let parents = if row == 0 || rng.chance(1, 200) {
            Vec::new()
        } else {
            let recent = row.min(WINDOW);
            let first = row - 1 - rng.next_index(recent.min(8));
            let mut parents = vec![first as u64];
            if row > 1 && rng.chance(1, 10) {
                let second = row - 1 - rng.next_index(recent);
                if second != first {
                    parents.push(second as u64);
                }
            }
            parents
        };
        events.push(Event::new(id, timestamp, parents));
    }

    events
}
