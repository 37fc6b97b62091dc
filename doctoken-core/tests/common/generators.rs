//! Stochastic tree generators for test variations
//!
//! Uses seeded RNG for reproducibility. Print seed on failure for replay.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use doctoken_core::{DateTime, Document, Node, ObjectId};

/// Key under which a wrapped tree is stored. Filler keys always carry an
/// underscore suffix, so they never collide with it.
pub const TARGET_KEY: &str = "target";

/// Seeded generator for reproducible stochastic tests
pub struct Gen {
    pub rng: StdRng,
    pub seed: u64,
}

impl Gen {
    /// Create with specific seed (for reproduction)
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create from environment or random seed
    pub fn from_env_or_random() -> Self {
        let seed = std::env::var("DOCTOKEN_TEST_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(rand::random);
        Self::new(seed)
    }

    /// Geometric distribution: count until rand > alpha
    /// Returns 0, 1, 2, ... with decreasing probability
    pub fn geometric(&mut self, alpha: f64) -> usize {
        let mut n = 0;
        while self.rng.gen::<f64>() < alpha {
            n += 1;
        }
        n
    }

    /// Poisson-like count (simplified)
    pub fn poisson(&mut self, lambda: f64) -> usize {
        let l = (-lambda).exp();
        let mut k = 0;
        let mut p = 1.0;
        loop {
            k += 1;
            p *= self.rng.gen::<f64>();
            if p <= l {
                break;
            }
        }
        k - 1
    }

    /// Random boolean with probability p
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen::<f64>() < p
    }

    /// Random field name: a letter followed by letters and digits
    pub fn name(&mut self) -> String {
        let len = 1 + self.geometric(0.7);
        let mut name = String::with_capacity(len);
        name.push(self.rng.gen_range(b'a'..=b'z') as char);
        let chars = b"abcdefghijklmnopqrstuvwxyz0123456789";
        for _ in 1..len {
            name.push(chars[self.rng.gen_range(0..chars.len())] as char);
        }
        name
    }

    /// Random classifiable scalar
    pub fn scalar(&mut self) -> Node {
        match self.rng.gen_range(0..8) {
            0 => Node::Null,
            1 => Node::Boolean(self.chance(0.5)),
            2 => Node::Int32(self.rng.gen_range(-9999..9999)),
            3 => Node::Int64(self.rng.gen()),
            4 => Node::Double(self.rng.gen_range(-1.0e6..1.0e6)),
            5 => Node::String(self.name()),
            6 => Node::ObjectId(ObjectId::from_bytes(self.rng.gen())),
            _ => Node::DateTime(DateTime::from_millis(self.rng.gen_range(0..i64::from(u32::MAX)))),
        }
    }

    /// Random classifiable subtree, at most `depth` containers deep
    pub fn filler_node(&mut self, depth: usize) -> Node {
        if depth == 0 || !self.chance(0.3) {
            return self.scalar();
        }
        let count = self.poisson(2.0);
        if self.chance(0.5) {
            Node::Array((0..count).map(|_| self.filler_node(depth - 1)).collect())
        } else {
            let mut doc = Document::with_capacity(count);
            for i in 0..count {
                let key = format!("{}_{}", self.name(), i);
                let value = self.filler_node(depth - 1);
                doc.insert(key, value);
            }
            Node::Document(doc)
        }
    }

    /// Random filler siblings
    pub fn fillers(&mut self) -> Vec<Node> {
        let count = self.geometric(0.5);
        (0..count).map(|_| self.filler_node(2)).collect()
    }

    /// Embed `target` in one random container, between filler siblings
    pub fn wrap(&mut self, target: Node) -> Node {
        let before = self.fillers();
        let after = self.fillers();
        if self.chance(0.5) {
            let mut items = before;
            items.push(target);
            items.extend(after);
            Node::Array(items)
        } else {
            let mut doc = Document::new();
            for (i, node) in before.into_iter().enumerate() {
                doc.insert(format!("{}_{}", self.name(), i), node);
            }
            doc.insert(TARGET_KEY, target);
            for (i, node) in after.into_iter().enumerate() {
                doc.insert(format!("{}_a{}", self.name(), i), node);
            }
            Node::Document(doc)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reproducibility() {
        let mut g1 = Gen::new(42);
        let mut g2 = Gen::new(42);

        for _ in 0..10 {
            assert_eq!(g1.name(), g2.name());
            assert_eq!(g1.geometric(0.9), g2.geometric(0.9));
            assert_eq!(g1.filler_node(3), g2.filler_node(3));
        }
    }

    fn nesting(node: &Node) -> usize {
        match node {
            Node::Array(items) => 1 + items.iter().map(nesting).max().unwrap_or(0),
            Node::Document(doc) => 1 + doc.iter().map(|(_, v)| nesting(v)).max().unwrap_or(0),
            _ => 0,
        }
    }

    #[test]
    fn test_filler_shape() {
        let mut gen = Gen::new(12345);
        for depth in 0..4 {
            for _ in 0..50 {
                let node = gen.filler_node(depth);
                assert!(nesting(&node) <= depth, "{:?}", node);
                if let Some(doc) = node.as_document() {
                    assert!(doc.keys().all(|k| k.contains('_') && k != TARGET_KEY));
                }
            }
        }
    }

    #[test]
    fn test_wrap_keeps_target() {
        let mut gen = Gen::new(7);
        for _ in 0..20 {
            let wrapped = gen.wrap(Node::from("needle"));
            let found = match &wrapped {
                Node::Array(items) => items.iter().any(|n| n.as_str() == Some("needle")),
                Node::Document(doc) => doc.get(TARGET_KEY).and_then(Node::as_str) == Some("needle"),
                _ => false,
            };
            assert!(found, "{:?}", wrapped);
        }
    }
}
