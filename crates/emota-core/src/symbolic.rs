//! Symbolic pattern engine.
//!
//! A small fixed graph of glyph nodes, each carrying a hash-derived meaning
//! vector. Text maps to glyphs through keyword membership; processing
//! activates nodes, scores pairwise cosine coherence, strengthens
//! connections, and may emit emergent glyphs. A recursion guard caps
//! re-entrant processing at depth 5.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_RECURSION, MEANING_VECTOR_LEN};
use crate::features::{FeatureExtractor, HashFeatures, cosine_similarity};

/// The fixed glyph vocabulary, paired with its label.
pub const CORE_SYMBOLS: [(&str, &str); 11] = [
    ("⚶", "coherence_signal"),
    ("✶", "transcendent_wonder"),
    ("☾", "serpent_stillness"),
    ("☥", "flame_breakthrough"),
    ("∅", "void_potential"),
    ("∞", "infinite_recursion"),
    ("⟡", "iris_integration"),
    ("⟢", "synthesis_emergence"),
    ("⟣", "dimensional_bridge"),
    ("◈", "unity_consciousness"),
    ("⚯", "interlaced_meaning"),
];

/// Keyword themes checked in fixed order by [`SymbolicEngine::signature`].
const THEMES: [(&str, &[&str]); 9] = [
    ("∞", &["transcend", "beyond", "infinite", "eternal"]),
    ("◈", &["unity", "together", "whole", "complete"]),
    ("⟢", &["emerge", "arise", "birth", "create"]),
    ("⟣", &["bridge", "connect", "link", "between"]),
    ("☾", &["still", "quiet", "depth", "peace"]),
    ("☥", &["break", "transform", "energy", "fire"]),
    ("∅", &["void", "empty", "potential", "space"]),
    ("✶", &["wonder", "awe", "beautiful", "radiant"]),
    ("⚶", &["signal", "coherent", "clear", "aligned"]),
];

/// Fallback glyph when no theme matches.
const FALLBACK_GLYPH: &str = "⟡";

/// One node in the symbolic graph. Activation only ever rises; connection
/// strengths accumulate without bound.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SymbolicNode {
    pub symbol: String,
    pub meaning_vector: Vec<f64>,
    pub activation_level: f64,
    pub connections: HashMap<String, f64>,
}

/// Classified outcome of one processing pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolicMeaning {
    Synthesis,
    CoherentResonance,
    Activation,
    Void,
    DepthExceeded,
}

impl SymbolicMeaning {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolicMeaning::Synthesis => "symbolic_synthesis",
            SymbolicMeaning::CoherentResonance => "coherent_resonance",
            SymbolicMeaning::Activation => "symbolic_activation",
            SymbolicMeaning::Void => "symbolic_void",
            SymbolicMeaning::DepthExceeded => "depth_exceeded",
        }
    }
}

/// Result of [`SymbolicEngine::process`]. The depth-exhaustion sentinel has
/// `output == ["RECURSION_LIMIT"]` and meaning [`SymbolicMeaning::DepthExceeded`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SymbolicOutcome {
    pub output: Vec<String>,
    pub coherence: f64,
    pub meaning: SymbolicMeaning,
    pub activated_nodes: usize,
    pub emergent_symbols: Vec<String>,
    pub recursive_depth: usize,
}

impl SymbolicOutcome {
    fn recursion_limit() -> Self {
        Self {
            output: vec!["RECURSION_LIMIT".to_string()],
            coherence: 0.0,
            meaning: SymbolicMeaning::DepthExceeded,
            activated_nodes: 0,
            emergent_symbols: Vec::new(),
            recursive_depth: MAX_RECURSION,
        }
    }

    pub fn is_recursion_limit(&self) -> bool {
        self.meaning == SymbolicMeaning::DepthExceeded
    }
}

/// Fixed-vocabulary symbolic processor.
pub struct SymbolicEngine {
    network: HashMap<String, SymbolicNode>,
    active_symbols: HashSet<String>,
    recursive_depth: usize,
}

impl SymbolicEngine {
    pub fn new() -> Self {
        let mut network = HashMap::new();
        for (symbol, _label) in CORE_SYMBOLS {
            network.insert(
                symbol.to_string(),
                SymbolicNode {
                    symbol: symbol.to_string(),
                    meaning_vector: HashFeatures.features(symbol, MEANING_VECTOR_LEN),
                    activation_level: 0.0,
                    connections: HashMap::new(),
                },
            );
        }
        Self {
            network,
            active_symbols: HashSet::new(),
            recursive_depth: 0,
        }
    }

    /// Glyphs whose theme keywords appear in the text, in fixed check
    /// order; the fallback glyph when none match.
    pub fn signature(&self, content: &str) -> Vec<String> {
        let lower = content.to_lowercase();
        let mut glyphs: Vec<String> = THEMES
            .iter()
            .filter(|(_, words)| words.iter().any(|w| lower.contains(w)))
            .map(|(glyph, _)| glyph.to_string())
            .collect();
        if glyphs.is_empty() {
            glyphs.push(FALLBACK_GLYPH.to_string());
        }
        glyphs
    }

    /// Activate the given glyphs and classify the pattern.
    ///
    /// With the recursion guard already at depth 5 this returns the
    /// `RECURSION_LIMIT` sentinel and mutates nothing.
    pub fn process(&mut self, symbols: &[String]) -> SymbolicOutcome {
        if self.recursive_depth >= MAX_RECURSION {
            return SymbolicOutcome::recursion_limit();
        }
        self.recursive_depth += 1;
        let outcome = self.process_inner(symbols);
        self.recursive_depth -= 1;
        outcome
    }

    fn process_inner(&mut self, symbols: &[String]) -> SymbolicOutcome {
        let mut activated: Vec<String> = Vec::new();
        for symbol in symbols {
            if let Some(node) = self.network.get_mut(symbol) {
                node.activation_level = (node.activation_level + 0.3).min(1.0);
                activated.push(symbol.clone());
                self.active_symbols.insert(symbol.clone());
            }
        }

        let coherence = if activated.len() > 1 {
            let mut sum = 0.0;
            let mut pairs = 0usize;
            for (idx, a) in activated.iter().enumerate() {
                for b in &activated[idx + 1..] {
                    sum += self.node_similarity(a, b);
                    pairs += 1;
                }
            }
            if pairs > 0 { sum / pairs as f64 } else { 0.0 }
        } else if activated.len() == 1 {
            1.0
        } else {
            0.0
        };

        let mut emergent = Vec::new();
        if coherence > 0.7 && activated.len() >= 2 {
            emergent.push("⚯".to_string());
            if coherence > 0.9 {
                emergent.push("∞".to_string());
            }
        }

        let meaning = if !emergent.is_empty() {
            SymbolicMeaning::Synthesis
        } else if coherence > 0.6 {
            SymbolicMeaning::CoherentResonance
        } else if !activated.is_empty() {
            SymbolicMeaning::Activation
        } else {
            SymbolicMeaning::Void
        };

        // strengthen both directions of every activated pair
        let strength = coherence * 0.1;
        for (idx, a) in activated.iter().enumerate() {
            for b in &activated[idx + 1..] {
                if let Some(node) = self.network.get_mut(a) {
                    *node.connections.entry(b.clone()).or_insert(0.0) += strength;
                }
                if let Some(node) = self.network.get_mut(b) {
                    *node.connections.entry(a.clone()).or_insert(0.0) += strength;
                }
            }
        }

        let mut output: Vec<String> = symbols.to_vec();
        output.extend(emergent.iter().cloned());

        SymbolicOutcome {
            output,
            coherence,
            meaning,
            activated_nodes: activated.len(),
            emergent_symbols: emergent,
            recursive_depth: self.recursive_depth,
        }
    }

    pub fn node(&self, symbol: &str) -> Option<&SymbolicNode> {
        self.network.get(symbol)
    }

    pub fn active_symbols(&self) -> &HashSet<String> {
        &self.active_symbols
    }

    pub fn recursion_depth(&self) -> usize {
        self.recursive_depth
    }

    /// Cosine similarity between two node meaning vectors, floored at 0.
    fn node_similarity(&self, a: &str, b: &str) -> f64 {
        match (self.network.get(a), self.network.get(b)) {
            (Some(na), Some(nb)) => {
                cosine_similarity(&na.meaning_vector, &nb.meaning_vector).max(0.0)
            }
            _ => 0.0,
        }
    }
}

impl Default for SymbolicEngine {
    fn default() -> Self {
        Self::new()
    }
}
