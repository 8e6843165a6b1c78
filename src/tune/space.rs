use serde::{Deserialize, Serialize};

/// A candidate value for one tunable parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HpValue {
    Int(usize),
    Name(String),
}

/// An enumerated hyperparameter search space: an ordered set of named
/// parameters, each with a small fixed candidate list.
///
/// A parameter name appears once, so a sample carries a single shared value
/// for it no matter how many layers the model builder threads it through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSpace {
    parameters: Vec<(String, Vec<HpValue>)>,
}

impl SearchSpace {
    pub fn new() -> SearchSpace {
        SearchSpace {
            parameters: Vec::new(),
        }
    }

    /// Adds an integer-valued parameter with the given candidates.
    pub fn choice_int(mut self, name: &str, candidates: &[usize]) -> SearchSpace {
        self.push(name, candidates.iter().map(|&v| HpValue::Int(v)).collect());
        self
    }

    /// Adds a name-valued parameter (e.g. an activation function) with the
    /// given candidates.
    pub fn choice_name(mut self, name: &str, candidates: &[&str]) -> SearchSpace {
        self.push(
            name,
            candidates
                .iter()
                .map(|&v| HpValue::Name(v.to_string()))
                .collect(),
        );
        self
    }

    fn push(&mut self, name: &str, candidates: Vec<HpValue>) {
        assert!(!candidates.is_empty(), "parameter '{}' has no candidates", name);
        assert!(
            self.parameters.iter().all(|(n, _)| n != name),
            "parameter '{}' declared twice",
            name
        );
        self.parameters.push((name.to_string(), candidates));
    }

    /// Number of distinct configurations (product of candidate counts).
    pub fn len(&self) -> usize {
        self.parameters
            .iter()
            .map(|(_, candidates)| candidates.len())
            .product()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Decodes configuration `index` (mixed-radix over the candidate lists)
    /// into a concrete sample. `index` must be below `len()`.
    pub fn sample(&self, index: usize) -> HyperparameterSample {
        assert!(index < self.len(), "configuration index out of range");
        let mut remainder = index;
        let values = self
            .parameters
            .iter()
            .map(|(name, candidates)| {
                let value = candidates[remainder % candidates.len()].clone();
                remainder /= candidates.len();
                (name.clone(), value)
            })
            .collect();
        HyperparameterSample { values }
    }

    /// Every configuration in the space, in index order.
    pub fn all_samples(&self) -> Vec<HyperparameterSample> {
        (0..self.len()).map(|i| self.sample(i)).collect()
    }

    /// Prints the parameter names and candidate lists before a search starts.
    pub fn summary(&self) {
        println!("Search space ({} configurations):", self.len());
        for (name, candidates) in &self.parameters {
            let rendered: Vec<String> = candidates
                .iter()
                .map(|v| match v {
                    HpValue::Int(i) => i.to_string(),
                    HpValue::Name(n) => n.clone(),
                })
                .collect();
            println!("  {}: [{}]", name, rendered.join(", "));
        }
    }
}

impl Default for SearchSpace {
    fn default() -> Self {
        SearchSpace::new()
    }
}

/// One concrete draw from a `SearchSpace`: a name → value mapping consumed
/// by a model builder. Missing or mistyped lookups are contract violations
/// and panic, since builders only see samples from their own space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HyperparameterSample {
    values: Vec<(String, HpValue)>,
}

impl HyperparameterSample {
    pub fn int(&self, name: &str) -> usize {
        match self.get(name) {
            HpValue::Int(v) => *v,
            other => panic!("parameter '{}' is not an integer: {:?}", name, other),
        }
    }

    pub fn name(&self, name: &str) -> &str {
        match self.get(name) {
            HpValue::Name(v) => v,
            other => panic!("parameter '{}' is not a name: {:?}", name, other),
        }
    }

    fn get(&self, name: &str) -> &HpValue {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
            .unwrap_or_else(|| panic!("unknown parameter '{}'", name))
    }
}

impl std::fmt::Display for HyperparameterSample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self
            .values
            .iter()
            .map(|(name, value)| match value {
                HpValue::Int(i) => format!("{}={}", name, i),
                HpValue::Name(n) => format!("{}={}", name, n),
            })
            .collect();
        write!(f, "{{{}}}", rendered.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digit_space() -> SearchSpace {
        SearchSpace::new()
            .choice_int("units", &[24, 32, 40])
            .choice_name("activation", &["relu", "tanh", "sigmoid"])
    }

    #[test]
    fn len_is_the_product_of_candidate_counts() {
        assert_eq!(digit_space().len(), 9);
    }

    #[test]
    fn samples_enumerate_every_combination_once() {
        let space = digit_space();
        let samples = space.all_samples();
        assert_eq!(samples.len(), 9);
        for a in 0..samples.len() {
            for b in (a + 1)..samples.len() {
                assert_ne!(samples[a], samples[b]);
            }
        }
    }

    #[test]
    fn sample_values_come_from_the_candidate_lists() {
        let space = digit_space();
        for sample in space.all_samples() {
            assert!([24, 32, 40].contains(&sample.int("units")));
            assert!(["relu", "tanh", "sigmoid"].contains(&sample.name("activation")));
        }
    }

    #[test]
    #[should_panic]
    fn unknown_parameter_lookup_panics() {
        digit_space().sample(0).int("learning_rate");
    }

    #[test]
    #[should_panic]
    fn duplicate_parameter_names_are_rejected() {
        SearchSpace::new()
            .choice_int("units", &[1])
            .choice_int("units", &[2]);
    }
}
