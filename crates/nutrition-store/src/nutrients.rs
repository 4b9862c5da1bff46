//! Aggregation over macros and micronutrients.

use indexmap::IndexMap;

use crate::models::{FoodLog, Macros, Micro};

/// Sum micros by name, keeping first-seen order.
pub fn aggregate_micros<'a>(micros: impl IntoIterator<Item = &'a Micro>) -> Vec<Micro> {
    let mut totals: IndexMap<String, f64> = IndexMap::new();
    for micro in micros {
        *totals.entry(micro.name.trim().to_string()).or_insert(0.0) += micro.amount;
    }
    totals
        .into_iter()
        .map(|(name, amount)| Micro { name, amount })
        .collect()
}

/// Sum of the total macros of every log.
pub fn sum_macros(logs: &[FoodLog]) -> Macros {
    logs.iter()
        .fold(Macros::default(), |acc, log| acc + log.total_macros)
}

/// Calories across logs.
pub fn total_calories(logs: &[FoodLog]) -> f64 {
    logs.iter().map(|log| log.total_macros.calories()).sum()
}

/// Per-entry averages over a set of logs.
#[derive(Debug, Clone, PartialEq)]
pub struct NutrientAverages {
    pub entries: usize,
    pub macros: Macros,
    pub micros: Vec<Micro>,
}

/// Average macros and micros per entry. Micros are summed by name first.
pub fn average_per_entry(logs: &[FoodLog]) -> NutrientAverages {
    let n = logs.len();
    let micros = aggregate_micros(logs.iter().flat_map(|log| log.total_micros.iter()))
        .into_iter()
        .map(|m| Micro {
            amount: if n == 0 { 0.0 } else { m.amount / n as f64 },
            name: m.name,
        })
        .collect();

    NutrientAverages {
        entries: n,
        macros: sum_macros(logs).divided_by(n),
        micros,
    }
}
