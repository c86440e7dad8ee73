//! Market connectivity graph and unlock propagation.
//!
//! Markets form an undirected graph through their `link1`/`link2`
//! declarations. A participant may invest in their home market and in
//! every market one hop away from a market where they were "green" (earned
//! positive income) in the previous cycle.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::foundation::MarketName;

use super::Market;

/// Read-only view over the market table as a graph.
#[derive(Debug, Clone)]
pub struct MarketGraph<'a> {
    markets: BTreeMap<&'a MarketName, &'a Market>,
}

impl<'a> MarketGraph<'a> {
    pub fn new(markets: &'a [Market]) -> Self {
        Self {
            markets: markets.iter().map(|m| (&m.name, m)).collect(),
        }
    }

    /// Returns true if the market table contains `name`.
    pub fn contains(&self, name: &MarketName) -> bool {
        self.markets.contains_key(name)
    }

    /// Undirected edges, one per declared link whose target exists.
    ///
    /// Links pointing at unknown markets are dropped.
    pub fn edges(&self) -> Vec<(&'a MarketName, &'a MarketName)> {
        let mut edges = BTreeSet::new();
        for &market in self.markets.values() {
            for target in market.links() {
                if let Some(&other) = self.markets.get(target) {
                    let (a, b) = if market.name <= other.name {
                        (&market.name, &other.name)
                    } else {
                        (&other.name, &market.name)
                    };
                    edges.insert((a, b));
                }
            }
        }
        edges.into_iter().collect()
    }

    /// Markets open to a participant this cycle.
    ///
    /// The home market is always unlocked; each edge touching a green
    /// market unlocks both of its endpoints.
    pub fn unlocked_for(
        &self,
        home: Option<&MarketName>,
        green: &BTreeSet<MarketName>,
    ) -> BTreeSet<MarketName> {
        let mut unlocked: BTreeSet<MarketName> = home
            .filter(|h| self.contains(h))
            .cloned()
            .into_iter()
            .collect();

        for (a, b) in self.edges() {
            if green.contains(a) || green.contains(b) {
                unlocked.insert(a.clone());
                unlocked.insert(b.clone());
            }
        }
        unlocked
    }
}
