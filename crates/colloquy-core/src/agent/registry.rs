//! Lookup of configured agents

use super::{Agent, AgentId};
use crate::config::EngineConfig;
use crate::error::{ColloquyError, ColloquyResult};
use std::sync::Arc;

/// The fixed pair of agents, in speaking order
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    agents: Vec<Arc<Agent>>,
}

impl AgentRegistry {
    /// Build the registry from configuration
    pub fn from_config(config: &EngineConfig) -> ColloquyResult<Self> {
        config.validate()?;

        let agents = config
            .agents
            .iter()
            .map(|a| {
                Arc::new(Agent::new(
                    AgentId::new(a.name.clone()),
                    a.miss_line.clone(),
                    config.cooldown_capacity,
                ))
            })
            .collect();

        Ok(Self { agents })
    }

    /// Resolve a caller-supplied name (case-insensitive)
    pub fn resolve(&self, name: &str) -> ColloquyResult<Arc<Agent>> {
        let key = name.trim().to_lowercase();
        if key.is_empty() {
            return Err(ColloquyError::validation(
                "speaker",
                "must not be empty",
                name,
            ));
        }

        self.agents
            .iter()
            .find(|a| a.id().key() == key)
            .cloned()
            .ok_or_else(|| ColloquyError::unknown_agent(name))
    }

    /// Agent that opens every dialogue run
    pub fn first(&self) -> &Arc<Agent> {
        &self.agents[0]
    }

    /// The other agent of the pair
    pub fn partner_of(&self, id: &AgentId) -> &Arc<Agent> {
        if self.agents[0].id() == id {
            &self.agents[1]
        } else {
            &self.agents[0]
        }
    }

    /// All agents, in speaking order
    pub fn all(&self) -> &[Arc<Agent>] {
        &self.agents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AgentConfig;

    #[test]
    fn test_resolve_known_agents() {
        let registry = AgentRegistry::from_config(&EngineConfig::default()).unwrap();

        assert_eq!(registry.resolve("veya").unwrap().id().name(), "Veya");
        assert_eq!(registry.resolve("ORION").unwrap().id().name(), "Orion");
    }

    #[test]
    fn test_resolve_rejects_unknown_and_empty() {
        let registry = AgentRegistry::from_config(&EngineConfig::default()).unwrap();

        assert!(matches!(
            registry.resolve("zed"),
            Err(ColloquyError::UnknownAgent { .. })
        ));
        assert!(matches!(
            registry.resolve("  "),
            Err(ColloquyError::Validation { .. })
        ));
    }

    #[test]
    fn test_partner_of() {
        let registry = AgentRegistry::from_config(&EngineConfig::default()).unwrap();
        let veya = registry.first().id().clone();

        assert_eq!(registry.partner_of(&veya).id().name(), "Orion");
        let orion = registry.partner_of(&veya).id().clone();
        assert_eq!(registry.partner_of(&orion).id(), &veya);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EngineConfig::new().with_agents(vec![AgentConfig::new("Solo", "-")]);
        assert!(AgentRegistry::from_config(&config).is_err());
    }
}
