//! Strategy registry.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use super::{
    ComplexStrategy, ExtractionStrategy, LargeFileStrategy, PageStrategy, RegionFilterStrategy,
    SimpleStaticStrategy, StrategyType,
};
use crate::error::{Error, Result};

/// Builds a strategy from its descriptor.
pub type StrategyConstructor = fn(&ExtractionStrategy) -> Box<dyn PageStrategy>;

/// Maps each [`StrategyType`] to the constructor of its implementation.
#[derive(Clone, Default)]
pub struct StrategyFactory {
    registry: HashMap<StrategyType, StrategyConstructor>,
}

impl fmt::Debug for StrategyFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyFactory")
            .field("registered", &self.registered_types())
            .finish()
    }
}

impl StrategyFactory {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in implementation for every type.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut factory = Self::new();
        factory.register(StrategyType::SimpleStatic, SimpleStaticStrategy::boxed);
        factory.register(StrategyType::RegionFilter, RegionFilterStrategy::boxed);
        factory.register(StrategyType::Complex, ComplexStrategy::boxed);
        factory.register(StrategyType::LargeFile, LargeFileStrategy::boxed);
        factory
    }

    /// Registers `constructor` for `strategy_type`, returning the one it
    /// replaces.
    pub fn register(
        &mut self,
        strategy_type: StrategyType,
        constructor: StrategyConstructor,
    ) -> Option<StrategyConstructor> {
        debug!(strategy = %strategy_type, "strategy registered");
        self.registry.insert(strategy_type, constructor)
    }

    #[must_use]
    pub fn is_registered(&self, strategy_type: StrategyType) -> bool {
        self.registry.contains_key(&strategy_type)
    }

    /// Registered types in [`StrategyType::ALL`] order.
    #[must_use]
    pub fn registered_types(&self) -> Vec<StrategyType> {
        StrategyType::ALL
            .into_iter()
            .filter(|t| self.is_registered(*t))
            .collect()
    }

    /// Checks that every strategy type has an implementation.
    ///
    /// # Errors
    ///
    /// [`Error::StrategyNotRegistered`] naming the first missing type.
    pub fn validate_strategy_registration(&self) -> Result<()> {
        match StrategyType::ALL.into_iter().find(|t| !self.is_registered(*t)) {
            Some(missing) => {
                warn!(strategy = %missing, "strategy registry incomplete");
                Err(Error::StrategyNotRegistered(missing))
            }
            None => Ok(()),
        }
    }

    /// Instantiates the strategy `descriptor` selects.
    ///
    /// # Errors
    ///
    /// [`Error::StrategyNotRegistered`] when the type has no constructor.
    pub fn create_strategy(&self, descriptor: &ExtractionStrategy) -> Result<Box<dyn PageStrategy>> {
        let constructor = self
            .registry
            .get(&descriptor.strategy_type)
            .ok_or(Error::StrategyNotRegistered(descriptor.strategy_type))?;
        debug!(strategy = %descriptor.strategy_type, processor = %descriptor.processor, "strategy created");
        Ok(constructor(descriptor))
    }

    /// Static-page strategy over the fallback descriptor; independent of
    /// the registry.
    #[must_use]
    pub fn create_fallback_strategy(&self) -> Box<dyn PageStrategy> {
        Box::new(SimpleStaticStrategy::new(ExtractionStrategy::fallback()))
    }
}
