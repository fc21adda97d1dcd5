//! Business logic services

pub mod catalog;
pub mod clock;
pub mod loans;
pub mod users;

use crate::{config::LoansConfig, repository::Repository};

use clock::{Clock, SystemClock};

/// Container for the registries and the services operating on them.
///
/// Services borrow the repository mutably, so a borrow or return runs to
/// completion before anything else can touch the catalog.
pub struct Services {
    repository: Repository,
    loans_config: LoansConfig,
    clock: Box<dyn Clock>,
}

impl Services {
    /// Create empty registries using the system clock
    pub fn new(loans_config: LoansConfig) -> Self {
        Self::with_clock(loans_config, Box::new(SystemClock))
    }

    pub fn with_clock(loans_config: LoansConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            repository: Repository::new(),
            loans_config,
            clock,
        }
    }

    pub fn catalog(&mut self) -> catalog::CatalogService<'_> {
        catalog::CatalogService::new(&mut self.repository)
    }

    pub fn users(&mut self) -> users::UsersService<'_> {
        users::UsersService::new(&mut self.repository)
    }

    pub fn loans(&mut self) -> loans::LoansService<'_> {
        loans::LoansService::new(&mut self.repository, &self.loans_config, self.clock.as_ref())
    }

    /// Read-only access to the registries
    pub fn repository(&self) -> &Repository {
        &self.repository
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::new(LoansConfig::default())
    }
}
