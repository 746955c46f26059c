//! Pagination request and response types.

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::Pokemon;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
}

const fn default_page() -> u32 {
    1
}

const fn default_size() -> u32 {
    10
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            size: default_size(),
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    /// Check page >= 1 and 1 <= size <= 100.
    pub fn validate(&self) -> DomainResult<()> {
        if self.page < 1 {
            return Err(DomainError::ValidationFailed(format!(
                "page must be at least 1, got {}",
                self.page
            )));
        }
        if self.size < 1 || self.size > MAX_PAGE_SIZE {
            return Err(DomainError::ValidationFailed(format!(
                "size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.size
            )));
        }
        Ok(())
    }

    /// Number of records to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }
}

/// One page of cached records plus the store-wide total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonPage {
    pub items: Vec<Pokemon>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
}

impl PokemonPage {
    pub fn new(items: Vec<Pokemon>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            size: request.size,
        }
    }
}
