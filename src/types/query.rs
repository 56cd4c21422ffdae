//! Typed query surface for the entity store.
//!
//! The retrieval layer that sits on top of the store is out of scope
//! here, but the store boundary still carries its read side: list with
//! pagination, sort, cursor, and a simple equality filter. Queries are
//! fully typed so no caller-supplied string ever reaches a backend as
//! a column name.

use serde::{Deserialize, Serialize};

/// Largest page a single query may return.
pub const MAX_PAGE_SIZE: usize = 100;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Columns of the entity table that can be sorted or filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityColumn {
    Id,
    Name,
    Abilities,
    Born,
    BondedWith,
    Titles,
    Aliases,
    Profession,
    Groups,
    Birthplace,
    Residence,
    Nationality,
}

impl EntityColumn {
    /// Backend column name. Values come from this fixed enum only,
    /// which is what makes interpolating them into SQL safe.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityColumn::Id => "id",
            EntityColumn::Name => "name",
            EntityColumn::Abilities => "abilities",
            EntityColumn::Born => "born",
            EntityColumn::BondedWith => "bonded_with",
            EntityColumn::Titles => "titles",
            EntityColumn::Aliases => "aliases",
            EntityColumn::Profession => "profession",
            EntityColumn::Groups => "groups",
            EntityColumn::Birthplace => "birthplace",
            EntityColumn::Residence => "residence",
            EntityColumn::Nationality => "nationality",
        }
    }
}

/// Equality filter on one entity column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityFilter {
    pub column: EntityColumn,
    pub value: String,
}

impl EntityFilter {
    pub fn new(column: EntityColumn, value: impl Into<String>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }
}

/// Parameters for listing entities.
///
/// Default is ascending-id order from the beginning. A cursor (an
/// entity id, exclusive) takes precedence over an explicit ordering;
/// cursor pagination is only meaningful in ascending-id order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityQuery {
    pub skip: Option<usize>,
    pub take: Option<usize>,
    pub order_by: Option<(EntityColumn, SortOrder)>,
    pub cursor: Option<i64>,
    pub filter: Option<EntityFilter>,
}

impl EntityQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn take(mut self, take: usize) -> Self {
        self.take = Some(take);
        self
    }

    pub fn order_by(mut self, column: EntityColumn, order: SortOrder) -> Self {
        self.order_by = Some((column, order));
        self
    }

    pub fn cursor(mut self, cursor: i64) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn filter(mut self, filter: EntityFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Effective page size after clamping to [`MAX_PAGE_SIZE`].
    pub fn limit(&self) -> usize {
        self.take.unwrap_or(MAX_PAGE_SIZE).min(MAX_PAGE_SIZE)
    }
}
