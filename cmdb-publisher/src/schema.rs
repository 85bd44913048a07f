//! CMDB entity schema registry.
//!
//! The CMDB hierarchy is fixed: provider -> service -> tenant -> {image,
//! flavor}. Every type-dependent behaviour (natural-id field, parent-ref
//! field, child types) is looked up here and never inferred from record
//! contents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The five CMDB entity types, root first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Provider,
    Service,
    Tenant,
    Image,
    Flavor,
}

impl EntityType {
    /// Field in `data` holding the entity's own (natural) id.
    pub fn entity_key(self) -> &'static str {
        match self {
            Self::Provider => "name",
            Self::Service => "endpoint",
            Self::Tenant => "tenant_id",
            Self::Image => "image_id",
            Self::Flavor => "flavor_id",
        }
    }

    /// Field in `data` holding the reference to the parent entity.
    ///
    /// For `provider` this is the same field as the entity key: the root of
    /// the hierarchy is self-referential.
    pub fn parent_key(self) -> &'static str {
        match self {
            Self::Provider => "name",
            Self::Service => "provider_id",
            Self::Tenant => "service",
            Self::Image => "tenant_id",
            Self::Flavor => "tenant_id",
        }
    }

    /// Child entity types directly below this one in the hierarchy.
    pub fn children(self) -> &'static [EntityType] {
        match self {
            Self::Provider => &[Self::Service],
            Self::Service => &[Self::Tenant],
            Self::Tenant => &[Self::Image, Self::Flavor],
            Self::Image | Self::Flavor => &[],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Provider => "provider",
            Self::Service => "service",
            Self::Tenant => "tenant",
            Self::Image => "image",
            Self::Flavor => "flavor",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "provider" => Ok(Self::Provider),
            "service" => Ok(Self::Service),
            "tenant" => Ok(Self::Tenant),
            "image" => Ok(Self::Image),
            "flavor" => Ok(Self::Flavor),
            other => Err(Error::UnknownEntityType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_matches_cmdb_schema() {
        assert_eq!(EntityType::Provider.entity_key(), "name");
        assert_eq!(EntityType::Service.entity_key(), "endpoint");
        assert_eq!(EntityType::Tenant.entity_key(), "tenant_id");
        assert_eq!(EntityType::Image.entity_key(), "image_id");
        assert_eq!(EntityType::Flavor.entity_key(), "flavor_id");

        assert_eq!(EntityType::Provider.parent_key(), "name");
        assert_eq!(EntityType::Service.parent_key(), "provider_id");
        assert_eq!(EntityType::Tenant.parent_key(), "service");
        assert_eq!(EntityType::Image.parent_key(), "tenant_id");
        assert_eq!(EntityType::Flavor.parent_key(), "tenant_id");
    }

    #[test]
    fn children_follow_hierarchy() {
        assert_eq!(EntityType::Provider.children(), &[EntityType::Service]);
        assert_eq!(EntityType::Service.children(), &[EntityType::Tenant]);
        assert_eq!(
            EntityType::Tenant.children(),
            &[EntityType::Image, EntityType::Flavor]
        );
        assert!(EntityType::Image.children().is_empty());
        assert!(EntityType::Flavor.children().is_empty());
    }

    #[test]
    fn parses_all_known_types() {
        for entity in [
            EntityType::Provider,
            EntityType::Service,
            EntityType::Tenant,
            EntityType::Image,
            EntityType::Flavor,
        ] {
            assert_eq!(entity.as_str().parse::<EntityType>().unwrap(), entity);
        }
    }

    #[test]
    fn unknown_entity_type_is_rejected() {
        let err = "network".parse::<EntityType>().unwrap_err();
        assert!(matches!(err, Error::UnknownEntityType(t) if t == "network"));
    }
}
