//! Static species, item and zone tables.
//!
//! The tables are compiled into the binary from the RON files under `data/`
//! and parsed once on first access.

use crate::errors::{RegistryError, RegistryResult};
use schema::{ItemDefinition, ItemId, SpeciesId, SpeciesTemplate, ZoneDefinition, ZoneId};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::LazyLock;

const SPECIES_RON: &str = include_str!("../data/species.ron");
const ITEMS_RON: &str = include_str!("../data/items.ron");
const ZONES_RON: &str = include_str!("../data/zones.ron");

static REGISTRY: LazyLock<RegistryResult<Registry>> =
    LazyLock::new(|| Registry::from_ron_strs(SPECIES_RON, ITEMS_RON, ZONES_RON));

/// Read-only lookup tables keyed by id.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    species: BTreeMap<SpeciesId, SpeciesTemplate>,
    items: BTreeMap<ItemId, ItemDefinition>,
    zones: BTreeMap<ZoneId, ZoneDefinition>,
}

impl Registry {
    /// Build a registry from RON documents, each a list of definitions.
    pub fn from_ron_strs(species: &str, items: &str, zones: &str) -> RegistryResult<Self> {
        let species: Vec<SpeciesTemplate> = ron::from_str(species)
            .map_err(|e| RegistryError::MalformedData(format!("species table: {}", e)))?;
        let items: Vec<ItemDefinition> = ron::from_str(items)
            .map_err(|e| RegistryError::MalformedData(format!("item table: {}", e)))?;
        let zones: Vec<ZoneDefinition> = ron::from_str(zones)
            .map_err(|e| RegistryError::MalformedData(format!("zone table: {}", e)))?;

        Self::from_definitions(species, items, zones)
    }

    /// Build a registry from already-parsed definitions, checking that every
    /// zone only spawns known species and every capture coefficient is in (0, 1].
    pub fn from_definitions(
        species: Vec<SpeciesTemplate>,
        items: Vec<ItemDefinition>,
        zones: Vec<ZoneDefinition>,
    ) -> RegistryResult<Self> {
        let species: BTreeMap<_, _> = species.into_iter().map(|s| (s.id, s)).collect();
        let items: BTreeMap<_, _> = items.into_iter().map(|i| (i.id, i)).collect();
        let zones: BTreeMap<_, _> = zones.into_iter().map(|z| (z.id, z)).collect();

        for zone in zones.values() {
            if zone.monsters.is_empty() {
                return Err(RegistryError::MalformedData(format!(
                    "zone {} has no monsters",
                    zone.id
                )));
            }
            if let Some(missing) = zone.monsters.iter().find(|m| !species.contains_key(m)) {
                return Err(RegistryError::MalformedData(format!(
                    "zone {} spawns unknown species {}",
                    zone.id, missing
                )));
            }
        }

        for item in items.values() {
            if let schema::ItemEffect::Capture(rate) = item.effect {
                if !(rate > 0.0 && rate <= 1.0) {
                    return Err(RegistryError::MalformedData(format!(
                        "item {} has capture rate {} outside (0, 1]",
                        item.id, rate
                    )));
                }
            }
        }

        Ok(Self {
            species,
            items,
            zones,
        })
    }

    pub fn species(&self, id: SpeciesId) -> RegistryResult<&SpeciesTemplate> {
        self.species
            .get(&id)
            .ok_or(RegistryError::SpeciesNotFound(id))
    }

    pub fn item(&self, id: ItemId) -> RegistryResult<&ItemDefinition> {
        self.items.get(&id).ok_or(RegistryError::ItemNotFound(id))
    }

    pub fn zone(&self, id: ZoneId) -> RegistryResult<&ZoneDefinition> {
        self.zones.get(&id).ok_or(RegistryError::ZoneNotFound(id))
    }

    pub fn species_list(&self) -> impl Iterator<Item = &SpeciesTemplate> {
        self.species.values()
    }

    pub fn item_list(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.items.values()
    }

    pub fn zone_list(&self) -> impl Iterator<Item = &ZoneDefinition> {
        self.zones.values()
    }
}

/// The registry compiled into the crate.
pub fn registry() -> RegistryResult<&'static Registry> {
    REGISTRY.as_ref().map_err(Clone::clone)
}

pub fn get_species_data(id: SpeciesId) -> RegistryResult<&'static SpeciesTemplate> {
    registry()?.species(id)
}

pub fn get_item_data(id: ItemId) -> RegistryResult<&'static ItemDefinition> {
    registry()?.item(id)
}

pub fn get_zone_data(id: ZoneId) -> RegistryResult<&'static ZoneDefinition> {
    registry()?.zone(id)
}

pub fn all_items() -> RegistryResult<Vec<&'static ItemDefinition>> {
    Ok(registry()?.item_list().collect())
}

pub fn all_zones() -> RegistryResult<Vec<&'static ZoneDefinition>> {
    Ok(registry()?.zone_list().collect())
}

/// Parse a text key such as `"flamby"` into a species id.
pub fn parse_species_key(key: &str) -> RegistryResult<SpeciesId> {
    SpeciesId::from_str(key.trim()).map_err(|_| RegistryError::UnknownKey {
        kind: "species",
        key: key.to_string(),
    })
}

pub fn parse_item_key(key: &str) -> RegistryResult<ItemId> {
    ItemId::from_str(key.trim()).map_err(|_| RegistryError::UnknownKey {
        kind: "item",
        key: key.to_string(),
    })
}

pub fn parse_zone_key(key: &str) -> RegistryResult<ZoneId> {
    ZoneId::from_str(key.trim()).map_err(|_| RegistryError::UnknownKey {
        kind: "zone",
        key: key.to_string(),
    })
}

pub fn species_by_key(key: &str) -> RegistryResult<&'static SpeciesTemplate> {
    get_species_data(parse_species_key(key)?)
}

pub fn item_by_key(key: &str) -> RegistryResult<&'static ItemDefinition> {
    get_item_data(parse_item_key(key)?)
}

pub fn zone_by_key(key: &str) -> RegistryResult<&'static ZoneDefinition> {
    get_zone_data(parse_zone_key(key)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schema::{ElementType, ItemEffect};

    #[test]
    fn test_embedded_tables_load() {
        let registry = registry().expect("embedded registry should parse");
        assert_eq!(registry.species_list().count(), 6);
        assert_eq!(registry.item_list().count(), 3);
        assert_eq!(registry.zone_list().count(), 3);
    }

    #[test]
    fn test_species_lookup() {
        let flamby = get_species_data(SpeciesId::Flamby).unwrap();
        assert_eq!(flamby.name, "Flamby");
        assert_eq!(flamby.element, ElementType::Fire);
        assert_eq!(flamby.base_stats.hp, 45);
        assert_eq!(flamby.base_stats.attack, 12);
        assert_eq!(flamby.base_stats.defense, 8);
        assert_eq!(flamby.base_stats.speed, 10);

        let terrak = get_species_data(SpeciesId::Terrak).unwrap();
        assert_eq!(terrak.base_stats.defense, 12);
    }

    #[test]
    fn test_item_lookup() {
        let ball = get_item_data(ItemId::MonsterBall).unwrap();
        assert_eq!(ball.price, 200);
        assert_eq!(ball.effect, ItemEffect::Capture(0.3));

        let super_potion = get_item_data(ItemId::SuperPotion).unwrap();
        assert_eq!(super_potion.effect, ItemEffect::Heal(50));
    }

    #[test]
    fn test_zone_lookup() {
        let mountain = get_zone_data(ZoneId::Mountain).unwrap();
        assert_eq!(mountain.level, 3);
        assert_eq!(
            mountain.monsters,
            vec![SpeciesId::Voltix, SpeciesId::Terrak, SpeciesId::Shadowfang]
        );
    }

    #[test]
    fn test_key_lookups() {
        assert_eq!(species_by_key("Glaceon").unwrap().id, SpeciesId::Glaceon);
        assert_eq!(item_by_key("superPotion").unwrap().id, ItemId::SuperPotion);
        assert_eq!(zone_by_key(" lake ").unwrap().id, ZoneId::Lake);
    }

    #[test]
    fn test_unknown_keys_are_not_found() {
        assert_eq!(
            species_by_key("missingno").unwrap_err(),
            RegistryError::UnknownKey {
                kind: "species",
                key: "missingno".to_string()
            }
        );
        assert!(matches!(
            zone_by_key("volcano"),
            Err(RegistryError::UnknownKey { kind: "zone", .. })
        ));
    }

    #[test]
    fn test_missing_definition_is_not_found() {
        let registry = Registry::from_ron_strs("[]", "[]", "[]").unwrap();
        assert_eq!(
            registry.species(SpeciesId::Voltix).unwrap_err(),
            RegistryError::SpeciesNotFound(SpeciesId::Voltix)
        );
        assert_eq!(
            registry.item(ItemId::Potion).unwrap_err(),
            RegistryError::ItemNotFound(ItemId::Potion)
        );
        assert_eq!(
            registry.zone(ZoneId::Forest).unwrap_err(),
            RegistryError::ZoneNotFound(ZoneId::Forest)
        );
    }

    #[test]
    fn test_zone_with_unknown_species_is_rejected() {
        let zones = "[(id: Forest, name: \"Forest\", monsters: [Voltix], level: 1)]";
        let result = Registry::from_ron_strs("[]", "[]", zones);
        assert!(matches!(result, Err(RegistryError::MalformedData(_))));
    }

    #[test]
    fn test_capture_rate_out_of_range_is_rejected() {
        let items = "[(id: MonsterBall, name: \"Ball\", price: 1, effect: Capture(1.5))]";
        let result = Registry::from_ron_strs("[]", items, "[]");
        assert!(matches!(result, Err(RegistryError::MalformedData(_))));
    }

    #[test]
    fn test_garbage_input_is_malformed() {
        let result = Registry::from_ron_strs("not ron", "[]", "[]");
        assert!(matches!(result, Err(RegistryError::MalformedData(_))));
    }
}
