use std::collections::BTreeMap;

use aisleron_shared::{
    Aisle, AisleProduct, Error, Location, LocationType, Product, Result, bail, sort_by_rank,
};

/// Stored placement; the product is joined on read so renames show everywhere.
#[derive(Debug, Clone)]
pub(crate) struct Placement {
    pub id: i64,
    pub aisle_id: i64,
    pub product_id: i64,
    pub rank: i32,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Data {
    locations: BTreeMap<i64, Location>,
    aisles: BTreeMap<i64, Aisle>,
    products: BTreeMap<i64, Product>,
    placements: BTreeMap<i64, Placement>,
    last_location_id: i64,
    last_aisle_id: i64,
    last_product_id: i64,
    last_placement_id: i64,
}

fn next_id(last: &mut i64) -> i64 {
    *last += 1;
    *last
}

impl Data {
    // locations

    pub fn location(&self, id: i64) -> Option<Location> {
        self.locations.get(&id).cloned()
    }

    pub fn locations(&self) -> Vec<Location> {
        self.locations.values().cloned().collect()
    }

    pub fn location_by_name(&self, name: &str) -> Option<Location> {
        self.locations
            .values()
            .find(|location| location.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    pub fn locations_by_type(&self, location_type: LocationType) -> Vec<Location> {
        self.locations
            .values()
            .filter(|location| location.location_type == location_type)
            .cloned()
            .collect()
    }

    pub fn shops(&self, pinned_only: bool) -> Vec<Location> {
        self.locations_by_type(LocationType::Shop)
            .into_iter()
            .filter(|location| !pinned_only || location.pinned)
            .collect()
    }

    pub fn home(&self) -> Option<Location> {
        self.locations_by_type(LocationType::Generic).into_iter().next()
    }

    pub fn location_with_aisles(&self, id: i64, with_products: bool) -> Option<Location> {
        let mut location = self.location(id)?;
        location.aisles = self.aisles_for_location(id);
        if with_products {
            for aisle in location.aisles.iter_mut() {
                aisle.products = self.placements_for_aisle(aisle.id);
            }
        }

        Some(location)
    }

    pub fn insert_location(&mut self, item: &Location) -> Result<i64> {
        if self.location_by_name(&item.name).is_some() {
            return Err(Error::DuplicateLocationName);
        }

        if item.is_home() && self.home().is_some() {
            return Err(Error::DuplicateHomeLocation);
        }

        let id = next_id(&mut self.last_location_id);
        self.locations.insert(
            id,
            Location {
                id,
                aisles: vec![],
                ..item.clone()
            },
        );

        Ok(id)
    }

    pub fn update_location(&mut self, item: &Location) -> Result<bool> {
        if !self.locations.contains_key(&item.id) {
            return Ok(false);
        }

        if let Some(other) = self.location_by_name(&item.name) {
            if other.id != item.id {
                return Err(Error::DuplicateLocationName);
            }
        }

        let Some(stored) = self.locations.get_mut(&item.id) else {
            return Ok(false);
        };
        stored.name = item.name.to_owned();
        stored.default_filter = item.default_filter;
        stored.pinned = item.pinned;

        Ok(true)
    }

    pub fn remove_location(&mut self, id: i64) -> Result<bool> {
        let Some(stored) = self.locations.get(&id) else {
            return Ok(false);
        };

        if stored.is_home() {
            return Err(Error::DeleteHomeLocation);
        }

        let aisle_ids = self
            .aisles
            .values()
            .filter(|aisle| aisle.location_id == id)
            .map(|aisle| aisle.id)
            .collect::<Vec<_>>();
        self.placements
            .retain(|_, placement| !aisle_ids.contains(&placement.aisle_id));
        self.aisles.retain(|_, aisle| aisle.location_id != id);
        self.locations.remove(&id);

        Ok(true)
    }

    // aisles

    pub fn aisle(&self, id: i64) -> Option<Aisle> {
        self.aisles.get(&id).cloned()
    }

    pub fn aisle_with_products(&self, id: i64) -> Option<Aisle> {
        let mut aisle = self.aisle(id)?;
        aisle.products = self.placements_for_aisle(id);

        Some(aisle)
    }

    pub fn aisles(&self, filter: impl Fn(&Aisle) -> bool) -> Vec<Aisle> {
        let mut aisles = self
            .aisles
            .values()
            .filter(|aisle| filter(aisle))
            .cloned()
            .collect::<Vec<_>>();
        sort_by_rank(&mut aisles);

        aisles
    }

    pub fn aisles_for_location(&self, location_id: i64) -> Vec<Aisle> {
        self.aisles(|aisle| aisle.location_id == location_id)
    }

    pub fn insert_aisle(&mut self, item: &Aisle) -> Result<i64> {
        if !self.locations.contains_key(&item.location_id) {
            bail!("location {} does not exist", item.location_id);
        }

        if item.is_default
            && self
                .aisles
                .values()
                .any(|aisle| aisle.location_id == item.location_id && aisle.is_default)
        {
            return Err(Error::DuplicateDefaultAisle);
        }

        let id = next_id(&mut self.last_aisle_id);
        self.aisles.insert(
            id,
            Aisle {
                id,
                products: vec![],
                ..item.clone()
            },
        );

        Ok(id)
    }

    pub fn update_aisle(&mut self, item: &Aisle) -> Result<bool> {
        let Some(stored) = self.aisles.get(&item.id) else {
            return Ok(false);
        };

        let is_default = stored.is_default;
        let location_id = if is_default {
            stored.location_id
        } else {
            item.location_id
        };

        if !self.locations.contains_key(&location_id) {
            bail!("location {} does not exist", location_id);
        }

        self.aisles.insert(
            item.id,
            Aisle {
                is_default,
                location_id,
                products: vec![],
                ..item.clone()
            },
        );

        Ok(true)
    }

    pub fn remove_aisle(&mut self, id: i64) -> Result<bool> {
        let Some(stored) = self.aisles.get(&id) else {
            return Ok(false);
        };

        if stored.is_default {
            return Err(Error::DeleteDefaultAisle);
        }

        self.placements.retain(|_, placement| placement.aisle_id != id);
        self.aisles.remove(&id);

        Ok(true)
    }

    // products

    pub fn product(&self, id: i64) -> Option<Product> {
        self.products.get(&id).cloned()
    }

    pub fn products(&self) -> Vec<Product> {
        self.products.values().cloned().collect()
    }

    pub fn product_by_name(&self, name: &str) -> Option<Product> {
        self.products
            .values()
            .find(|product| product.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    pub fn insert_product(&mut self, item: &Product) -> Result<i64> {
        if self.product_by_name(&item.name).is_some() {
            return Err(Error::DuplicateProductName);
        }

        let id = next_id(&mut self.last_product_id);
        self.products.insert(
            id,
            Product {
                id,
                ..item.clone()
            },
        );

        Ok(id)
    }

    pub fn update_product(&mut self, item: &Product) -> Result<bool> {
        if !self.products.contains_key(&item.id) {
            return Ok(false);
        }

        if let Some(other) = self.product_by_name(&item.name) {
            if other.id != item.id {
                return Err(Error::DuplicateProductName);
            }
        }

        let Some(stored) = self.products.get_mut(&item.id) else {
            return Ok(false);
        };
        *stored = item.clone();

        Ok(true)
    }

    pub fn remove_product(&mut self, id: i64) -> bool {
        if self.products.remove(&id).is_none() {
            return false;
        }

        self.placements.retain(|_, placement| placement.product_id != id);

        true
    }

    // placements

    fn hydrate(&self, placement: &Placement) -> Option<AisleProduct> {
        let product = self.product(placement.product_id)?;

        Some(AisleProduct {
            id: placement.id,
            aisle_id: placement.aisle_id,
            rank: placement.rank,
            product,
        })
    }

    pub fn placement(&self, id: i64) -> Option<AisleProduct> {
        self.placements
            .get(&id)
            .and_then(|placement| self.hydrate(placement))
    }

    pub fn placements(&self, filter: impl Fn(&Placement) -> bool) -> Vec<AisleProduct> {
        let mut placements = self
            .placements
            .values()
            .filter(|placement| filter(placement))
            .filter_map(|placement| self.hydrate(placement))
            .collect::<Vec<_>>();
        sort_by_rank(&mut placements);

        placements
    }

    pub fn placements_for_aisle(&self, aisle_id: i64) -> Vec<AisleProduct> {
        self.placements(|placement| placement.aisle_id == aisle_id)
    }

    fn check_placement(&self, item: &AisleProduct) -> Result<()> {
        if !self.aisles.contains_key(&item.aisle_id) {
            bail!("aisle {} does not exist", item.aisle_id);
        }

        if !self.products.contains_key(&item.product.id) {
            bail!("product {} does not exist", item.product.id);
        }

        Ok(())
    }

    pub fn insert_placement(&mut self, item: &AisleProduct) -> Result<i64> {
        self.check_placement(item)?;

        let id = next_id(&mut self.last_placement_id);
        self.placements.insert(
            id,
            Placement {
                id,
                aisle_id: item.aisle_id,
                product_id: item.product.id,
                rank: item.rank,
            },
        );

        Ok(id)
    }

    pub fn update_placement(&mut self, item: &AisleProduct) -> Result<bool> {
        if !self.placements.contains_key(&item.id) {
            return Ok(false);
        }

        self.check_placement(item)?;
        self.placements.insert(
            item.id,
            Placement {
                id: item.id,
                aisle_id: item.aisle_id,
                product_id: item.product.id,
                rank: item.rank,
            },
        );

        Ok(true)
    }

    /// Makes room at `item.rank` in the stored aisle of the placement, then
    /// moves it there. Returns false when the placement does not exist.
    pub fn update_placement_rank(&mut self, item: &AisleProduct) -> bool {
        let Some(aisle_id) = self.placements.get(&item.id).map(|p| p.aisle_id) else {
            return false;
        };

        for placement in self.placements.values_mut() {
            if placement.aisle_id != aisle_id {
                continue;
            }

            if placement.id == item.id {
                placement.rank = item.rank;
            } else if placement.rank >= item.rank {
                placement.rank += 1;
            }
        }

        true
    }

    pub fn remove_placement(&mut self, id: i64) -> bool {
        self.placements.remove(&id).is_some()
    }

    pub fn remove_placements_from_aisle(&mut self, aisle_id: i64) -> bool {
        let before = self.placements.len();
        self.placements
            .retain(|_, placement| placement.aisle_id != aisle_id);

        self.placements.len() != before
    }
}
