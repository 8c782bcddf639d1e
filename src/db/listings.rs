use tracing::info;
use uuid::Uuid;

use crate::db::connection::Database;
use crate::db::store::{Collection, Filter, Sort};
use crate::domain::listing::{Listing, ListingFields, ListingFilter};
use crate::domain::timestamp;
use crate::errors::ServerError;

/// Domain operations on property listings.
pub struct ListingRepository<'a> {
    listings: Collection<'a, Listing>,
}

impl<'a> ListingRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self {
            listings: db.collection(),
        }
    }

    /// Listings matching every given filter, newest first.
    pub fn list(&self, filter: &ListingFilter) -> Result<Vec<Listing>, ServerError> {
        filter.validate()?;
        self.listings
            .find_many(&store_filter(filter), Sort::Desc("created_at"))
    }

    pub fn get(&self, id: &str) -> Result<Listing, ServerError> {
        self.listings
            .find_one(&by_id(id))?
            .ok_or_else(|| ServerError::not_found("Property"))
    }

    /// Store a new listing and return its generated id.
    pub fn create(&self, fields: ListingFields) -> Result<String, ServerError> {
        fields.validate()?;
        let now = timestamp::now();
        let listing = Listing {
            id: Uuid::new_v4().to_string(),
            fields,
            created_at: now,
            updated_at: now,
        };

        self.listings.insert(&listing)?;
        info!(id = %listing.id, agent = %listing.fields.agent_name, "listing created");
        Ok(listing.id)
    }

    /// Replace every mutable field of a listing. `id` and `created_at` are
    /// never touched; `updated_at` moves forward.
    pub fn update(&self, id: &str, fields: ListingFields) -> Result<(), ServerError> {
        fields.validate()?;
        let current = self.get(id)?;
        let updated_at = timestamp::now().max(current.updated_at);

        let mut patch = serde_json::to_value(&fields)?;
        if let Some(obj) = patch.as_object_mut() {
            obj.insert(
                "updated_at".to_string(),
                serde_json::Value::String(timestamp::format(&updated_at)),
            );
        }

        // A concurrent delete between the read and the write still surfaces as NotFound.
        if !self.listings.update_one(&by_id(id), &patch)? {
            return Err(ServerError::not_found("Property"));
        }

        info!(id, "listing updated");
        Ok(())
    }

    pub fn delete(&self, id: &str) -> Result<(), ServerError> {
        if !self.listings.delete_one(&by_id(id))? {
            return Err(ServerError::not_found("Property"));
        }

        info!(id, "listing deleted");
        Ok(())
    }

    /// Number of listings whose `agent_name` equals `name` exactly.
    pub fn count_for_agent(&self, name: &str) -> Result<i64, ServerError> {
        self.listings.count(&Filter::new().eq("agent_name", name))
    }
}

fn by_id(id: &str) -> Filter {
    Filter::new().eq("id", id)
}

fn store_filter(f: &ListingFilter) -> Filter {
    let mut filter = Filter::new();

    if let Some(kind) = f.property_type {
        filter = filter.eq("property_type", kind.as_str());
    }
    if let Some(min) = f.min_price {
        filter = filter.gte("price", min);
    }
    if let Some(max) = f.max_price {
        filter = filter.lte("price", max);
    }
    if let Some(rooms) = f.rooms {
        filter = filter.eq("rooms", rooms);
    }
    if let Some(street) = f.street.as_deref().filter(|s| !s.is_empty()) {
        filter = filter.contains_ignore_case("street", street);
    }

    filter
}
