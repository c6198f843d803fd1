use async_trait::async_trait;
use rayon::prelude::*;
use std::collections::HashMap;

use crate::client::{DataSource, FetchError};
use crate::database::{Database, Role, UserRecord};
use crate::map::{City, Counts};

/// Bucket users by city name. The first user seen for a city sets its
/// coordinates; users without a city are left out. Sorted by name.
pub fn aggregate_cities(users: &[UserRecord]) -> Vec<City> {
    let buckets = users
        .par_iter()
        .filter(|user| !user.city.trim().is_empty())
        .fold(HashMap::new, |mut acc: HashMap<&str, City>, user| {
            let city = acc.entry(user.city.as_str()).or_insert_with(|| City {
                name: user.city.clone(),
                coordinates: user.coordinates,
                client_count: 0,
                volunteer_count: 0,
            });
            match user.role {
                Role::Client => city.client_count += 1,
                Role::Volunteer => city.volunteer_count += 1,
            }
            acc
        })
        // Chunks are combined in order, so the left side keeps first-seen coordinates
        .reduce(HashMap::new, |mut left, right| {
            for (name, city) in right {
                left.entry(name)
                    .and_modify(|existing| {
                        existing.client_count += city.client_count;
                        existing.volunteer_count += city.volunteer_count;
                    })
                    .or_insert(city);
            }
            left
        });

    let mut cities: Vec<City> = buckets.into_values().collect();
    cities.sort_by(|a, b| a.name.cmp(&b.name));
    cities
}

pub fn total_counts(users: &[UserRecord]) -> Counts {
    let client_count = users.iter().filter(|u| u.role == Role::Client).count() as u64;
    let volunteer_count = users.iter().filter(|u| u.role == Role::Volunteer).count() as u64;
    Counts {
        client_count,
        volunteer_count,
        all_count: client_count + volunteer_count,
    }
}

// Lets the server mount the map component straight from its own store
#[async_trait]
impl DataSource for Database {
    async fn fetch_cities(&self) -> Result<Vec<City>, FetchError> {
        let users = self
            .get_all_users()
            .map_err(|e| FetchError::Store(e.to_string()))?;
        Ok(aggregate_cities(&users))
    }

    async fn fetch_counts(&self) -> Result<Counts, FetchError> {
        let users = self
            .get_all_users()
            .map_err(|e| FetchError::Store(e.to_string()))?;
        Ok(total_counts(&users))
    }
}
