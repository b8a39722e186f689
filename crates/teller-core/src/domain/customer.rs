//! Customer: the item a branch hands out to its tellers.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CustomerId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub arrived_at: DateTime<Utc>,
}

impl Customer {
    /// Create a customer arriving now.
    pub fn new(name: impl Into<String>) -> Self {
        Self::arriving_at(name, Utc::now())
    }

    pub fn arriving_at(name: impl Into<String>, arrived_at: DateTime<Utc>) -> Self {
        Self {
            id: CustomerId::generate(),
            name: name.into(),
            arrived_at,
        }
    }

    /// How long this customer has been waiting as of `now`.
    pub fn waited(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.arrived_at
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_as_name() {
        let customer = Customer::new("Ada");
        assert_eq!(customer.to_string(), "Ada");
    }

    #[test]
    fn waited_is_measured_from_arrival() {
        let arrived = Utc::now();
        let customer = Customer::arriving_at("Grace", arrived);
        let later = arrived + chrono::Duration::seconds(90);
        assert_eq!(customer.waited(later), chrono::Duration::seconds(90));
    }
}
