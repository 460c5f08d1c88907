//! Builders for founder and property rows.

#![allow(dead_code)]

use matchdesk::model::{Founder, Property};

/// Builder for creating `Property` rows. Starts as an available listing.
pub struct PropertyBuilder {
    property: Property,
}

impl PropertyBuilder {
    pub fn new() -> Self {
        Self {
            property: Property {
                status: Some("available".to_string()),
                ..Default::default()
            },
        }
    }

    pub fn code(mut self, code: &str) -> Self {
        self.property.property_code = Some(code.to_string());
        self
    }

    pub fn store_name(mut self, name: &str) -> Self {
        self.property.store_name = Some(name.to_string());
        self
    }

    pub fn business_type(mut self, business_type: &str) -> Self {
        self.property.business_type = Some(business_type.to_string());
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.property.status = Some(status.to_string());
        self
    }

    pub fn area(mut self, area: f64) -> Self {
        self.property.area = Some(area);
        self
    }

    pub fn deposit(mut self, deposit: f64) -> Self {
        self.property.deposit = Some(deposit);
        self
    }

    pub fn rent(mut self, rent: f64) -> Self {
        self.property.rent = Some(rent);
        self
    }

    pub fn floor(mut self, floor: &str) -> Self {
        self.property.floor = Some(floor.to_string());
        self
    }

    pub fn location(mut self, sido: &str, sigungu: &str) -> Self {
        self.property.sido = Some(sido.to_string());
        self.property.sigungu = Some(sigungu.to_string());
        self
    }

    pub fn received_at(mut self, received_at: &str) -> Self {
        self.property.received_at = Some(received_at.to_string());
        self
    }

    pub fn build(self) -> Property {
        self.property
    }
}

impl Default for PropertyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating `Founder` rows. No requirements by default.
pub struct FounderBuilder {
    founder: Founder,
}

impl FounderBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            founder: Founder {
                name: Some(name.to_string()),
                ..Default::default()
            },
        }
    }

    pub fn contact(mut self, contact: &str) -> Self {
        self.founder.contact = Some(contact.to_string());
        self
    }

    pub fn area(mut self, area: f64) -> Self {
        self.founder.area = Some(area);
        self
    }

    pub fn deposit(mut self, deposit: f64) -> Self {
        self.founder.deposit = Some(deposit);
        self
    }

    pub fn rent(mut self, rent: f64) -> Self {
        self.founder.rent = Some(rent);
        self
    }

    pub fn business_type(mut self, business_type: &str) -> Self {
        self.founder.business_type = Some(business_type.to_string());
        self
    }

    pub fn build(self) -> Founder {
        self.founder
    }
}
