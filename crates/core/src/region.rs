//! Delivery-cost reference data.
//!
//! Rates are per wilaya (the 58 Algerian administrative regions) and depend on
//! whether the parcel is collected at the carrier's counter ("stop desk") or
//! delivered to the door.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Price;

/// How the order reaches the shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeliveryMethod {
    /// Pick-up at the carrier's office.
    #[serde(rename = "desk", alias = "counter")]
    Counter,
    /// Delivery to the shopper's address.
    #[default]
    #[serde(rename = "home")]
    Home,
}

impl DeliveryMethod {
    /// Label used in the order mail.
    #[must_use]
    pub const fn order_label(&self) -> &'static str {
        match self {
            Self::Counter => "Stop Desk",
            Self::Home => "Domicile (Home)",
        }
    }
}

impl fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.order_label())
    }
}

/// Delivery rates for one region, in whole dinar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegionRate {
    pub region: &'static str,
    pub desk: u32,
    pub home: u32,
}

impl RegionRate {
    const fn new(region: &'static str, desk: u32, home: u32) -> Self {
        Self { region, desk, home }
    }

    /// Cost for the given delivery method.
    #[must_use]
    pub fn cost(&self, method: DeliveryMethod) -> Price {
        match method {
            DeliveryMethod::Counter => Price::from_dinar(self.desk),
            DeliveryMethod::Home => Price::from_dinar(self.home),
        }
    }
}

/// Region preselected on the checkout form.
pub const DEFAULT_REGION: &str = "16 - Alger";

/// Delivery rates for every wilaya, in table order.
pub static REGION_RATES: [RegionRate; 58] = [
    RegionRate::new("01 - Adrar", 800, 1300),
    RegionRate::new("02 - Chlef", 450, 750),
    RegionRate::new("03 - Laghouat", 450, 900),
    RegionRate::new("04 - Oum El Bouaghi", 450, 700),
    RegionRate::new("05 - Batna", 450, 700),
    RegionRate::new("06 - Béjaïa", 450, 750),
    RegionRate::new("07 - Biskra", 450, 900),
    RegionRate::new("08 - Béchar", 600, 1000),
    RegionRate::new("09 - Blida", 450, 700),
    RegionRate::new("10 - Bouira", 450, 750),
    RegionRate::new("11 - Tamanrasset", 750, 1500),
    RegionRate::new("12 - Tébessa", 450, 800),
    RegionRate::new("13 - Tlemcen", 450, 850),
    RegionRate::new("14 - Tiaret", 450, 850),
    RegionRate::new("15 - Tizi Ouzou", 450, 750),
    RegionRate::new("16 - Alger", 450, 600),
    RegionRate::new("17 - Djelfa", 500, 900),
    RegionRate::new("18 - Jijel", 450, 700),
    RegionRate::new("19 - Sétif", 300, 450),
    RegionRate::new("20 - Saïda", 450, 900),
    RegionRate::new("21 - Skikda", 450, 750),
    RegionRate::new("22 - Sidi Bel Abbès", 450, 850),
    RegionRate::new("23 - Annaba", 450, 750),
    RegionRate::new("24 - Guelma", 450, 700),
    RegionRate::new("25 - Constantine", 450, 700),
    RegionRate::new("26 - Médéa", 450, 750),
    RegionRate::new("27 - Mostaganem", 450, 850),
    RegionRate::new("28 - M'Sila", 450, 800),
    RegionRate::new("29 - Mascara", 450, 850),
    RegionRate::new("30 - Ouargla", 450, 900),
    RegionRate::new("31 - Oran", 450, 850),
    RegionRate::new("32 - El Bayadh", 450, 1000),
    RegionRate::new("33 - Illizi", 800, 1700),
    RegionRate::new("34 - Bordj Bou Arreridj", 450, 550),
    RegionRate::new("35 - Boumerdès", 450, 700),
    RegionRate::new("36 - El Tarf", 450, 750),
    RegionRate::new("37 - Tindouf", 800, 1600),
    RegionRate::new("38 - Tissemsilt", 450, 800),
    RegionRate::new("39 - El Oued", 450, 900),
    RegionRate::new("40 - Khenchela", 450, 750),
    RegionRate::new("41 - Souk Ahras", 450, 750),
    RegionRate::new("42 - Tipaza", 450, 700),
    RegionRate::new("43 - Mila", 450, 700),
    RegionRate::new("44 - Aïn Defla", 450, 750),
    RegionRate::new("45 - Naâma", 500, 1000),
    RegionRate::new("46 - Aïn Témouchent", 450, 850),
    RegionRate::new("47 - Ghardaïa", 600, 900),
    RegionRate::new("48 - Relizane", 450, 850),
    RegionRate::new("49 - Timimoun", 800, 1300),
    RegionRate::new("50 - Bordj Badji Mokhtar", 850, 1500),
    RegionRate::new("51 - Ouled Djellal", 500, 900),
    RegionRate::new("52 - Béni Abbès", 650, 1050),
    RegionRate::new("53 - In Salah", 800, 1400),
    RegionRate::new("54 - In Guezzam", 900, 1700),
    RegionRate::new("55 - Touggourt", 550, 1000),
    RegionRate::new("56 - Djanet", 800, 2000),
    RegionRate::new("57 - El M'Ghair", 500, 1000),
    RegionRate::new("58 - El Meniaa", 500, 1000),
];

/// Read-only lookup over a rate table.
#[derive(Debug, Clone, Copy)]
pub struct RegionTable {
    rates: &'static [RegionRate],
}

impl Default for RegionTable {
    fn default() -> Self {
        Self::new(&REGION_RATES)
    }
}

impl RegionTable {
    /// Wrap a static rate table.
    #[must_use]
    pub const fn new(rates: &'static [RegionRate]) -> Self {
        Self { rates }
    }

    /// Rates for `region`, if it is a known key.
    #[must_use]
    pub fn get(&self, region: &str) -> Option<&'static RegionRate> {
        self.rates.iter().find(|rate| rate.region == region)
    }

    /// Whether `region` is a known key.
    #[must_use]
    pub fn contains(&self, region: &str) -> bool {
        self.get(region).is_some()
    }

    /// Delivery cost for a region and method.
    ///
    /// Unknown regions cost nothing; this is evaluated on every form change
    /// and must not fail.
    #[must_use]
    pub fn cost(&self, region: &str, method: DeliveryMethod) -> Price {
        self.get(region).map_or(Price::ZERO, |rate| rate.cost(method))
    }

    /// Region ids in table order.
    pub fn regions(&self) -> impl Iterator<Item = &'static str> {
        self.rates.iter().map(|rate| rate.region)
    }

    /// Every rate in table order.
    #[must_use]
    pub const fn rates(&self) -> &'static [RegionRate] {
        self.rates
    }
}
